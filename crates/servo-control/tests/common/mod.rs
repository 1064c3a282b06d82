//! 测试公共模块

#![allow(dead_code)]

pub mod mock_collaborators;

pub use mock_collaborators::*;

use servo_control::ControllerConfig;
use std::time::Duration;

/// 测试用配置：默认参数，关闭等待和详细日志
pub fn test_config() -> ControllerConfig {
    ControllerConfig::default()
        .with_verbose(false)
        .with_settle_delay(Duration::ZERO)
}
