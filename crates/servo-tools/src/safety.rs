//! # 安全限制
//!
//! 底盘速度命令的可选安全限制。
//!
//! 对中控制器默认不钳位命令，增益是调用方限制命令幅度的唯一手段。
//! 配置 [`VelocityLimits`] 后，每个命令先乘以阻尼系数，再按轴钳位到 `±max_step`。

use serde::{Deserialize, Serialize};
use servo_types::VelocityCommand;
use thiserror::Error;

/// 限制参数错误
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LimitsError {
    #[error("damping must be in (0, 1], got {0}")]
    InvalidDamping(f64),

    #[error("max_step must be positive and finite, got {0}")]
    InvalidMaxStep(f64),
}

/// 速度安全限制
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityLimits {
    /// 阻尼系数，`(0, 1]`，用于抑制振荡
    pub damping: f64,

    /// 每轴单步最大幅度（与命令同单位）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_step: Option<f64>,
}

impl Default for VelocityLimits {
    fn default() -> Self {
        Self {
            damping: 1.0,
            max_step: None,
        }
    }
}

impl VelocityLimits {
    /// 单步钳位，不加阻尼
    pub fn max_step(max_step: f64) -> Self {
        Self {
            damping: 1.0,
            max_step: Some(max_step),
        }
    }

    /// 保守参数：阻尼 0.5，单步 0.04 m
    pub fn conservative() -> Self {
        Self {
            damping: 0.5,
            max_step: Some(0.04),
        }
    }

    /// 校验参数
    pub fn validate(&self) -> Result<(), LimitsError> {
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(LimitsError::InvalidDamping(self.damping));
        }
        if let Some(step) = self.max_step
            && !(step > 0.0 && step.is_finite())
        {
            return Err(LimitsError::InvalidMaxStep(step));
        }
        Ok(())
    }

    /// 应用阻尼和钳位
    pub fn apply(&self, command: VelocityCommand) -> VelocityCommand {
        let damped = command * self.damping;
        match self.max_step {
            Some(step) => damped.map(|x| x.clamp(-step, step)),
            None => damped,
        }
    }
}
