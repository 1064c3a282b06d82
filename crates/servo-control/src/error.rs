//! 错误类型
//!
//! "未能对中"不是错误：迭代次数耗尽时返回 `Ok(ControllerResult)`，`success == false`。
//! [`CenterError`] 只用于以下情况：
//!
//! - 配置参数无效（在访问任何协作者之前检查）
//! - 协作者配置错误（未知相机、模型未加载等）
//! - 底盘命令失败
//! - 调用方取消（携带已完成周期的记录）
//! - 在终止状态下继续单步执行

use crate::state::CenteringState;
use servo_tools::CenteringRecording;
use servo_types::VelocityCommand;
use std::path::PathBuf;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 对中控制器错误
#[derive(Debug, Error)]
pub enum CenterError {
    // ==================== Configuration Errors ====================
    /// 参数无效
    #[error("Invalid parameter '{param}': {reason}")]
    InvalidParameter {
        /// 参数名
        param: &'static str,
        /// 原因
        reason: String,
    },

    /// 配置文件读写失败
    #[error("Config file {path}: {reason}")]
    ConfigFile {
        path: PathBuf,
        reason: String,
    },

    // ==================== Collaborator Errors ====================
    /// 帧源错误
    #[error("Frame source failed for camera '{camera_id}': {source}")]
    FrameSource {
        camera_id: String,
        #[source]
        source: BoxError,
    },

    /// 检测器错误
    #[error("Detector failed: {source}")]
    Detector {
        #[source]
        source: BoxError,
    },

    /// 底盘命令失败
    #[error("Base actuator rejected command ({command}): {source}")]
    Actuator {
        command: VelocityCommand,
        #[source]
        source: BoxError,
    },

    // ==================== Other ====================
    /// 调用方取消
    #[error("Centering cancelled after {iterations} iterations")]
    Cancelled {
        /// 已完成的迭代次数
        iterations: usize,
        /// 取消前的逐周期记录
        recording: Box<CenteringRecording>,
    },

    /// 控制器已处于终止状态，不再访问协作者
    #[error("Controller already finished in state {state}")]
    AlreadyFinished { state: CenteringState },
}

impl CenterError {
    pub fn invalid_parameter(param: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param,
            reason: reason.into(),
        }
    }

    pub fn frame_source(
        camera_id: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::FrameSource {
            camera_id: camera_id.into(),
            source: Box::new(source),
        }
    }

    pub fn detector(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Detector {
            source: Box::new(source),
        }
    }

    pub fn actuator(
        command: VelocityCommand,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Actuator {
            command,
            source: Box::new(source),
        }
    }

    /// 是否为配置错误（参数或配置文件）
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. } | Self::ConfigFile { .. })
    }

    /// 是否来自协作者
    pub fn is_collaborator_error(&self) -> bool {
        matches!(
            self,
            Self::FrameSource { .. } | Self::Detector { .. } | Self::Actuator { .. }
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// 取消时已记录的部分周期
    pub fn partial_recording(&self) -> Option<&CenteringRecording> {
        match self {
            Self::Cancelled { recording, .. } => Some(&**recording),
            _ => None,
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, CenterError>;
