//! 仿真错误类型

use servo_control::CollaboratorFault;
use servo_types::{FrameError, PixelFormat};
use thiserror::Error;

/// 仿真协作者错误
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// 场景参数无效
    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    /// 请求了不存在的相机
    #[error("Unknown camera '{requested}' (simulated camera is '{available}')")]
    UnknownCamera { requested: String, available: String },

    /// 脚本化的相机掉线
    #[error("Camera outage at capture {capture}")]
    CameraOutage { capture: u64 },

    /// 检测器不支持的像素格式
    #[error("Unsupported pixel format: {0:?}")]
    UnsupportedFormat(PixelFormat),

    /// 帧构造失败
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// 底盘故障注入
    #[error("Base fault after {after} commands")]
    BaseFault { after: usize },
}

impl CollaboratorFault for SimError {
    fn is_transient(&self) -> bool {
        matches!(self, SimError::CameraOutage { .. })
    }
}
