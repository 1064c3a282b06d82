//! 协作者接口
//!
//! 对中控制器只依赖三个能力，不关心它们的具体实现：
//!
//! - [`FrameSource`]: 按相机 ID 获取当前帧
//! - [`Detector`]: 对一帧图像做检测
//! - [`BaseActuator`]: 执行一个控制周期的底盘速度命令
//!
//! # 错误分类
//!
//! 帧源和检测器的错误必须实现 [`CollaboratorFault`]，用来区分：
//!
//! - **瞬时故障**（设备忙、丢帧）：按"本周期未检测到"处理，消耗一次迭代
//! - **配置错误**（未知相机 ID、模型未加载）：立即向调用方传播
//!
//! 底盘执行器的错误总是传播。
//!
//! # 示例
//!
//! ```rust
//! use servo_control::{CollaboratorError, Detector};
//! use servo_types::{Detection, Frame, PixelPoint};
//!
//! struct FixedDetector(PixelPoint);
//!
//! impl Detector for FixedDetector {
//!     type Error = CollaboratorError;
//!
//!     fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>, Self::Error> {
//!         Ok(vec![Detection::new("banana", 0.9, self.0)])
//!     }
//! }
//! ```

use servo_types::{Detection, Frame, VelocityCommand};
use thiserror::Error;

/// 协作者错误分类
pub trait CollaboratorFault {
    /// 是否为瞬时故障（下个周期可能恢复）
    fn is_transient(&self) -> bool;
}

/// 帧源
pub trait FrameSource {
    type Error: std::error::Error + CollaboratorFault + Send + Sync + 'static;

    /// 获取 `camera_id` 的当前帧（阻塞）
    fn get_frame(&mut self, camera_id: &str) -> Result<Frame, Self::Error>;
}

/// 检测器
///
/// 返回顺序不作保证，控制器只按置信度选取。
pub trait Detector {
    type Error: std::error::Error + CollaboratorFault + Send + Sync + 'static;

    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Self::Error>;
}

/// 底盘执行器
///
/// 每次调用执行一个控制周期，调用之间不排队。
pub trait BaseActuator {
    type Error: std::error::Error + Send + Sync + 'static;

    fn move_base(&mut self, command: VelocityCommand) -> Result<(), Self::Error>;
}

impl<T: FrameSource + ?Sized> FrameSource for &mut T {
    type Error = T::Error;

    fn get_frame(&mut self, camera_id: &str) -> Result<Frame, Self::Error> {
        (**self).get_frame(camera_id)
    }
}

impl<T: Detector + ?Sized> Detector for &mut T {
    type Error = T::Error;

    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Self::Error> {
        (**self).detect(frame)
    }
}

impl<T: BaseActuator + ?Sized> BaseActuator for &mut T {
    type Error = T::Error;

    fn move_base(&mut self, command: VelocityCommand) -> Result<(), Self::Error> {
        (**self).move_base(command)
    }
}

/// 通用协作者错误
///
/// 适配器可以直接使用，不必定义自己的错误类型。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// 瞬时不可用
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// 配置错误
    #[error("misconfigured: {0}")]
    Misconfigured(String),
}

impl CollaboratorError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn misconfigured(msg: impl Into<String>) -> Self {
        Self::Misconfigured(msg.into())
    }
}

impl CollaboratorFault for CollaboratorError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborator_error_classification() {
        assert!(CollaboratorError::unavailable("busy").is_transient());
        assert!(!CollaboratorError::misconfigured("no such camera").is_transient());
    }

    #[test]
    fn test_collaborator_error_display() {
        let err = CollaboratorError::misconfigured("model not loaded");
        assert_eq!(err.to_string(), "misconfigured: model not loaded");
    }
}
