//! # Servo Control
//!
//! 腕部相机视觉伺服：移动底盘，使检测到的目标保持在图像中心。
//!
//! # 架构
//!
//! 控制器由三个注入的协作者组成，本身不实现它们：
//!
//! - [`FrameSource`]: 按相机 ID 取帧
//! - [`Detector`]: 检测图像中的带标签目标
//! - [`BaseActuator`]: 执行二维底盘速度命令
//!
//! # 快速开始
//!
//! ```rust,ignore
//! use servo_control::{CenteringController, ControllerConfig};
//!
//! let config = ControllerConfig::new("banana").with_tolerance(20.0);
//! let mut controller = CenteringController::new(config)?;
//! let result = controller.run(&mut camera, &mut detector, &mut base)?;
//! let (success, position) = result.into_tuple();
//! ```

pub mod cancel;
pub mod collaborator;
pub mod config;
pub mod controller;
pub mod error;
pub mod result;
pub mod state;

// 重新导出常用类型
pub use cancel::CancelToken;
pub use collaborator::{BaseActuator, CollaboratorError, CollaboratorFault, Detector, FrameSource};
pub use config::{ControllerConfig, FrameFailurePolicy};
pub use controller::{CenteringController, center_object, select_target};
pub use error::{CenterError, Result};
pub use result::ControllerResult;
pub use state::CenteringState;

// 数据模型和工具层
pub use servo_tools::{
    CenteringRecording, IterationOutcome, IterationRecord, RecordingMetadata, VelocityLimits,
};
pub use servo_types::{
    AxisSign, BoundingBox, CameraMount, Detection, Frame, PixelError, PixelFormat, PixelPoint,
    VelocityCommand,
};
