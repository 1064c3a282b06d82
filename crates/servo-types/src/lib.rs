//! # Servo Types
//!
//! 视觉伺服的数据模型（无硬件依赖）
//!
//! ## 模块
//!
//! - `frame`: 相机图像帧
//! - `detection`: 检测结果（标签、置信度、像素中心、包围盒）
//! - `geometry`: 像素坐标、像素误差、速度命令
//! - `mount`: 相机安装方向（像素轴 → 底盘运动轴的符号标定）
//!
//! ## 坐标约定
//!
//! 像素坐标原点在图像左上角，`u` 向右为正，`v` 向下为正。
//! 底盘速度命令为 `(forward_back, left_right)`，两轴的符号由 [`CameraMount`] 决定。

pub mod detection;
pub mod frame;
pub mod geometry;
pub mod mount;

// 重新导出常用类型
pub use detection::{BoundingBox, Detection};
pub use frame::{Frame, FrameError, PixelFormat};
pub use geometry::{PixelError, PixelPoint, VelocityCommand};
pub use mount::{AxisSign, CameraMount};
