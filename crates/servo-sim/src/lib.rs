//! # Servo Sim
//!
//! 对中控制器的仿真协作者：相机、检测器和底盘共享同一个场景。
//!
//! ```rust
//! use servo_control::{ControllerConfig, center_object};
//! use servo_sim::{SceneConfig, SimScene};
//! use std::time::Duration;
//!
//! let scene = SimScene::new(SceneConfig::default().with_start_pixel(450.0, 180.0)).unwrap();
//! let config = ControllerConfig::default()
//!     .with_verbose(false)
//!     .with_settle_delay(Duration::ZERO);
//!
//! let result = center_object(
//!     &config,
//!     &mut scene.camera(),
//!     &mut scene.detector(),
//!     &mut scene.base(),
//! )
//! .unwrap();
//! assert!(result.success);
//! ```

pub mod base;
pub mod camera;
pub mod detector;
pub mod error;
pub mod scene;

pub use base::SimBase;
pub use camera::SimCamera;
pub use detector::BlobDetector;
pub use error::SimError;
pub use scene::{SceneConfig, SimScene};
