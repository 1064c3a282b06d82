//! # Servo Tools - 共享数据结构和算法
//!
//! **依赖原则**: 只依赖 `servo-types`，避免依赖 `servo-control`
//!
//! ## 包含模块
//!
//! - `safety` - 速度安全限制（阻尼 + 单步钳位）
//! - `recording` - 对中过程的逐帧记录（JSON 持久化）

pub mod recording;
pub mod safety;

// 重新导出常用类型
pub use recording::{CenteringRecording, IterationOutcome, IterationRecord, RecordingMetadata};
pub use safety::{LimitsError, VelocityLimits};
