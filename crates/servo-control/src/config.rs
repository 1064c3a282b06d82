//! 对中控制器配置
//!
//! [`ControllerConfig`] 在一次对中调用期间不可变，由调用方构造。默认值：
//!
//! | 字段 | 默认值 |
//! |---|---|
//! | `target_label` | `"banana"` |
//! | `tolerance_px` | `30.0` |
//! | `max_iterations` | `20` |
//! | `gain` | `0.0015` |
//! | `camera_id` | `"309622300814"`（腕部相机序列号） |
//! | `verbose` | `true` |
//! | `settle_delay_ms` | `300` |
//! | `frame_failure_policy` | `TreatAsMiss` |
//! | `mount` | [`CameraMount::wrist_down`] |
//! | `limits` | 无（不钳位） |
//!
//! # 示例
//!
//! ```rust
//! use servo_control::ControllerConfig;
//! use std::time::Duration;
//!
//! let config = ControllerConfig::new("cup")
//!     .with_tolerance(20.0)
//!     .with_gain(0.001)
//!     .with_settle_delay(Duration::ZERO);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{CenterError, Result};
use serde::{Deserialize, Serialize};
use servo_tools::VelocityLimits;
use servo_types::CameraMount;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TARGET: &str = "banana";
pub const DEFAULT_TOLERANCE_PX: f64 = 30.0;
pub const DEFAULT_MAX_ITERATIONS: usize = 20;
pub const DEFAULT_GAIN: f64 = 0.0015;
pub const DEFAULT_CAMERA_ID: &str = "309622300814";
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 300;

/// 帧获取失败的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameFailurePolicy {
    /// 瞬时失败按未检测到处理，消耗一次迭代
    #[default]
    TreatAsMiss,
    /// 任何帧获取失败都立即返回错误
    Abort,
}

/// 对中控制器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// 目标类别（大小写不敏感）
    pub target_label: String,

    /// 每轴像素容差（含边界）
    pub tolerance_px: f64,

    /// 最大迭代次数
    pub max_iterations: usize,

    /// 增益（速度 / 像素）
    ///
    /// 增益过大会导致振荡，控制器不做校验。
    pub gain: f64,

    /// 相机 ID，原样传给帧源
    pub camera_id: String,

    /// 输出逐周期进度日志
    pub verbose: bool,

    /// 每个周期结束后的等待时间（毫秒），让底盘停稳、相机曝光
    pub settle_delay_ms: u64,

    /// 帧获取失败的处理策略
    pub frame_failure_policy: FrameFailurePolicy,

    /// 相机安装标定
    pub mount: CameraMount,

    /// 速度安全限制（可选扩展，默认不钳位）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<VelocityLimits>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            target_label: DEFAULT_TARGET.to_string(),
            tolerance_px: DEFAULT_TOLERANCE_PX,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            gain: DEFAULT_GAIN,
            camera_id: DEFAULT_CAMERA_ID.to_string(),
            verbose: true,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            frame_failure_policy: FrameFailurePolicy::default(),
            mount: CameraMount::default(),
            limits: None,
        }
    }
}

impl ControllerConfig {
    /// 以默认参数创建，指定目标类别
    pub fn new(target_label: impl Into<String>) -> Self {
        Self {
            target_label: target_label.into(),
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance_px: f64) -> Self {
        self.tolerance_px = tolerance_px;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = gain;
        self
    }

    pub fn with_camera_id(mut self, camera_id: impl Into<String>) -> Self {
        self.camera_id = camera_id.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_frame_failure_policy(mut self, policy: FrameFailurePolicy) -> Self {
        self.frame_failure_policy = policy;
        self
    }

    pub fn with_mount(mut self, mount: CameraMount) -> Self {
        self.mount = mount;
        self
    }

    pub fn with_limits(mut self, limits: VelocityLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// 校验参数
    ///
    /// 增益只要求是有限值；非正增益会在启动时输出警告，但不拒绝。
    pub fn validate(&self) -> Result<()> {
        if self.target_label.trim().is_empty() {
            return Err(CenterError::invalid_parameter(
                "target_label",
                "must not be empty",
            ));
        }
        if !(self.tolerance_px > 0.0 && self.tolerance_px.is_finite()) {
            return Err(CenterError::invalid_parameter(
                "tolerance_px",
                format!("must be positive and finite, got {}", self.tolerance_px),
            ));
        }
        if self.max_iterations == 0 {
            return Err(CenterError::invalid_parameter(
                "max_iterations",
                "must be > 0",
            ));
        }
        if !self.gain.is_finite() {
            return Err(CenterError::invalid_parameter(
                "gain",
                format!("must be finite, got {}", self.gain),
            ));
        }
        if let Some(limits) = &self.limits {
            limits
                .validate()
                .map_err(|e| CenterError::invalid_parameter("limits", e.to_string()))?;
        }
        Ok(())
    }

    /// 从 TOML 文件加载
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| CenterError::ConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| CenterError::ConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// 保存为 TOML 文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| CenterError::ConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        fs::write(path, content).map_err(|e| CenterError::ConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
