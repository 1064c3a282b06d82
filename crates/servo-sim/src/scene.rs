//! 仿真场景
//!
//! 场景中只有一个目标，用它相对相机光轴的底盘坐标偏移（米）表示：
//! `forward` 为前方正，`lateral` 为右方正。
//!
//! 相机、检测器和底盘共享同一个 [`SimScene`]：底盘执行命令时改变偏移，
//! 下一次取帧就会看到新的位置。

use crate::base::SimBase;
use crate::camera::SimCamera;
use crate::detector::BlobDetector;
use crate::error::SimError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use servo_types::{CameraMount, PixelError, PixelPoint, VelocityCommand};
use std::sync::Arc;

/// 场景配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// 图像宽度（像素）
    pub width: u32,
    /// 图像高度（像素）
    pub height: u32,
    /// 目标平面上每米对应的像素数
    pub pixels_per_meter: f64,
    /// 目标初始前向偏移（米）
    pub forward_offset: f64,
    /// 目标初始横向偏移（米）
    pub lateral_offset: f64,
    /// 检测器报告的标签
    pub label: String,
    /// 检测器报告的置信度
    pub confidence: f64,
    /// 目标在图像中的边长（像素）
    pub box_size_px: u32,
    /// 相机安装方向
    pub mount: CameraMount,
    /// 底盘实际执行的命令比例（1.0 = 精确执行）
    pub base_response: f64,
    /// 每帧漏检概率 `[0, 1]`
    pub dropout: f64,
    /// 检测中心的均匀噪声幅度（像素）
    pub noise_px: f64,
    /// 随机数种子
    pub seed: u64,
    /// 相机序列号
    pub camera_serial: String,
    /// 失败的取帧序号（从 0 开始）
    pub outage_captures: Vec<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            pixels_per_meter: 400.0,
            forward_offset: 0.4,
            lateral_offset: 0.45,
            label: "banana".to_string(),
            confidence: 0.9,
            box_size_px: 40,
            mount: CameraMount::default(),
            base_response: 1.0,
            dropout: 0.0,
            noise_px: 0.0,
            seed: 0,
            camera_serial: "309622300814".to_string(),
            outage_captures: Vec::new(),
        }
    }
}

impl SceneConfig {
    /// 按目标的初始像素位置设置偏移
    pub fn with_start_pixel(mut self, u: f64, v: f64) -> Self {
        let center = self.image_center();
        let error = PixelError::between(PixelPoint::new(u, v), center);
        self.lateral_offset = self.mount.lateral_sign.apply(error.du) / self.pixels_per_meter;
        self.forward_offset = self.mount.forward_sign.apply(error.dv) / self.pixels_per_meter;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_mount(mut self, mount: CameraMount) -> Self {
        self.mount = mount;
        self
    }

    pub fn with_dropout(mut self, dropout: f64) -> Self {
        self.dropout = dropout;
        self
    }

    pub fn with_noise(mut self, noise_px: f64) -> Self {
        self.noise_px = noise_px;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_base_response(mut self, response: f64) -> Self {
        self.base_response = response;
        self
    }

    pub fn with_camera_serial(mut self, serial: impl Into<String>) -> Self {
        self.camera_serial = serial.into();
        self
    }

    pub fn with_outages(mut self, captures: impl IntoIterator<Item = u64>) -> Self {
        self.outage_captures = captures.into_iter().collect();
        self
    }

    /// 图像中心
    pub fn image_center(&self) -> PixelPoint {
        PixelPoint::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// 验证配置
    pub fn validate(&self) -> Result<(), SimError> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::InvalidScene(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.pixels_per_meter.is_finite() && self.pixels_per_meter > 0.0) {
            return Err(SimError::InvalidScene(format!(
                "pixels_per_meter must be positive, got {}",
                self.pixels_per_meter
            )));
        }
        if !(self.forward_offset.is_finite() && self.lateral_offset.is_finite()) {
            return Err(SimError::InvalidScene("object offset must be finite".to_string()));
        }
        if self.box_size_px == 0 {
            return Err(SimError::InvalidScene("box_size_px must be non-zero".to_string()));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(SimError::InvalidScene(format!(
                "confidence must be in [0, 1], got {}",
                self.confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.dropout) {
            return Err(SimError::InvalidScene(format!(
                "dropout must be in [0, 1], got {}",
                self.dropout
            )));
        }
        if !(self.noise_px.is_finite() && self.noise_px >= 0.0) {
            return Err(SimError::InvalidScene(format!(
                "noise_px must be non-negative, got {}",
                self.noise_px
            )));
        }
        if !self.base_response.is_finite() {
            return Err(SimError::InvalidScene("base_response must be finite".to_string()));
        }
        Ok(())
    }
}

/// 共享的可变场景状态
#[derive(Debug, Default)]
pub(crate) struct SceneState {
    pub(crate) forward_offset: f64,
    pub(crate) lateral_offset: f64,
    pub(crate) captures: u64,
    pub(crate) commands: Vec<VelocityCommand>,
}

/// 仿真场景
///
/// 克隆共享同一份状态。
#[derive(Debug, Clone)]
pub struct SimScene {
    config: Arc<SceneConfig>,
    state: Arc<Mutex<SceneState>>,
}

impl SimScene {
    /// 创建场景
    pub fn new(config: SceneConfig) -> Result<Self, SimError> {
        config.validate()?;
        let state = SceneState {
            forward_offset: config.forward_offset,
            lateral_offset: config.lateral_offset,
            ..SceneState::default()
        };
        Ok(Self {
            config: Arc::new(config),
            state: Arc::new(Mutex::new(state)),
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// 相机
    pub fn camera(&self) -> SimCamera {
        SimCamera::new(self.clone())
    }

    /// 检测器（使用场景配置中的种子）
    pub fn detector(&self) -> BlobDetector {
        BlobDetector::new(self.config.label.clone(), self.config.confidence)
            .with_dropout(self.config.dropout)
            .with_noise(self.config.noise_px)
            .with_seed(self.config.seed)
    }

    /// 底盘
    pub fn base(&self) -> SimBase {
        SimBase::new(self.clone())
    }

    /// 目标当前偏移 `(forward, lateral)`（米）
    pub fn object_offset(&self) -> (f64, f64) {
        let state = self.state.lock();
        (state.forward_offset, state.lateral_offset)
    }

    /// 目标当前的真实像素位置
    pub fn object_pixel(&self) -> PixelPoint {
        let (forward, lateral) = self.object_offset();
        let error = self
            .config
            .mount
            .project(forward, lateral, self.config.pixels_per_meter);
        let center = self.config.image_center();
        PixelPoint::new(center.u + error.du, center.v + error.dv)
    }

    /// 已执行的底盘命令
    pub fn commands(&self) -> Vec<VelocityCommand> {
        self.state.lock().commands.clone()
    }

    /// 已发生的取帧次数（含失败）
    pub fn captures(&self) -> u64 {
        self.state.lock().captures
    }

    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut SceneState) -> R) -> R {
        f(&mut self.state.lock())
    }
}
