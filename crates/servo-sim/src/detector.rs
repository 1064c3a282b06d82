//! 阈值检测器
//!
//! 把灰度帧中所有不低于阈值的像素当作同一个目标，取它们的外接矩形作为包围盒。
//! 可选的漏检和中心噪声使用带种子的 `StdRng`，相同种子的运行结果可复现。

use crate::error::SimError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use servo_control::Detector;
use servo_types::{BoundingBox, Detection, Frame, PixelFormat};

/// 默认亮度阈值
pub const DEFAULT_THRESHOLD: u8 = 128;

/// 阈值检测器
#[derive(Debug, Clone)]
pub struct BlobDetector {
    label: String,
    confidence: f64,
    threshold: u8,
    dropout: f64,
    noise_px: f64,
    rng: StdRng,
}

impl BlobDetector {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
            threshold: DEFAULT_THRESHOLD,
            dropout: 0.0,
            noise_px: 0.0,
            rng: StdRng::seed_from_u64(0),
        }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// 漏检概率，超出 `[0, 1]` 时截断
    pub fn with_dropout(mut self, dropout: f64) -> Self {
        self.dropout = dropout.clamp(0.0, 1.0);
        self
    }

    /// 包围盒整体平移的均匀噪声幅度（像素）
    pub fn with_noise(mut self, noise_px: f64) -> Self {
        self.noise_px = noise_px.max(0.0);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// 亮像素的外接矩形
    fn bright_region(&self, frame: &Frame) -> Option<BoundingBox> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for y in 0..frame.height() {
            let Some(row) = frame.row(y) else { break };
            let mut lit = row
                .iter()
                .enumerate()
                .filter(|(_, p)| **p >= self.threshold)
                .map(|(x, _)| x as u32);
            let Some(first) = lit.next() else { continue };
            let last = lit.last().unwrap_or(first);

            bounds = Some(match bounds {
                None => (first, y, last, y),
                Some((x0, y0, x1, _)) => (x0.min(first), y0, x1.max(last), y),
            });
        }

        bounds.map(|(x0, y0, x1, y1)| {
            BoundingBox::new(
                f64::from(x0),
                f64::from(y0),
                f64::from(x1) + 1.0,
                f64::from(y1) + 1.0,
            )
        })
    }
}

impl Detector for BlobDetector {
    type Error = SimError;

    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Self::Error> {
        if frame.format() != PixelFormat::Gray8 {
            return Err(SimError::UnsupportedFormat(frame.format()));
        }

        let Some(mut bbox) = self.bright_region(frame) else {
            return Ok(Vec::new());
        };

        if self.dropout > 0.0 && self.rng.gen_bool(self.dropout) {
            tracing::debug!(sequence = frame.sequence(), "Simulated detection dropout");
            return Ok(Vec::new());
        }

        if self.noise_px > 0.0 {
            let du = self.rng.gen_range(-self.noise_px..=self.noise_px);
            let dv = self.rng.gen_range(-self.noise_px..=self.noise_px);
            bbox = BoundingBox::new(bbox.x1 + du, bbox.y1 + dv, bbox.x2 + du, bbox.y2 + dv);
        }

        Ok(vec![Detection::from_box(
            self.label.clone(),
            self.confidence,
            bbox,
        )])
    }
}
