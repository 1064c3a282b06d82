//! 相机图像帧
//!
//! [`Frame`] 是帧源和检测器之间传递的唯一数据结构。像素数据使用 `bytes::Bytes`，
//! 克隆只增加引用计数，不复制图像。

use crate::geometry::PixelPoint;
use bytes::Bytes;
use thiserror::Error;

/// 像素格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    /// 8 位灰度
    Gray8,
    /// 24 位 RGB（交错）
    Rgb8,
}

impl PixelFormat {
    /// 每像素字节数
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb8 => 3,
        }
    }
}

/// 帧构造错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Invalid frame dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid frame buffer length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// 单帧图像
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    camera_id: String,
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Bytes,
    sequence: u64,
}

impl Frame {
    /// 创建新帧
    ///
    /// # 错误
    ///
    /// - 宽或高为 0
    /// - 尺寸乘积溢出
    /// - `data` 长度与 `width * height * bytes_per_pixel` 不一致
    pub fn new(
        camera_id: impl Into<String>,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: impl Into<Bytes>,
    ) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::InvalidDimensions { width, height });
        }

        let data = data.into();
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(format.bytes_per_pixel()))
            .ok_or(FrameError::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(FrameError::InvalidLength {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            camera_id: camera_id.into(),
            width,
            height,
            format,
            data,
            sequence: 0,
        })
    }

    /// 设置帧序号
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn camera_id(&self) -> &str {
        &self.camera_id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// 图像中心 `(width / 2, height / 2)`
    #[inline]
    pub fn center(&self) -> PixelPoint {
        PixelPoint::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// 读取一行像素（越界返回 `None`）
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.width as usize * self.format.bytes_per_pixel();
        let start = y as usize * stride;
        self.data.get(start..start + stride)
    }
}
