//! 检测结果
//!
//! 检测器每次推理产生一组新的 [`Detection`]，控制器只读取，不修改，用完即丢弃。

use crate::geometry::PixelPoint;

/// 像素空间包围盒（`x1,y1` 左上角，`x2,y2` 右下角）
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// 包围盒中点
    #[inline]
    pub fn center(&self) -> PixelPoint {
        PixelPoint::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

/// 单个检测结果
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Detection {
    /// 类别名称
    pub label: String,
    /// 置信度 `[0, 1]`
    pub confidence: f64,
    /// 像素中心
    pub center: PixelPoint,
    /// 包围盒（部分检测器不提供）
    pub bbox: Option<BoundingBox>,
}

impl Detection {
    /// 由中心点构建（无包围盒）
    pub fn new(label: impl Into<String>, confidence: f64, center: PixelPoint) -> Self {
        Self {
            label: label.into(),
            confidence,
            center,
            bbox: None,
        }
    }

    /// 由包围盒构建，中心取包围盒中点
    pub fn from_box(label: impl Into<String>, confidence: f64, bbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            confidence,
            center: bbox.center(),
            bbox: Some(bbox),
        }
    }

    /// 标签是否匹配（ASCII 大小写不敏感）
    #[inline]
    pub fn matches(&self, label: &str) -> bool {
        self.label.eq_ignore_ascii_case(label)
    }
}
