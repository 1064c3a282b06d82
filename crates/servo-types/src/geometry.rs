//! 像素几何与速度命令
//!
//! - [`PixelPoint`]: 图像中的绝对像素位置
//! - [`PixelError`]: 检测中心相对图像中心的偏差
//! - [`VelocityCommand`]: 下发给底盘的二维速度命令
//!
//! # 示例
//!
//! ```rust
//! use servo_types::{PixelError, PixelPoint};
//!
//! let center = PixelPoint::new(320.0, 240.0);
//! let err = PixelError::between(PixelPoint::new(350.0, 245.0), center);
//! assert_eq!(err.du, 30.0);
//! assert_eq!(err.dv, 5.0);
//! assert!(err.within(30.0));
//! ```

use std::fmt;
use std::ops::Mul;

/// 像素坐标（`u` 为列，`v` 为行）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelPoint {
    pub u: f64,
    pub v: f64,
}

impl PixelPoint {
    #[inline]
    pub const fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }

    /// 四舍五入为整数像素
    #[inline]
    pub fn rounded(self) -> (i32, i32) {
        (self.u.round() as i32, self.v.round() as i32)
    }

    /// 两个坐标是否都是有限值
    #[inline]
    pub fn is_finite(self) -> bool {
        self.u.is_finite() && self.v.is_finite()
    }
}

impl fmt::Display for PixelPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.0}, {:.0})", self.u, self.v)
    }
}

/// 像素误差
///
/// `du = u - center.u`（正值：目标在中心右侧）
/// `dv = v - center.v`（正值：目标在中心下方）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelError {
    pub du: f64,
    pub dv: f64,
}

impl PixelError {
    pub const ZERO: Self = Self { du: 0.0, dv: 0.0 };

    #[inline]
    pub const fn new(du: f64, dv: f64) -> Self {
        Self { du, dv }
    }

    /// 计算 `point` 相对 `center` 的误差
    #[inline]
    pub fn between(point: PixelPoint, center: PixelPoint) -> Self {
        Self {
            du: point.u - center.u,
            dv: point.v - center.v,
        }
    }

    /// 两轴是否都在容差内（含边界）
    ///
    /// 容差按轴独立判断，不是欧氏距离。
    #[inline]
    pub fn within(self, tolerance_px: f64) -> bool {
        self.du.abs() <= tolerance_px && self.dv.abs() <= tolerance_px
    }

    /// 欧氏范数（仅用于日志/统计）
    #[inline]
    pub fn norm(self) -> f64 {
        self.du.hypot(self.dv)
    }
}

impl fmt::Display for PixelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+.0}, {:+.0})", self.du, self.dv)
    }
}

/// 底盘速度命令
///
/// 单位由底盘执行器定义（通常为一个控制周期内的位移，米）。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VelocityCommand {
    /// 前后方向（正值：向前）
    pub forward_back: f64,
    /// 左右方向（正方向由底盘执行器定义）
    pub left_right: f64,
}

impl VelocityCommand {
    /// 零速度
    pub const ZERO: Self = Self {
        forward_back: 0.0,
        left_right: 0.0,
    };

    #[inline]
    pub const fn new(forward_back: f64, left_right: f64) -> Self {
        Self {
            forward_back,
            left_right,
        }
    }

    /// 对两轴分别应用同一个函数
    #[inline]
    pub fn map(self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self {
            forward_back: f(self.forward_back),
            left_right: f(self.left_right),
        }
    }

    /// 两轴绝对值的最大值
    #[inline]
    pub fn max_abs(self) -> f64 {
        self.forward_back.abs().max(self.left_right.abs())
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.forward_back == 0.0 && self.left_right == 0.0
    }
}

impl Mul<f64> for VelocityCommand {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.map(|x| x * rhs)
    }
}

impl fmt::Display for VelocityCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fb={:+.4}, lr={:+.4}",
            self.forward_back, self.left_right
        )
    }
}
