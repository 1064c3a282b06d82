//! 相机安装方向标定
//!
//! 腕部相机朝下安装时，图像的行方向（`v`）对应底盘前后运动，列方向（`u`）对应左右运动。
//! 每个轴的符号取决于相机的物理安装，只需标定一次，控制算法本身不关心。
//!
//! 默认安装（[`CameraMount::wrist_down`]）：
//!
//! - 图像上方 = 远离底盘，因此 `dv < 0` 产生 `forward_back > 0`（向目标前进）
//! - 图像右方 = 底盘执行器的正 `left_right` 方向，因此 `du > 0` 产生 `left_right > 0`
//!
//! 其他安装方式可以通过 [`CameraMount::new`] 配置，不需要修改控制算法。

use crate::geometry::{PixelError, VelocityCommand};
use std::fmt;
use std::str::FromStr;

/// 轴符号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AxisSign {
    #[default]
    Positive,
    Negative,
}

impl AxisSign {
    #[inline]
    pub const fn factor(self) -> f64 {
        match self {
            AxisSign::Positive => 1.0,
            AxisSign::Negative => -1.0,
        }
    }

    /// 零值输出 `+0.0`
    #[inline]
    pub fn apply(self, value: f64) -> f64 {
        value * self.factor() + 0.0
    }
}

impl fmt::Display for AxisSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisSign::Positive => write!(f, "positive"),
            AxisSign::Negative => write!(f, "negative"),
        }
    }
}

impl FromStr for AxisSign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "+" | "positive" | "pos" => Ok(AxisSign::Positive),
            "-" | "negative" | "neg" => Ok(AxisSign::Negative),
            other => Err(format!(
                "invalid axis sign '{}' (expected positive/negative)",
                other
            )),
        }
    }
}

/// 相机安装标定：像素误差轴 → 底盘运动轴的符号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraMount {
    /// `dv` → `forward_back` 的符号
    pub forward_sign: AxisSign,
    /// `du` → `left_right` 的符号
    pub lateral_sign: AxisSign,
}

impl CameraMount {
    pub const fn new(forward_sign: AxisSign, lateral_sign: AxisSign) -> Self {
        Self {
            forward_sign,
            lateral_sign,
        }
    }

    /// 朝下安装的腕部相机（默认）
    pub const fn wrist_down() -> Self {
        Self::new(AxisSign::Negative, AxisSign::Positive)
    }

    /// 两轴均为正号
    pub const fn identity() -> Self {
        Self::new(AxisSign::Positive, AxisSign::Positive)
    }

    /// 将像素误差按增益映射为速度命令
    ///
    /// `forward_back = ±gain * dv`，`left_right = ±gain * du`。
    #[inline]
    pub fn command(&self, error: PixelError, gain: f64) -> VelocityCommand {
        VelocityCommand::new(
            self.forward_sign.apply(gain * error.dv),
            self.lateral_sign.apply(gain * error.du),
        )
    }

    /// 反向投影：目标相对相机光轴在底盘坐标下的偏移（米）→ 像素误差
    ///
    /// 与 [`command`](Self::command) 使用同一套符号，因此沿命令方向移动底盘总是减小误差。
    #[inline]
    pub fn project(&self, forward_offset: f64, lateral_offset: f64, pixels_per_meter: f64) -> PixelError {
        PixelError::new(
            self.lateral_sign.apply(lateral_offset * pixels_per_meter),
            self.forward_sign.apply(forward_offset * pixels_per_meter),
        )
    }
}

impl Default for CameraMount {
    fn default() -> Self {
        Self::wrist_down()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrist_down_quadrants() {
        let mount = CameraMount::wrist_down();
        let gain = 0.001;

        // 目标在中心上方（远离底盘）→ 向前
        let up = mount.command(PixelError::new(0.0, -100.0), gain);
        assert!(up.forward_back > 0.0);
        assert_eq!(up.left_right, 0.0);

        // 目标在中心下方 → 向后
        let down = mount.command(PixelError::new(0.0, 100.0), gain);
        assert!(down.forward_back < 0.0);

        // 目标在右侧 → 正 left_right
        let right = mount.command(PixelError::new(100.0, 0.0), gain);
        assert!(right.left_right > 0.0);
        assert_eq!(right.forward_back, 0.0);

        // 目标在左侧 → 负 left_right
        let left = mount.command(PixelError::new(-100.0, 0.0), gain);
        assert!(left.left_right < 0.0);
    }

    #[test]
    fn test_zero_error_axis_has_no_sign() {
        let cmd = CameraMount::wrist_down().command(PixelError::new(80.0, 0.0), 0.0015);
        assert!(cmd.forward_back.is_sign_positive(), "forward_back = {}", cmd.forward_back);
        assert_eq!(cmd.to_string(), "fb=+0.0000, lr=+0.1200");
        assert!(AxisSign::Negative.apply(0.0).is_sign_positive());
    }

    #[test]
    fn test_identity_is_plain_scaling() {
        let cmd = CameraMount::identity().command(PixelError::new(80.0, 0.0), 0.0015);
        assert!((cmd.left_right - 0.12).abs() < 1e-12);
        assert_eq!(cmd.forward_back, 0.0);
    }

    #[test]
    fn test_project_is_consistent_with_command() {
        for mount in [
            CameraMount::wrist_down(),
            CameraMount::identity(),
            CameraMount::new(AxisSign::Positive, AxisSign::Negative),
        ] {
            let err = mount.project(0.2, -0.1, 400.0);
            let cmd = mount.command(err, 0.001);
            // 命令方向与偏移方向一致
            assert!(cmd.forward_back > 0.0);
            assert!(cmd.left_right < 0.0);
        }
    }

    #[test]
    fn test_axis_sign_from_str() {
        assert_eq!("+".parse::<AxisSign>(), Ok(AxisSign::Positive));
        assert_eq!("Negative".parse::<AxisSign>(), Ok(AxisSign::Negative));
        assert!("sideways".parse::<AxisSign>().is_err());
    }
}
