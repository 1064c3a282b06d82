//! 对中结果

use crate::state::CenteringState;
use servo_tools::CenteringRecording;
use servo_types::PixelPoint;

/// 一次对中调用的结果（终止时产生一次）
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerResult {
    /// 是否对中成功
    pub success: bool,

    /// 成功时为最后一次检测的绝对像素中心（不是误差）
    pub final_pixel_position: Option<PixelPoint>,

    /// 终止状态（`Centered` 或 `Exhausted`）
    pub state: CenteringState,

    /// 实际执行的周期数
    pub iterations: usize,

    /// 下发的底盘命令数
    pub commands_issued: usize,

    /// 逐周期记录
    pub recording: CenteringRecording,
}

impl ControllerResult {
    /// `(success, position)`，位置四舍五入为整数像素
    pub fn into_tuple(self) -> (bool, Option<(i32, i32)>) {
        (self.success, self.final_pixel_position.map(PixelPoint::rounded))
    }
}
