//! 仿真底盘
//!
//! 每条命令被当作一次相对位移（米）：底盘向命令方向移动，目标相对相机的偏移减小同样的量。
//! `base_response` 小于 1 时模拟执行不足。

use crate::error::SimError;
use crate::scene::SimScene;
use servo_control::BaseActuator;
use servo_types::VelocityCommand;

/// 仿真底盘
#[derive(Debug, Clone)]
pub struct SimBase {
    scene: SimScene,
    fault_after: Option<usize>,
}

impl SimBase {
    pub fn new(scene: SimScene) -> Self {
        Self {
            scene,
            fault_after: None,
        }
    }

    /// 执行 `n` 条命令后开始报错
    pub fn with_fault_after(mut self, n: usize) -> Self {
        self.fault_after = Some(n);
        self
    }
}

impl BaseActuator for SimBase {
    type Error = SimError;

    fn move_base(&mut self, command: VelocityCommand) -> Result<(), Self::Error> {
        let response = self.scene.config().base_response;
        let fault_after = self.fault_after;

        self.scene.with_state(|state| {
            if let Some(after) = fault_after
                && state.commands.len() >= after
            {
                return Err(SimError::BaseFault { after });
            }

            state.forward_offset -= command.forward_back * response;
            state.lateral_offset -= command.left_right * response;
            state.commands.push(command);
            tracing::trace!(
                forward = state.forward_offset,
                lateral = state.lateral_offset,
                "Simulated base moved"
            );
            Ok(())
        })
    }
}
