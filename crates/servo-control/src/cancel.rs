//! 协作式取消
//!
//! 控制器在每个周期开始前检查一次取消标志。正在执行的帧获取、检测或底盘命令不会被打断。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 取消令牌（可克隆，克隆体共享同一个标志）
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求取消
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
