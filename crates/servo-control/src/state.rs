//! 对中状态机
//!
//! ```text
//! Searching  ── detection, |e| >  tol ──► Correcting
//! Correcting ── detection, |e| >  tol ──► Correcting
//! Correcting ── miss                  ──► Searching
//! Searching | Correcting ── detection, |e| <= tol ──► Centered  (终止)
//! Searching | Correcting ── 迭代次数耗尽           ──► Exhausted (终止)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// 对中状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CenteringState {
    /// 本周期尚无有效检测（初始状态）
    #[default]
    Searching,
    /// 检测到目标，误差超出容差，已下发命令
    Correcting,
    /// 终止：目标已对中
    Centered,
    /// 终止：迭代次数耗尽
    Exhausted,
}

impl CenteringState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Centered | Self::Exhausted)
    }

    /// 本周期未检测到目标
    pub fn on_miss(self) -> Self {
        if self.is_terminal() { self } else { Self::Searching }
    }

    /// 本周期检测到目标
    pub fn on_detection(self, within_tolerance: bool) -> Self {
        match (self.is_terminal(), within_tolerance) {
            (true, _) => self,
            (false, true) => Self::Centered,
            (false, false) => Self::Correcting,
        }
    }

    /// 迭代次数耗尽
    pub fn on_exhausted(self) -> Self {
        if self.is_terminal() { self } else { Self::Exhausted }
    }
}

impl fmt::Display for CenteringState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Searching => "SEARCHING",
            Self::Correcting => "CORRECTING",
            Self::Centered => "CENTERED",
            Self::Exhausted => "EXHAUSTED",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        assert_eq!(CenteringState::default(), CenteringState::Searching);
        assert!(!CenteringState::Searching.is_terminal());
    }

    #[test]
    fn test_transitions() {
        use CenteringState::*;

        assert_eq!(Searching.on_detection(false), Correcting);
        assert_eq!(Correcting.on_detection(false), Correcting);
        assert_eq!(Searching.on_detection(true), Centered);
        assert_eq!(Correcting.on_detection(true), Centered);
        assert_eq!(Correcting.on_miss(), Searching);
        assert_eq!(Searching.on_miss(), Searching);
        assert_eq!(Searching.on_exhausted(), Exhausted);
        assert_eq!(Correcting.on_exhausted(), Exhausted);
    }

    #[test]
    fn test_terminal_states_are_sticky() {
        use CenteringState::*;

        for terminal in [Centered, Exhausted] {
            assert!(terminal.is_terminal());
            assert_eq!(terminal.on_miss(), terminal);
            assert_eq!(terminal.on_detection(true), terminal);
            assert_eq!(terminal.on_detection(false), terminal);
            assert_eq!(terminal.on_exhausted(), terminal);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(CenteringState::Centered.to_string(), "CENTERED");
        assert_eq!(CenteringState::Exhausted.to_string(), "EXHAUSTED");
    }
}
