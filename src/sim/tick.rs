//! 仿真时间类型
//!
//! 定义离散仿真时间（tick）。

/// 仿真时间（离散 tick，从 0 开始）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// 下一个 tick
    pub fn next(self) -> Tick {
        Tick(self.0.saturating_add(1))
    }
}
