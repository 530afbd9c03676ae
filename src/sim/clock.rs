//! 两阶段时钟驱动
//!
//! 每个 tick 按固定元素顺序执行两个阶段：
//! - Phase 1（drain）：所有元素把各自接口 output queue 的 cell 沿链路送进对端 input queue；
//! - Phase 2（dispatch）：所有元素把 input queue 的 cell 交给自身处理逻辑。
//!
//! Phase 2 中新入队的 cell 最早在下一个 tick 的 Phase 1 才会上线路，
//! 因此每跳至少有一个 tick 的延迟。

use crate::net::{NetError, Network};
use super::tick::Tick;
use tracing::{debug, info, trace};

/// 两阶段时钟：维护当前 tick，驱动整个网络 lockstep 前进。
#[derive(Debug, Default)]
pub struct Clock {
    now: Tick,
}

impl Clock {
    /// 获取当前仿真时间
    pub fn now(&self) -> Tick {
        self.now
    }

    /// 推进一个 tick（先 drain 后 dispatch）。
    #[tracing::instrument(skip(self, net), fields(tick = self.now.0))]
    pub fn advance(&mut self, net: &mut Network) -> Result<(), NetError> {
        debug!("⏱️ tick 开始");

        // Phase 1: 所有 drain 必须在任何 dispatch 之前完成
        net.drain_all()?;
        trace!("Phase 1 (drain) 完成");

        // Phase 2
        net.dispatch_all()?;
        trace!("Phase 2 (dispatch) 完成");

        self.now = self.now.next();
        Ok(())
    }

    /// 连续推进 `ticks` 个 tick。
    pub fn run(&mut self, net: &mut Network, ticks: u64) -> Result<(), NetError> {
        for _ in 0..ticks {
            self.advance(net)?;
        }
        info!(now = self.now.0, "✅ 时钟运行完成");
        Ok(())
    }
}
