//! 队列策略（drop disciplines）
//!
//! 每个接口的 output queue 带一个拥塞丢弃策略：TailDrop / RED / PPD / EPD。
//! 策略之间共享“最近丢弃 / 最近接受”的单槽记忆，切换策略不会隐式清空。

use serde::{Deserialize, Serialize};

mod output;
mod rng;

pub use output::{AdmitOutcome, OutputQueue};
pub use rng::DropRng;

/// 一个 cell 的有效载荷位数（48 字节）
pub const CELL_PAYLOAD_BITS: u32 = 48 * 8;

/// 一个 packet 拆分成多少个 cell
pub fn cells_for_bits(bits: u32) -> u32 {
    bits.div_ceil(CELL_PAYLOAD_BITS)
}

/// 丢弃策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Discipline {
    #[serde(rename = "tailDrop")]
    TailDrop,
    #[serde(rename = "RED")]
    Red,
    #[serde(rename = "PPD")]
    Ppd,
    #[serde(rename = "EPD")]
    Epd,
}

impl Default for Discipline {
    fn default() -> Self {
        Discipline::TailDrop
    }
}

/// 接口 output queue 配置
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueConfig {
    /// 队列容量（cells）
    pub capacity: usize,
    /// 超过该占用后开始按概率丢弃
    pub drop_start_threshold: usize,
    /// 每个 tick 最多上线路的 cell 数
    pub drain_rate: usize,
    pub discipline: Discipline,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 20,
            drop_start_threshold: 10,
            drain_rate: 10,
            discipline: Discipline::TailDrop,
        }
    }
}
