//! 拥塞控制 output queue
//!
//! 每个接口一个：cell 在这里排队等待上线路，入队时按当前策略决定收下还是丢弃。
//! PPD/EPD 的“最近丢弃 / 最近接受”记忆各只有一个槽位，按 packet id 比较；
//! 多个 packet 交错到达时只能记住最近的一个，不做按 packet 的泛化。

use std::collections::VecDeque;

use crate::net::{Cell, CellPayload, PacketId};

use super::rng::DropRng;
use super::{Discipline, QueueConfig, cells_for_bits};
use tracing::{debug, trace};

/// 入队判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitOutcome {
    Admitted,
    Dropped,
}

impl AdmitOutcome {
    pub fn is_admitted(self) -> bool {
        matches!(self, AdmitOutcome::Admitted)
    }
}

/// 拥塞控制 output queue
#[derive(Debug)]
pub struct OutputQueue {
    cfg: QueueConfig,
    q: VecDeque<Cell>,
    rng: DropRng,
    prev_dropped: Option<PacketId>,
    prev_accepted: Option<PacketId>,
}

impl OutputQueue {
    pub fn new(cfg: QueueConfig, seed: u64) -> Self {
        Self {
            cfg,
            q: VecDeque::new(),
            rng: DropRng::new(seed),
            prev_dropped: None,
            prev_accepted: None,
        }
    }

    pub fn config(&self) -> &QueueConfig {
        &self.cfg
    }

    pub fn discipline(&self) -> Discipline {
        self.cfg.discipline
    }

    /// 切换丢弃策略。记忆槽位不随切换清空。
    pub fn set_discipline(&mut self, discipline: Discipline) {
        self.cfg.discipline = discipline;
    }

    pub fn set_config(&mut self, cfg: QueueConfig) {
        self.cfg = cfg;
    }

    /// 显式清空 PPD/EPD 的记忆槽位。
    pub fn reset_memory(&mut self) {
        self.prev_dropped = None;
        self.prev_accepted = None;
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    pub fn drain_rate(&self) -> usize {
        self.cfg.drain_rate
    }

    /// 入队判定：按当前策略收下或丢弃这个 cell。不重试。
    pub fn admit(&mut self, cell: Cell) -> AdmitOutcome {
        let trace_id = cell.trace_id;
        let outcome = match self.cfg.discipline {
            Discipline::TailDrop => self.admit_tail(cell),
            Discipline::Red => self.admit_red(cell),
            Discipline::Ppd => self.admit_ppd(cell),
            Discipline::Epd => self.admit_epd(cell),
        };
        debug!(
            trace_id,
            len = self.q.len(),
            discipline = ?self.cfg.discipline,
            outcome = ?outcome,
            "入队判定"
        );
        outcome
    }

    /// 出队：FIFO 取走最多 `min(n, len)` 个 cell 交给链路。
    pub fn drain(&mut self, n: usize) -> Vec<Cell> {
        let take = n.min(self.q.len());
        self.q.drain(..take).collect()
    }

    /// RED 判定：占用超过阈值后以 `(occ - T) / (C - T)` 的概率丢弃。
    fn red_drop_at(&mut self, occupancy: usize) -> bool {
        let t = self.cfg.drop_start_threshold;
        if occupancy <= t {
            return false;
        }
        let p = (occupancy - t) as f64 / (self.cfg.capacity as f64 - t as f64);
        let draw = self.rng.next_f64();
        trace!(occupancy, p, draw, "RED 抽签");
        draw <= p
    }

    fn admit_tail(&mut self, cell: Cell) -> AdmitOutcome {
        if self.q.len() < self.cfg.capacity {
            self.q.push_back(cell);
            AdmitOutcome::Admitted
        } else {
            AdmitOutcome::Dropped
        }
    }

    fn admit_red(&mut self, cell: Cell) -> AdmitOutcome {
        if self.red_drop_at(self.q.len()) {
            AdmitOutcome::Dropped
        } else {
            self.q.push_back(cell);
            AdmitOutcome::Admitted
        }
    }

    fn admit_ppd(&mut self, cell: Cell) -> AdmitOutcome {
        // 最近丢弃的 packet 的后续 cell 直接丢，不再抽签
        if self.prev_dropped.is_some() && cell.packet_id() == self.prev_dropped {
            return AdmitOutcome::Dropped;
        }
        if self.red_drop_at(self.q.len()) {
            self.prev_dropped = cell.packet_id();
            return AdmitOutcome::Dropped;
        }
        self.q.push_back(cell);
        AdmitOutcome::Admitted
    }

    fn admit_epd(&mut self, cell: Cell) -> AdmitOutcome {
        let id = cell.packet_id();
        if id.is_some() && id == self.prev_dropped {
            return AdmitOutcome::Dropped;
        }
        if id.is_some() && id == self.prev_accepted {
            self.q.push_back(cell);
            return AdmitOutcome::Admitted;
        }

        match &cell.payload {
            // 首 cell：对整个 packet 需要的每个槽位模拟一次 RED 判定
            CellPayload::Header(pkt) => {
                let needed = cells_for_bits(pkt.size_bits);
                let len = self.q.len();
                for i in 0..needed as usize {
                    if self.red_drop_at(len + i) {
                        self.prev_dropped = Some(pkt.id);
                        return AdmitOutcome::Dropped;
                    }
                }
                self.prev_accepted = Some(pkt.id);
                self.q.push_back(cell);
                AdmitOutcome::Admitted
            }
            // 记忆未命中时退回普通 RED 判定
            _ => {
                if self.red_drop_at(self.q.len()) {
                    AdmitOutcome::Dropped
                } else {
                    self.q.push_back(cell);
                    AdmitOutcome::Admitted
                }
            }
        }
    }
}
