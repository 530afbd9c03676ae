//! 接口类型
//!
//! 每个接口有一个无界 input queue（每 tick 清空）和一个带拥塞策略的
//! 有界 output queue，归属且只归属一个元素。

use std::collections::VecDeque;

use super::cell::Cell;
use super::id::{ElementId, LinkId, NicId};
use crate::queue::{OutputQueue, QueueConfig};

/// 网络接口
#[derive(Debug)]
pub struct Nic {
    pub id: NicId,
    pub owner: ElementId,
    pub link: Option<LinkId>,
    input: VecDeque<Cell>,
    pub output: OutputQueue,
}

impl Nic {
    pub fn new(id: NicId, owner: ElementId, cfg: QueueConfig, seed: u64) -> Self {
        Self {
            id,
            owner,
            link: None,
            input: VecDeque::new(),
            output: OutputQueue::new(cfg, seed),
        }
    }

    /// 链路送达的 cell 进 input queue（无界）。
    pub fn push_input(&mut self, cell: Cell) {
        self.input.push_back(cell);
    }

    /// 取走 input queue 的全部 cell。
    pub fn take_input(&mut self) -> VecDeque<Cell> {
        std::mem::take(&mut self.input)
    }

    pub fn input_len(&self) -> usize {
        self.input.len()
    }
}
