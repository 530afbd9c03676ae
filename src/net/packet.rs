//! 数据包类型
//!
//! 定义被拆分进 cell 的 packet 及其元数据。

use std::net::Ipv4Addr;

use crate::queue::cells_for_bits;

/// packet 标识。在拆分成 cell 时分配一次，此后随该 packet 的
/// 每个 cell 携带，供 PPD/EPD 按值比较。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketId(pub u64);

/// 网络数据包
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub id: PacketId,
    pub source: Ipv4Addr,
    pub dest: Ipv4Addr,
    /// 大小（bits）
    pub size_bits: u32,
    /// 累计延迟（ticks）。和 `finish_time` 一样只作为元数据携带，
    /// 当前没有算法写入或消费。
    pub delay: u32,
    /// WFQ 调度的预期完成时间。目前没有任何算法消费它。
    pub finish_time: f64,
}

impl Packet {
    pub fn new(id: PacketId, source: Ipv4Addr, dest: Ipv4Addr, size_bits: u32) -> Self {
        Self {
            id,
            source,
            dest,
            size_bits,
            delay: 0,
            finish_time: 0.0,
        }
    }

    /// 该 packet 需要多少个 cell
    pub fn cells_needed(&self) -> u32 {
        cells_for_bits(self.size_bits)
    }
}
