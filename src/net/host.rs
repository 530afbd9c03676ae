//! 端主机
//!
//! 全系统同一时刻最多持有一个活动 VC（单呼叫简化）。
//! 出方向 packet 在这里拆分成 cell：首个 cell 携带 packet 元数据，
//! 其余 cell 各携带最多一个载荷的占位数据。

use std::net::Ipv4Addr;

use super::cell::{Cell, SignalMsg};
use super::error::NetError;
use super::id::{ElementId, NicId};
use super::network::Network;
use super::packet::{Packet, PacketId};
use super::stats::DiagKind;
use crate::queue::CELL_PAYLOAD_BITS;
use tracing::{debug, info, warn};

/// 端主机
#[derive(Debug)]
pub struct Host {
    id: ElementId,
    name: String,
    /// 每台主机只有一个接口
    nic: Option<NicId>,
    active_vc: Option<i32>,
    next_trace: u64,
}

impl Host {
    pub fn new(id: ElementId, name: impl Into<String>, trace_base: u64) -> Self {
        Self {
            id,
            name: name.into(),
            nic: None,
            active_vc: None,
            next_trace: trace_base,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attach_nic(&mut self, nic: NicId) {
        self.nic = Some(nic);
    }

    pub fn nic(&self) -> Option<NicId> {
        self.nic
    }

    pub fn active_vc(&self) -> Option<i32> {
        self.active_vc
    }

    /// 向 `dest` 地址的路由器发起呼叫。
    #[tracing::instrument(skip(self, net), fields(host = %self.name))]
    pub fn setup_connection(&mut self, dest: i32, net: &mut Network) -> Result<(), NetError> {
        let Some(nic) = self.nic else {
            warn!("主机没有接口，无法发起呼叫");
            return Ok(());
        };
        self.send_signal(net, nic, 0, SignalMsg::Setup(dest), DiagKind::SentSetup)
    }

    /// 拆除当前活动 VC。没有活动 VC 时为 no-op。
    #[tracing::instrument(skip(self, net), fields(host = %self.name))]
    pub fn end_connection(&mut self, net: &mut Network) -> Result<(), NetError> {
        let (Some(nic), Some(vc)) = (self.nic, self.active_vc.take()) else {
            return Ok(());
        };
        self.send_signal(net, nic, vc, SignalMsg::End(vc), DiagKind::SentEnd)
    }

    /// 把一个 `size_bits` 大小的 packet 拆成 cell 发到活动 VC 上。
    /// 返回分配的 packet id；没有活动 VC 时不发送。
    #[tracing::instrument(skip(self, net), fields(host = %self.name, size_bits))]
    pub fn send_packet(
        &mut self,
        size_bits: u32,
        net: &mut Network,
    ) -> Result<Option<PacketId>, NetError> {
        let Some(nic) = self.nic else {
            warn!("主机没有接口，无法发包");
            return Ok(None);
        };
        let Some(vc) = self.active_vc else {
            warn!("没有活动 VC，先 setup_connection");
            return Ok(None);
        };
        if size_bits == 0 {
            warn!("packet 大小为 0，不发送");
            return Ok(None);
        }

        let id = net.alloc_packet_id();
        let packet = Packet::new(
            id,
            Ipv4Addr::new(10, 0, 0, 1),
            Ipv4Addr::new(10, 0, 0, 2),
            size_bits,
        );
        let total = packet.cells_needed();
        debug!(?id, total, vc, "拆分 packet");

        // 首 cell 携带 packet 元数据
        let trace = self.next_trace();
        net.send_cell(self.id, nic, Cell::header(vc, packet, trace))?;

        let mut remaining = size_bits.saturating_sub(CELL_PAYLOAD_BITS);
        for _ in 1..total {
            let trace = self.next_trace();
            let bits = remaining.min(CELL_PAYLOAD_BITS);
            net.send_cell(self.id, nic, Cell::data(vc, id, bits, trace))?;
            remaining = remaining.saturating_sub(CELL_PAYLOAD_BITS);
        }
        Ok(Some(id))
    }

    /// 处理到达的 cell。数据 cell 在主机终结。
    #[tracing::instrument(skip(self, cell, net), fields(host = %self.name, trace_id = cell.trace_id))]
    pub fn receive_cell(
        &mut self,
        cell: Cell,
        from: NicId,
        net: &mut Network,
    ) -> Result<(), NetError> {
        let trace_id = cell.trace_id;
        let Some(msg) = cell.as_signal().copied() else {
            debug!("🖥️ 数据 cell 在主机终结");
            net.on_delivered(self.id);
            return Ok(());
        };
        match msg {
            SignalMsg::Connect(vc) => {
                net.event(DiagKind::RecvConnect, self.id, trace_id);
                self.active_vc = Some(vc);
                info!(host = %self.name, vc, "✅ 连接建立");
                self.send_signal(net, from, 0, SignalMsg::CallAck, DiagKind::SentCallAck)?;
            }
            SignalMsg::Wait(dest) => {
                net.event(DiagKind::RecvWait, self.id, trace_id);
                // 下个 tick 重发 setup
                self.send_signal(net, from, 0, SignalMsg::Setup(dest), DiagKind::SentSetup)?;
            }
            SignalMsg::CallProceeding => {
                net.event(DiagKind::RecvCallProceeding, self.id, trace_id);
            }
            SignalMsg::EndAck => {
                net.event(DiagKind::RecvEndAck, self.id, trace_id);
            }
            other => {
                debug!(?other, "主机忽略该信令");
            }
        }
        Ok(())
    }

    fn next_trace(&mut self) -> u64 {
        let t = self.next_trace;
        self.next_trace += 1;
        t
    }

    fn send_signal(
        &mut self,
        net: &mut Network,
        nic: NicId,
        vc: i32,
        msg: SignalMsg,
        kind: DiagKind,
    ) -> Result<(), NetError> {
        let cell = Cell::signal(vc, msg, self.next_trace());
        net.event(kind, self.id, cell.trace_id);
        net.send_cell(self.id, nic, cell)
    }
}
