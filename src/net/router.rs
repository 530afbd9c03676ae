//! 路由器与呼叫控制状态机
//!
//! 每个路由器维护：下一跳表（静态配置）、VC 交换表（呼叫建立时写入、
//! 拆除时删除）、以及一把出方向呼叫锁——同一时刻最多一个未完成的
//! 出方向 setup。锁按路由器粒度共享于它的所有接口，会串行化该路由器
//! 的出方向呼叫，这是已知的公平性局限。

use std::collections::BTreeMap;

use super::cell::{Cell, CellPayload, SignalMsg};
use super::error::NetError;
use super::id::{ElementId, NicId};
use super::network::Network;
use super::stats::DiagKind;
use tracing::{debug, info};

/// 交换表表项：入方向 VC 映射到（出接口，出方向 VC）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VcEntry {
    pub nic: NicId,
    pub vc: i32,
}

/// ATM 风格的信令路由器
#[derive(Debug)]
pub struct Router {
    id: ElementId,
    address: i32,
    nics: Vec<NicId>,
    next_hop: BTreeMap<i32, NicId>,
    vc_table: BTreeMap<i32, VcEntry>,
    /// 出方向呼叫锁：持有者是发起该呼叫的入接口
    conn_attempt: Option<NicId>,
    next_trace: u64,
}

impl Router {
    pub fn new(id: ElementId, address: i32, trace_base: u64) -> Self {
        Self {
            id,
            address,
            nics: Vec::new(),
            next_hop: BTreeMap::new(),
            vc_table: BTreeMap::new(),
            conn_attempt: None,
            next_trace: trace_base,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn address(&self) -> i32 {
        self.address
    }

    pub fn attach_nic(&mut self, nic: NicId) {
        self.nics.push(nic);
    }

    pub fn nics(&self) -> &[NicId] {
        &self.nics
    }

    /// 注册去往 `dest` 的出接口（仿真开始前配置，之后只读）。
    pub fn add_next_hop(&mut self, dest: i32, nic: NicId) {
        self.next_hop.insert(dest, nic);
    }

    pub fn vc_table(&self) -> &BTreeMap<i32, VcEntry> {
        &self.vc_table
    }

    pub fn lock_held(&self) -> bool {
        self.conn_attempt.is_some()
    }

    /// 处理一个到达的 cell（信令或数据）。
    #[tracing::instrument(skip(self, cell, net), fields(address = self.address, trace_id = cell.trace_id))]
    pub fn receive_cell(
        &mut self,
        cell: Cell,
        from: NicId,
        net: &mut Network,
    ) -> Result<(), NetError> {
        debug!("🔀 路由器收到 cell");
        if let Some(msg) = cell.as_signal().copied() {
            let trace_id = cell.trace_id;
            match msg {
                SignalMsg::Setup(dest) => self.on_setup(dest, trace_id, from, net)?,
                SignalMsg::Connect(vc) => self.on_connect(vc, trace_id, from, net)?,
                SignalMsg::End(vc) => self.on_end(vc, trace_id, from, net)?,
                SignalMsg::Wait(dest) => {
                    net.event(DiagKind::RecvWait, self.id, trace_id);
                    // 下个 tick 重发 setup，无退避、不限次数
                    self.send_signal(net, from, SignalMsg::Setup(dest), DiagKind::SentSetup)?;
                }
                SignalMsg::CallProceeding => {
                    net.event(DiagKind::RecvCallProceeding, self.id, trace_id);
                }
                SignalMsg::CallAck => {
                    net.event(DiagKind::RecvCallAck, self.id, trace_id);
                }
                SignalMsg::EndAck => {
                    net.event(DiagKind::RecvEndAck, self.id, trace_id);
                }
            }
            Ok(())
        } else {
            self.forward_data(cell, net)
        }
    }

    fn on_setup(
        &mut self,
        dest: i32,
        trace_id: u64,
        from: NicId,
        net: &mut Network,
    ) -> Result<(), NetError> {
        net.event(DiagKind::RecvSetup, self.id, trace_id);
        self.send_signal(net, from, SignalMsg::CallProceeding, DiagKind::SentCallProceeding)?;

        if dest == self.address {
            // 本路由器就是呼叫终点：分配最小空闲 VC 接受呼叫
            let vc = self.first_free_vc();
            info!(address = self.address, vc, "呼叫到达终点，分配空闲 VC");
            self.send_signal(net, from, SignalMsg::Connect(vc), DiagKind::SentConnect)?;
        } else if self.conn_attempt.is_some() {
            // 已有未完成的出方向呼叫，让对方等一个 tick 再试
            self.send_signal(net, from, SignalMsg::Wait(dest), DiagKind::SentWait)?;
        } else {
            match self.next_hop.get(&dest).copied() {
                Some(out) => {
                    self.conn_attempt = Some(from);
                    self.send_signal(net, out, SignalMsg::Setup(dest), DiagKind::SentSetup)?;
                }
                None => net.report_protocol(self.id, trace_id, NetError::NoRoute { dest }),
            }
        }
        Ok(())
    }

    fn on_connect(
        &mut self,
        out_vc: i32,
        trace_id: u64,
        from: NicId,
        net: &mut Network,
    ) -> Result<(), NetError> {
        net.event(DiagKind::RecvConnect, self.id, trace_id);
        match self.conn_attempt.take() {
            Some(upstream) => {
                let in_vc = self.first_free_vc();
                self.vc_table.insert(in_vc, VcEntry { nic: from, vc: out_vc });
                debug!(address = self.address, in_vc, out_vc, "写入交换表表项");
                self.send_signal(net, from, SignalMsg::CallAck, DiagKind::SentCallAck)?;
                self.send_signal(net, upstream, SignalMsg::Connect(in_vc), DiagKind::SentConnect)?;
            }
            None => {
                net.report_protocol(
                    self.id,
                    trace_id,
                    NetError::UnexpectedConnect { vc: out_vc },
                );
            }
        }
        Ok(())
    }

    fn on_end(
        &mut self,
        vc: i32,
        trace_id: u64,
        from: NicId,
        net: &mut Network,
    ) -> Result<(), NetError> {
        net.event(DiagKind::RecvEnd, self.id, trace_id);
        if let Some(entry) = self.vc_table.remove(&vc) {
            debug!(address = self.address, vc, "删除交换表表项并向配对接口转发 end");
            self.send_signal(net, entry.nic, SignalMsg::End(entry.vc), DiagKind::SentEnd)?;
        } else {
            net.report_protocol(self.id, trace_id, NetError::UnknownVc { vc });
        }
        self.send_signal(net, from, SignalMsg::EndAck, DiagKind::SentEndAck)
    }

    /// 数据面转发：按入方向 VC 查交换表，重写成出方向 VC 后入出接口队列。
    fn forward_data(&mut self, cell: Cell, net: &mut Network) -> Result<(), NetError> {
        debug_assert!(matches!(
            cell.payload,
            CellPayload::Header(_) | CellPayload::Data { .. }
        ));
        match self.vc_table.get(&cell.vc).copied() {
            Some(entry) => {
                let mut cell = cell;
                cell.vc = entry.vc;
                net.send_cell(self.id, entry.nic, cell)
            }
            None => {
                net.report_protocol(self.id, cell.trace_id, NetError::UnknownVc { vc: cell.vc });
                Ok(())
            }
        }
    }

    /// 最小的未被占用的正整数 VC，分配结果确定可测。
    fn first_free_vc(&self) -> i32 {
        let mut vc = 1;
        while self.vc_table.contains_key(&vc) {
            vc += 1;
        }
        vc
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
        msg: SignalMsg,
        kind: DiagKind,
    ) -> Result<(), NetError> {
        let cell = Cell::signal(0, msg, self.next_trace());
        net.event(kind, self.id, cell.trace_id);
        net.send_cell(self.id, nic, cell)
    }
}
