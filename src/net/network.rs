//! 网络拓扑管理
//!
//! 元素、接口、链路都放在 arena 里按 id 索引。拓扑在时钟启动前搭好，
//! 之后视为固定。元素的 dispatch 顺序就是创建顺序。

use super::cell::Cell;
use super::element::NetElement;
use super::error::NetError;
use super::host::Host;
use super::id::{ElementId, LinkId, NicId};
use super::link::Link;
use super::nic::Nic;
use super::packet::PacketId;
use super::router::Router;
use super::stats::{DiagEvent, DiagKind, Stats};
use crate::queue::{Discipline, QueueConfig};
use tracing::{debug, trace, warn};

/// 每个元素的 trace id 起始值间隔，保证不同元素的 trace id 不重叠
const TRACE_ID_STRIDE: u64 = 100_000;

/// 网络拓扑
#[derive(Debug)]
pub struct Network {
    nodes: Vec<Option<NetElement>>,
    nics: Vec<Nic>,
    links: Vec<Link>,
    seed: u64,
    next_packet_id: u64,
    pub stats: Stats,
    events: Vec<DiagEvent>,
}

impl Default for Network {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Network {
    /// `seed` 决定所有接口队列的随机源，入队判定完全可复现。
    pub fn new(seed: u64) -> Self {
        Self {
            nodes: Vec::new(),
            nics: Vec::new(),
            links: Vec::new(),
            seed,
            next_packet_id: 1,
            stats: Stats::default(),
            events: Vec::new(),
        }
    }

    // ---- 拓扑构建（时钟启动前） ----

    /// 添加路由器
    pub fn add_router(&mut self, address: i32) -> ElementId {
        let id = ElementId(self.nodes.len());
        let trace_base = id.0 as u64 * TRACE_ID_STRIDE;
        self.nodes
            .push(Some(NetElement::Router(Router::new(id, address, trace_base))));
        id
    }

    /// 添加主机
    pub fn add_host(&mut self, name: impl Into<String>) -> ElementId {
        let id = ElementId(self.nodes.len());
        let trace_base = id.0 as u64 * TRACE_ID_STRIDE;
        self.nodes
            .push(Some(NetElement::Host(Host::new(id, name, trace_base))));
        id
    }

    /// 给元素挂一个接口（默认队列配置）。
    pub fn attach_nic(&mut self, element: ElementId) -> NicId {
        let id = NicId(self.nics.len());
        let seed = self.nic_seed(id);
        self.nics
            .push(Nic::new(id, element, QueueConfig::default(), seed));
        self.nodes[element.0]
            .as_mut()
            .expect("element exists")
            .attach_nic(id);
        id
    }

    /// 用一条链路绑定两个接口。
    pub fn bind(&mut self, a: NicId, b: NicId) -> LinkId {
        assert_ne!(a, b, "cannot bind a nic to itself");
        assert!(self.nics[a.0].link.is_none(), "nic {a:?} already bound");
        assert!(self.nics[b.0].link.is_none(), "nic {b:?} already bound");
        let id = LinkId(self.links.len());
        self.links.push(Link { id, a, b });
        self.nics[a.0].link = Some(id);
        self.nics[b.0].link = Some(id);
        id
    }

    /// 注册路由器去往 `dest` 的出接口。
    pub fn add_next_hop(&mut self, router: ElementId, dest: i32, nic: NicId) {
        self.nodes[router.0]
            .as_mut()
            .and_then(NetElement::as_router_mut)
            .unwrap_or_else(|| panic!("element {router:?} is not a router"))
            .add_next_hop(dest, nic);
    }

    /// 给元素的所有接口设置同一种丢弃策略。
    pub fn set_discipline(&mut self, element: ElementId, discipline: Discipline) {
        self.with_node(element, |node, net| node.set_discipline(net, discipline));
    }

    /// 覆盖单个接口的队列配置。
    pub fn configure_nic(&mut self, nic: NicId, cfg: QueueConfig) {
        self.nics[nic.0].output.set_config(cfg);
    }

    /// 重新播种所有接口的随机源。
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        for idx in 0..self.nics.len() {
            let s = self.nic_seed(NicId(idx));
            self.nics[idx].output.reseed(s);
        }
    }

    fn nic_seed(&self, nic: NicId) -> u64 {
        self.seed ^ (nic.0 as u64).wrapping_mul(0x9E3779B97F4A7C15)
    }

    // ---- 运行时 ----

    /// 把 cell 入 `nic` 的 output queue，入队判定产生可观测事件。
    /// `from` 必须是该接口的属主，否则是不变量被破坏。
    pub fn send_cell(&mut self, from: ElementId, nic: NicId, cell: Cell) -> Result<(), NetError> {
        let n = &mut self.nics[nic.0];
        if n.owner != from {
            return Err(NetError::NotOwned { element: from, nic });
        }
        let trace_id = cell.trace_id;
        if n.output.admit(cell).is_admitted() {
            self.stats.admitted_cells += 1;
            self.event(DiagKind::CellAdmitted, from, trace_id);
        } else {
            self.stats.dropped_cells += 1;
            self.event(DiagKind::CellDropped, from, trace_id);
        }
        Ok(())
    }

    /// 把 `nic` 的 output queue 按 drain rate 沿链路送到对端 input queue。
    pub fn drain_nic(&mut self, nic: NicId) -> Result<(), NetError> {
        if self.nics[nic.0].output.is_empty() {
            return Ok(());
        }
        // 先解析链路再出队，报错时 cell 留在队列里
        let link = self.nics[nic.0].link.ok_or(NetError::NoLink { nic })?;
        let peer = self.links[link.0].peer_of(nic)?;
        let rate = self.nics[nic.0].output.drain_rate();
        let cells = self.nics[nic.0].output.drain(rate);
        trace!(?nic, ?peer, moved = cells.len(), "链路同步传送");
        for cell in cells {
            self.nics[peer.0].push_input(cell);
        }
        Ok(())
    }

    /// 取走 `nic` input queue 的全部 cell。
    pub fn take_input(&mut self, nic: NicId) -> std::collections::VecDeque<Cell> {
        self.nics[nic.0].take_input()
    }

    /// Phase 1：按固定顺序让每个元素 drain 各自接口。
    pub(crate) fn drain_all(&mut self) -> Result<(), NetError> {
        for idx in 0..self.nodes.len() {
            // 暂时把元素取出来，避免 &mut self 与 &mut element 的重叠借用
            let mut node = self.nodes[idx].take().expect("node exists");
            let res = node.drain_outputs(self);
            self.nodes[idx] = Some(node);
            res?;
        }
        Ok(())
    }

    /// Phase 2：按同一顺序让每个元素 dispatch 各自接口的 input。
    pub(crate) fn dispatch_all(&mut self) -> Result<(), NetError> {
        for idx in 0..self.nodes.len() {
            let mut node = self.nodes[idx].take().expect("node exists");
            let res = node.dispatch_inputs(self);
            self.nodes[idx] = Some(node);
            res?;
        }
        Ok(())
    }

    // ---- 主机操作入口 ----

    pub fn host_setup(&mut self, host: ElementId, dest: i32) -> Result<(), NetError> {
        self.with_node(host, |node, net| {
            node.as_host_mut()
                .expect("element is a host")
                .setup_connection(dest, net)
        })
    }

    pub fn host_end(&mut self, host: ElementId) -> Result<(), NetError> {
        self.with_node(host, |node, net| {
            node.as_host_mut()
                .expect("element is a host")
                .end_connection(net)
        })
    }

    pub fn host_send_packet(
        &mut self,
        host: ElementId,
        size_bits: u32,
    ) -> Result<Option<PacketId>, NetError> {
        self.with_node(host, |node, net| {
            node.as_host_mut()
                .expect("element is a host")
                .send_packet(size_bits, net)
        })
    }

    pub fn host_active_vc(&self, host: ElementId) -> Option<i32> {
        self.nodes[host.0]
            .as_ref()
            .and_then(NetElement::as_host)
            .expect("element is a host")
            .active_vc()
    }

    fn with_node<R>(
        &mut self,
        id: ElementId,
        f: impl FnOnce(&mut NetElement, &mut Network) -> R,
    ) -> R {
        let mut node = self.nodes[id.0].take().expect("node exists");
        let out = f(&mut node, self);
        self.nodes[id.0] = Some(node);
        out
    }

    // ---- 诊断与观测 ----

    /// 记录一条结构化诊断事件。
    pub fn event(&mut self, kind: DiagKind, actor: ElementId, trace_id: u64) {
        debug!(?kind, ?actor, trace_id, "诊断事件");
        self.events.push(DiagEvent {
            kind,
            actor,
            trace_id,
        });
    }

    /// 协议错误：记录后吸收，网络继续运行。
    pub fn report_protocol(&mut self, actor: ElementId, trace_id: u64, err: NetError) {
        warn!(%err, ?actor, trace_id, "协议错误，cell 被丢弃");
        self.stats.protocol_drops += 1;
        let kind = match err {
            NetError::UnknownVc { .. } => DiagKind::NoVc,
            NetError::UnexpectedConnect { .. } => DiagKind::UnexpectedConn,
            _ => DiagKind::NoRoute,
        };
        self.event(kind, actor, trace_id);
    }

    /// 数据 cell 在主机终结。
    pub fn on_delivered(&mut self, host: ElementId) {
        debug!(?host, "数据 cell 送达");
        self.stats.delivered_cells += 1;
    }

    pub fn events(&self) -> &[DiagEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn count_events(&self, kind: DiagKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn count_events_for(&self, kind: DiagKind, actor: ElementId) -> usize {
        self.events
            .iter()
            .filter(|e| e.kind == kind && e.actor == actor)
            .count()
    }

    // ---- 测试与诊断用访问器 ----

    pub fn queue_len(&self, nic: NicId) -> usize {
        self.nics[nic.0].output.len()
    }

    pub fn input_len(&self, nic: NicId) -> usize {
        self.nics[nic.0].input_len()
    }

    pub fn router_vc_count(&self, router: ElementId) -> usize {
        self.nodes[router.0]
            .as_ref()
            .and_then(NetElement::as_router)
            .expect("element is a router")
            .vc_table()
            .len()
    }

    pub fn router_lock_held(&self, router: ElementId) -> bool {
        self.nodes[router.0]
            .as_ref()
            .and_then(NetElement::as_router)
            .expect("element is a router")
            .lock_held()
    }

    pub(crate) fn nic_mut(&mut self, nic: NicId) -> &mut Nic {
        &mut self.nics[nic.0]
    }

    pub fn alloc_packet_id(&mut self) -> PacketId {
        let id = PacketId(self.next_packet_id);
        self.next_packet_id = self.next_packet_id.wrapping_add(1);
        id
    }
}
