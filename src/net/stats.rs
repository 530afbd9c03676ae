//! 统计与诊断事件
//!
//! 每次入队判定和每次信令收发都会产生一条结构化事件
//! `(kind, actor, trace_id)`；如何渲染成文本是订阅方的事。

use super::id::ElementId;

/// 网络统计信息
#[derive(Debug, Default)]
pub struct Stats {
    pub admitted_cells: u64,
    pub dropped_cells: u64,
    /// 在主机终结的数据 cell 数
    pub delivered_cells: u64,
    /// 协议错误（未知 VC / 无路由）丢弃数
    pub protocol_drops: u64,
}

/// 诊断事件种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    CellAdmitted,
    CellDropped,
    SentSetup,
    RecvSetup,
    SentCallProceeding,
    RecvCallProceeding,
    SentConnect,
    RecvConnect,
    SentCallAck,
    RecvCallAck,
    SentWait,
    RecvWait,
    SentEnd,
    RecvEnd,
    SentEndAck,
    RecvEndAck,
    /// 数据 cell 的 VC 在交换表中不存在
    NoVc,
    /// 信令的目的地址不在下一跳表中
    NoRoute,
    /// conn 到达时没有在等待的出方向呼叫
    UnexpectedConn,
}

/// 结构化诊断事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagEvent {
    pub kind: DiagKind,
    pub actor: ElementId,
    pub trace_id: u64,
}
