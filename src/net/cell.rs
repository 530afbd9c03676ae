//! Cell 类型与信令线上格式
//!
//! cell 是定长协议单元，载荷三选一：信令消息（OAM）、packet 首部分片、
//! 原始数据分片。“是否 OAM”由载荷种类直接决定，构造后不可变。
//!
//! 信令线上格式：小写 token（`setup`/`callpro`/`conn`/`wait`/`callack`/
//! `end`/`endack`），后面可跟一个空格加十进制整数参数；
//! 参数解析失败不报错，折算成 -1 哨兵值继续走协议路径。

use std::fmt;

use super::packet::{Packet, PacketId};
use crate::queue::CELL_PAYLOAD_BITS;

/// 信令消息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalMsg {
    /// 发起呼叫，参数为目的路由器地址
    Setup(i32),
    /// 逐跳确认：呼叫正在处理
    CallProceeding,
    /// 接受呼叫，参数为分配的 VC
    Connect(i32),
    CallAck,
    /// 对端正忙，参数为原目的地址，收到后下个 tick 重发 setup
    Wait(i32),
    /// 拆除 VC
    End(i32),
    EndAck,
}

impl SignalMsg {
    /// 从线上格式解析。未知 token 返回 `None`；
    /// 参数缺失或不是整数时取 -1 哨兵值。
    pub fn from_wire(s: &str) -> Option<SignalMsg> {
        let token = s.split(' ').next().unwrap_or("");
        match token {
            "setup" => Some(SignalMsg::Setup(int_from_end(s))),
            "callpro" => Some(SignalMsg::CallProceeding),
            "conn" => Some(SignalMsg::Connect(int_from_end(s))),
            "callack" => Some(SignalMsg::CallAck),
            "wait" => Some(SignalMsg::Wait(int_from_end(s))),
            "end" => Some(SignalMsg::End(int_from_end(s))),
            "endack" => Some(SignalMsg::EndAck),
            _ => None,
        }
    }
}

impl fmt::Display for SignalMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalMsg::Setup(dest) => write!(f, "setup {dest}"),
            SignalMsg::CallProceeding => write!(f, "callpro"),
            SignalMsg::Connect(vc) => write!(f, "conn {vc}"),
            SignalMsg::CallAck => write!(f, "callack"),
            SignalMsg::Wait(dest) => write!(f, "wait {dest}"),
            SignalMsg::End(vc) => write!(f, "end {vc}"),
            SignalMsg::EndAck => write!(f, "endack"),
        }
    }
}

/// 取字符串末尾的整数，取不到返回 -1。
fn int_from_end(s: &str) -> i32 {
    s.split(' ')
        .next_back()
        .and_then(|t| t.parse().ok())
        .unwrap_or(-1)
}

/// cell 载荷
#[derive(Debug, Clone, PartialEq)]
pub enum CellPayload {
    /// 信令消息（OAM）
    Signal(SignalMsg),
    /// packet 的首个分片，携带完整元数据
    Header(Packet),
    /// packet 的后续分片，只带占位字节
    Data { packet: PacketId, marker: Vec<u8> },
}

/// 定长协议单元
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// 链路本地的 VC 号
    pub vc: i32,
    /// 诊断用 trace id，由发出元素分配
    pub trace_id: u64,
    pub payload: CellPayload,
}

impl Cell {
    pub fn signal(vc: i32, msg: SignalMsg, trace_id: u64) -> Cell {
        Cell {
            vc,
            trace_id,
            payload: CellPayload::Signal(msg),
        }
    }

    pub fn header(vc: i32, packet: Packet, trace_id: u64) -> Cell {
        Cell {
            vc,
            trace_id,
            payload: CellPayload::Header(packet),
        }
    }

    /// 数据分片，`bits` 为该分片承载的位数（最多一个 cell 载荷）。
    pub fn data(vc: i32, packet: PacketId, bits: u32, trace_id: u64) -> Cell {
        let bits = bits.min(CELL_PAYLOAD_BITS);
        Cell {
            vc,
            trace_id,
            payload: CellPayload::Data {
                packet,
                marker: vec![b'd'; bits.div_ceil(8) as usize],
            },
        }
    }

    /// 是否 OAM（信令）cell。与载荷种类严格一致。
    pub fn is_oam(&self) -> bool {
        matches!(self.payload, CellPayload::Signal(_))
    }

    pub fn as_signal(&self) -> Option<&SignalMsg> {
        match &self.payload {
            CellPayload::Signal(msg) => Some(msg),
            _ => None,
        }
    }

    /// 所属 packet 的 id（信令 cell 返回 `None`）。
    pub fn packet_id(&self) -> Option<PacketId> {
        match &self.payload {
            CellPayload::Signal(_) => None,
            CellPayload::Header(pkt) => Some(pkt.id),
            CellPayload::Data { packet, .. } => Some(*packet),
        }
    }
}
