//! 虚电路网络模块
//!
//! 此模块包含虚电路仿真的核心组件：cell/packet 数据模型、接口与链路、
//! 路由器信令状态机、端主机和网络拓扑。

// 子模块声明
mod cell;
mod element;
mod error;
mod host;
mod id;
mod link;
mod network;
mod nic;
mod packet;
mod router;
mod stats;

// 重新导出公共接口
pub use cell::{Cell, CellPayload, SignalMsg};
pub use element::NetElement;
pub use error::NetError;
pub use host::Host;
pub use id::{ElementId, LinkId, NicId};
pub use link::Link;
pub use network::Network;
pub use nic::Nic;
pub use packet::{Packet, PacketId};
pub use router::{Router, VcEntry};
pub use stats::{DiagEvent, DiagKind, Stats};
