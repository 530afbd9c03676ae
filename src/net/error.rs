//! 错误类型
//!
//! 两类错误走不同路径：协议层的 `UnknownVc` / `NoRoute` 非致命，
//! 由网络层记录后吸收；`NotAttached` / `NoLink` / `NotOwned`
//! 是拓扑不变量被破坏（编程错误），作为 `Err` 一路上抛。

use super::id::{ElementId, LinkId, NicId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetError {
    /// 数据 cell 引用了交换表中不存在的 VC
    #[error("data cell references unknown vc {vc}")]
    UnknownVc { vc: i32 },

    /// 下一跳表中没有目标地址
    #[error("no next-hop entry for address {dest}")]
    NoRoute { dest: i32 },

    /// 没有未完成的出方向呼叫却收到 conn
    #[error("conn {vc} arrived with no outstanding outbound attempt")]
    UnexpectedConnect { vc: i32 },

    /// 通过一条自己不是端点的链路发送
    #[error("nic {nic:?} is not an endpoint of link {link:?}")]
    NotAttached { link: LinkId, nic: NicId },

    /// 接口没有绑定链路却要上线路
    #[error("nic {nic:?} has no link bound")]
    NoLink { nic: NicId },

    /// 元素通过不属于自己的接口发送
    #[error("element {element:?} does not own nic {nic:?}")]
    NotOwned { element: ElementId, nic: NicId },
}
