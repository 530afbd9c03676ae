//! 网络元素
//!
//! 路由器和主机两种变体，用 enum 做标签分发（不走 trait 对象）。
//! 能力面：挂接接口、收 cell、drain 各接口 output、dispatch 各接口
//! input、统一设置丢弃策略。

use super::cell::Cell;
use super::error::NetError;
use super::host::Host;
use super::id::{ElementId, NicId};
use super::network::Network;
use super::router::Router;
use crate::queue::Discipline;

/// 网络元素：路由器或主机
#[derive(Debug)]
pub enum NetElement {
    Router(Router),
    Host(Host),
}

impl NetElement {
    pub fn id(&self) -> ElementId {
        match self {
            NetElement::Router(r) => r.id(),
            NetElement::Host(h) => h.id(),
        }
    }

    /// 挂接一个接口
    pub fn attach_nic(&mut self, nic: NicId) {
        match self {
            NetElement::Router(r) => r.attach_nic(nic),
            NetElement::Host(h) => h.attach_nic(nic),
        }
    }

    /// 该元素的全部接口
    pub fn nics(&self) -> Vec<NicId> {
        match self {
            NetElement::Router(r) => r.nics().to_vec(),
            NetElement::Host(h) => h.nic().into_iter().collect(),
        }
    }

    /// 收一个 cell，触发信令状态机或数据处理
    pub fn receive_cell(
        &mut self,
        cell: Cell,
        from: NicId,
        net: &mut Network,
    ) -> Result<(), NetError> {
        match self {
            NetElement::Router(r) => r.receive_cell(cell, from, net),
            NetElement::Host(h) => h.receive_cell(cell, from, net),
        }
    }

    /// Phase 1：把各接口 output queue 的 cell 沿链路送到对端
    pub fn drain_outputs(&mut self, net: &mut Network) -> Result<(), NetError> {
        for nic in self.nics() {
            net.drain_nic(nic)?;
        }
        Ok(())
    }

    /// Phase 2：把各接口 input queue 的 cell 交给自身处理逻辑
    pub fn dispatch_inputs(&mut self, net: &mut Network) -> Result<(), NetError> {
        for nic in self.nics() {
            let cells = net.take_input(nic);
            for cell in cells {
                self.receive_cell(cell, nic, net)?;
            }
        }
        Ok(())
    }

    /// 给该元素的所有接口设置同一种丢弃策略
    pub fn set_discipline(&self, net: &mut Network, discipline: Discipline) {
        for nic in self.nics() {
            net.nic_mut(nic).output.set_discipline(discipline);
        }
    }

    pub fn as_router(&self) -> Option<&Router> {
        match self {
            NetElement::Router(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_router_mut(&mut self) -> Option<&mut Router> {
        match self {
            NetElement::Router(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_host(&self) -> Option<&Host> {
        match self {
            NetElement::Host(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_host_mut(&mut self) -> Option<&mut Host> {
        match self {
            NetElement::Host(h) => Some(h),
            _ => None,
        }
    }
}
