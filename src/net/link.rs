//! 链路类型
//!
//! 一条链路严格绑定两个接口，零缓冲零延迟；
//! 所有延迟都来自队列占用和 tick 粒度。

use super::error::NetError;
use super::id::{LinkId, NicId};

/// 点对点链路
#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub id: LinkId,
    pub a: NicId,
    pub b: NicId,
}

impl Link {
    /// 求对端接口。`from` 不是本链路端点时是不变量被破坏（编程错误）。
    pub fn peer_of(&self, from: NicId) -> Result<NicId, NetError> {
        if from == self.a {
            Ok(self.b)
        } else if from == self.b {
            Ok(self.a)
        } else {
            Err(NetError::NotAttached {
                link: self.id,
                nic: from,
            })
        }
    }
}
