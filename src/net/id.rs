//! 标识符类型
//!
//! 定义网络元素、接口和链路的唯一标识符。

/// 网络元素（路由器/主机）标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub usize);

/// 接口标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NicId(pub usize);

/// 链路标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(pub usize);
