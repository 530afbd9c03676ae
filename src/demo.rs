//! 演示和示例拓扑
//!
//! 包含测试与示例共用的拓扑构建函数。

use crate::net::{ElementId, Network, NicId};

/// 两路由器链：host - R1 - R2，R2 是 R1 去往 `dest_addr` 的下一跳。
#[derive(Debug)]
pub struct TwoRouter {
    pub host: ElementId,
    pub r1: ElementId,
    pub r2: ElementId,
    pub host_nic: NicId,
    pub r1_host_nic: NicId,
    pub r1_r2_nic: NicId,
    pub r2_nic: NicId,
    /// R2 的地址，也是呼叫目的地址
    pub dest_addr: i32,
}

/// 构建两路由器链拓扑
pub fn build_two_router(net: &mut Network) -> TwoRouter {
    let r1 = net.add_router(1);
    let r2 = net.add_router(2);
    let host = net.add_host("h1");

    let r1_host_nic = net.attach_nic(r1);
    let r1_r2_nic = net.attach_nic(r1);
    let r2_nic = net.attach_nic(r2);
    let host_nic = net.attach_nic(host);

    net.bind(host_nic, r1_host_nic);
    net.bind(r1_r2_nic, r2_nic);

    net.add_next_hop(r1, 2, r1_r2_nic);

    TwoRouter {
        host,
        r1,
        r2,
        host_nic,
        r1_host_nic,
        r1_r2_nic,
        r2_nic,
        dest_addr: 2,
    }
}

/// 五路由器骨干网（地址 9/3/11/13/14），两台主机分别挂在 R1、R2 上。
///
/// 拓扑结构：
/// ```text
/// comp1 - R1(9) - R2(3) - R3(11)
///                   |
///         comp2 - (R2) - R4(13) - R5(14)
/// ```
#[derive(Debug)]
pub struct Backbone {
    pub r1: ElementId,
    pub r2: ElementId,
    pub r3: ElementId,
    pub r4: ElementId,
    pub r5: ElementId,
    pub comp1: ElementId,
    pub comp2: ElementId,
}

/// 构建骨干网拓扑
pub fn build_backbone(net: &mut Network) -> Backbone {
    let r1 = net.add_router(9);
    let r2 = net.add_router(3);
    let r3 = net.add_router(11);
    let r4 = net.add_router(13);
    let r5 = net.add_router(14);

    // 路由器互联接口
    let r1n1 = net.attach_nic(r1);
    let r2n1 = net.attach_nic(r2);
    let r2n2 = net.attach_nic(r2);
    let r2n3 = net.attach_nic(r2);
    let r3n1 = net.attach_nic(r3);
    let r4n1 = net.attach_nic(r4);
    let r4n2 = net.attach_nic(r4);
    let r5n1 = net.attach_nic(r5);

    net.bind(r1n1, r2n1);
    net.bind(r2n2, r3n1);
    net.bind(r2n3, r4n1);
    net.bind(r4n2, r5n1);

    // 下一跳表
    net.add_next_hop(r1, 3, r1n1);
    net.add_next_hop(r1, 11, r1n1);
    net.add_next_hop(r1, 13, r1n1);
    net.add_next_hop(r1, 14, r1n1);

    net.add_next_hop(r2, 9, r2n1);
    net.add_next_hop(r2, 11, r2n2);
    net.add_next_hop(r2, 13, r2n3);
    net.add_next_hop(r2, 14, r2n3);

    net.add_next_hop(r3, 3, r3n1);
    net.add_next_hop(r3, 9, r3n1);
    net.add_next_hop(r3, 13, r3n1);
    net.add_next_hop(r3, 14, r3n1);

    net.add_next_hop(r4, 3, r4n1);
    net.add_next_hop(r4, 9, r4n1);
    net.add_next_hop(r4, 11, r4n1);
    net.add_next_hop(r4, 14, r4n2);

    net.add_next_hop(r5, 3, r5n1);
    net.add_next_hop(r5, 9, r5n1);
    net.add_next_hop(r5, 11, r5n1);
    net.add_next_hop(r5, 13, r5n1);

    // 两台主机
    let comp1 = net.add_host("comp1");
    let c1n1 = net.attach_nic(comp1);
    let r1n101 = net.attach_nic(r1);
    net.bind(c1n1, r1n101);

    let comp2 = net.add_host("comp2");
    let c2n1 = net.attach_nic(comp2);
    let r2n101 = net.attach_nic(r2);
    net.bind(c2n1, r2n101);

    Backbone {
        r1,
        r2,
        r3,
        r4,
        r5,
        comp1,
        comp2,
    }
}
