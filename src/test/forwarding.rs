use crate::demo::build_two_router;
use crate::net::{DiagKind, Network, PacketId};
use crate::queue::CELL_PAYLOAD_BITS;
use crate::sim::Clock;

#[test]
fn data_cells_are_rewritten_and_forwarded_along_the_circuit() {
    let mut net = Network::default();
    let t = build_two_router(&mut net);
    let mut clock = Clock::default();

    clock.advance(&mut net).expect("tick");
    net.host_setup(t.host, t.dest_addr).expect("setup");
    clock.run(&mut net, 6).expect("run");
    assert_eq!(net.host_active_vc(t.host), Some(1));
    net.clear_events();

    let pid = net
        .host_send_packet(t.host, 3 * CELL_PAYLOAD_BITS)
        .expect("send")
        .expect("packet id");
    assert_eq!(pid, PacketId(1));
    assert_eq!(net.queue_len(t.host_nic), 3);

    // R1 按交换表把三个 cell 全部转到 R2 方向的接口
    clock.advance(&mut net).expect("tick");
    assert_eq!(net.queue_len(t.host_nic), 0);
    assert_eq!(net.queue_len(t.r1_r2_nic), 3);
    assert_eq!(net.count_events_for(DiagKind::CellAdmitted, t.r1), 3);
    assert_eq!(net.count_events_for(DiagKind::NoVc, t.r1), 0);

    // R2 是终点路由器，没有表项，数据在这里按协议错误丢弃
    clock.advance(&mut net).expect("tick");
    assert_eq!(net.count_events_for(DiagKind::NoVc, t.r2), 3);
    assert_eq!(net.stats.protocol_drops, 3);
    assert_eq!(net.stats.delivered_cells, 0);
}

#[test]
fn packet_fragmentation_matches_payload_size() {
    let mut net = Network::default();
    let r1 = net.add_router(1);
    let host = net.add_host("h1");
    let rn = net.attach_nic(r1);
    let hn = net.attach_nic(host);
    net.bind(hn, rn);

    let mut clock = Clock::default();
    clock.advance(&mut net).expect("tick");
    net.host_setup(host, 1).expect("setup");
    clock.run(&mut net, 3).expect("run");
    assert_eq!(net.host_active_vc(host), Some(1));

    // 1000 bits -> 3 个 cell（首 cell + 2 个数据分片）
    let first = net.host_send_packet(host, 1000).expect("send");
    assert_eq!(first, Some(PacketId(1)));
    assert_eq!(net.queue_len(hn), 3);

    // 恰好一个载荷 -> 只有首 cell
    let second = net.host_send_packet(host, CELL_PAYLOAD_BITS).expect("send");
    assert_eq!(second, Some(PacketId(2)));
    assert_eq!(net.queue_len(hn), 4);

    // 空 packet 不发
    let third = net.host_send_packet(host, 0).expect("send");
    assert_eq!(third, None);
    assert_eq!(net.queue_len(hn), 4);
}

#[test]
fn sending_without_a_circuit_is_a_noop() {
    let mut net = Network::default();
    let host = net.add_host("h1");
    let hn = net.attach_nic(host);

    let sent = net.host_send_packet(host, 1000).expect("send");
    assert_eq!(sent, None);
    assert_eq!(net.queue_len(hn), 0);
}
