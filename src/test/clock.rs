use crate::net::{
    Cell, DiagKind, Link, LinkId, NetError, Network, NicId, PacketId, SignalMsg,
};
use crate::sim::{Clock, Tick};

#[test]
fn cell_crosses_one_link_per_tick() {
    let mut net = Network::default();
    let h1 = net.add_host("h1");
    let h2 = net.add_host("h2");
    let n1 = net.attach_nic(h1);
    let n2 = net.attach_nic(h2);
    net.bind(n1, n2);

    net.send_cell(h1, n1, Cell::data(1, PacketId(1), 384, 1))
        .expect("send");
    assert_eq!(net.stats.delivered_cells, 0);
    assert_eq!(net.queue_len(n1), 1);

    let mut clock = Clock::default();
    clock.advance(&mut net).expect("tick");
    assert_eq!(net.stats.delivered_cells, 1);
    assert_eq!(net.queue_len(n1), 0);
    assert_eq!(net.input_len(n2), 0);
}

#[test]
fn replies_enqueued_in_phase_two_wait_for_next_tick() {
    let mut net = Network::default();
    let r = net.add_router(5);
    let h = net.add_host("h1");
    let rn = net.attach_nic(r);
    let hn = net.attach_nic(h);
    net.bind(hn, rn);

    net.host_setup(h, 5).expect("setup");
    let mut clock = Clock::default();

    // tick 0：setup 过链路，路由器在 Phase 2 回 callpro + conn，
    // 但这两个 cell 只是进了它的 output queue
    clock.advance(&mut net).expect("tick");
    assert_eq!(net.count_events_for(DiagKind::RecvSetup, r), 1);
    assert_eq!(net.queue_len(rn), 2);
    assert_eq!(net.host_active_vc(h), None);

    // tick 1：回复才到主机
    clock.advance(&mut net).expect("tick");
    assert_eq!(net.queue_len(rn), 0);
    assert_eq!(net.host_active_vc(h), Some(1));
}

#[test]
fn draining_an_unbound_nic_is_fatal() {
    let mut net = Network::default();
    let h = net.add_host("h1");
    let n = net.attach_nic(h);
    // 接口没有绑定链路，cell 无处可去
    net.send_cell(h, n, Cell::signal(0, SignalMsg::CallAck, 1))
        .expect("send");

    let mut clock = Clock::default();
    assert_eq!(
        clock.advance(&mut net),
        Err(NetError::NoLink { nic: n })
    );
    // 报错时 cell 不被销毁，留在 output queue 里
    assert_eq!(net.queue_len(n), 1);
}

#[test]
fn sending_on_a_foreign_nic_is_rejected() {
    let mut net = Network::default();
    let h1 = net.add_host("h1");
    let h2 = net.add_host("h2");
    let n1 = net.attach_nic(h1);

    assert_eq!(
        net.send_cell(h2, n1, Cell::signal(0, SignalMsg::CallAck, 1)),
        Err(NetError::NotOwned {
            element: h2,
            nic: n1
        })
    );
}

#[test]
fn link_peer_lookup_rejects_strangers() {
    let link = Link {
        id: LinkId(0),
        a: NicId(0),
        b: NicId(1),
    };
    assert_eq!(link.peer_of(NicId(0)), Ok(NicId(1)));
    assert_eq!(link.peer_of(NicId(1)), Ok(NicId(0)));
    assert_eq!(
        link.peer_of(NicId(2)),
        Err(NetError::NotAttached {
            link: LinkId(0),
            nic: NicId(2)
        })
    );
}

#[test]
fn clock_counts_ticks() {
    let mut net = Network::default();
    let mut clock = Clock::default();
    assert_eq!(clock.now(), Tick::ZERO);
    clock.run(&mut net, 3).expect("run");
    assert_eq!(clock.now(), Tick(3));
}
