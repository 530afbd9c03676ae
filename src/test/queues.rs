use std::net::Ipv4Addr;

use crate::net::{Cell, Packet, PacketId, SignalMsg};
use crate::queue::{CELL_PAYLOAD_BITS, Discipline, OutputQueue, QueueConfig, cells_for_bits};

fn sig(trace: u64) -> Cell {
    Cell::signal(0, SignalMsg::CallAck, trace)
}

fn hdr(pid: u64, bits: u32, trace: u64) -> Cell {
    let packet = Packet::new(
        PacketId(pid),
        Ipv4Addr::new(10, 0, 0, 1),
        Ipv4Addr::new(10, 0, 0, 2),
        bits,
    );
    Cell::header(1, packet, trace)
}

fn dat(pid: u64, trace: u64) -> Cell {
    Cell::data(1, PacketId(pid), CELL_PAYLOAD_BITS, trace)
}

fn queue(discipline: Discipline) -> OutputQueue {
    let cfg = QueueConfig {
        discipline,
        ..QueueConfig::default()
    };
    OutputQueue::new(cfg, 42)
}

/// 用 tail drop 把队列填到 `n`，不触碰 PPD/EPD 记忆，之后恢复原策略。
fn fill(q: &mut OutputQueue, n: usize) {
    let d = q.discipline();
    q.set_discipline(Discipline::TailDrop);
    let mut i = 0;
    while q.len() < n {
        assert!(q.admit(sig(900_000 + i)).is_admitted());
        i += 1;
    }
    q.set_discipline(d);
}

#[test]
fn cells_for_bits_rounds_up() {
    assert_eq!(cells_for_bits(0), 0);
    assert_eq!(cells_for_bits(1), 1);
    assert_eq!(cells_for_bits(CELL_PAYLOAD_BITS), 1);
    assert_eq!(cells_for_bits(CELL_PAYLOAD_BITS + 1), 2);
    assert_eq!(cells_for_bits(1000), 3);
}

#[test]
fn tail_drop_admits_iff_below_capacity() {
    let mut q = queue(Discipline::TailDrop);
    for i in 0..20 {
        assert!(q.admit(sig(i)).is_admitted());
    }
    assert_eq!(q.len(), 20);
    assert!(!q.admit(sig(99)).is_admitted());
    assert_eq!(q.len(), 20);

    q.drain(1);
    assert!(q.admit(sig(100)).is_admitted());
    assert_eq!(q.len(), 20);
}

#[test]
fn no_discipline_ever_exceeds_capacity() {
    for d in [
        Discipline::TailDrop,
        Discipline::Red,
        Discipline::Ppd,
        Discipline::Epd,
    ] {
        let mut q = queue(d);
        for i in 0..200u64 {
            q.admit(hdr(i, CELL_PAYLOAD_BITS, i));
            assert!(q.len() <= 20, "discipline {d:?} overflowed to {}", q.len());
        }
    }
}

#[test]
fn red_never_drops_at_or_below_threshold() {
    let mut q = queue(Discipline::Red);
    // 占用 0..=10 都不超过阈值，无抽签
    for i in 0..11 {
        assert!(q.admit(sig(i)).is_admitted());
    }
    assert_eq!(q.len(), 11);
}

#[test]
fn red_drops_with_certainty_at_capacity() {
    let mut q = queue(Discipline::Red);
    fill(&mut q, 20);
    // 占用 = 容量时丢弃概率为 1
    assert!(!q.admit(sig(1)).is_admitted());
    assert_eq!(q.len(), 20);
}

#[test]
fn red_drop_rate_tracks_occupancy() {
    let mut q = queue(Discipline::Red);
    let trials = 4000u32;
    let mut drops = 0u32;
    for _ in 0..trials {
        // 占用 15：p = (15 - 10) / (20 - 10) = 0.5
        fill(&mut q, 15);
        if !q.admit(sig(1)).is_admitted() {
            drops += 1;
        }
        q.drain(q.len());
    }
    let rate = f64::from(drops) / f64::from(trials);
    assert!((rate - 0.5).abs() < 0.05, "rate {rate}");
}

#[test]
fn ppd_drops_rest_of_remembered_packet_without_drawing() {
    let mut q = queue(Discipline::Ppd);
    fill(&mut q, 20);
    // 占用 = 容量，必丢，packet 7 进入记忆槽位
    assert!(!q.admit(dat(7, 1)).is_admitted());

    q.drain(20);
    assert_eq!(q.len(), 0);
    // 队列已空，但 packet 7 的后续 cell 仍然直接丢
    assert!(!q.admit(dat(7, 2)).is_admitted());
    // 其它 packet 正常入队
    assert!(q.admit(dat(8, 3)).is_admitted());
    assert!(!q.admit(dat(7, 4)).is_admitted());
    assert_eq!(q.len(), 1);
}

#[test]
fn ppd_memory_holds_one_packet_only() {
    let mut q = queue(Discipline::Ppd);
    fill(&mut q, 20);
    assert!(!q.admit(dat(7, 1)).is_admitted());
    // packet 8 也在满队列上被丢，顶掉记忆里的 packet 7
    assert!(!q.admit(dat(8, 2)).is_admitted());

    q.drain(20);
    assert!(q.admit(dat(7, 3)).is_admitted());
    assert!(!q.admit(dat(8, 4)).is_admitted());
}

#[test]
fn epd_rejects_whole_packet_that_cannot_fit() {
    let mut q = queue(Discipline::Epd);
    fill(&mut q, 15);
    // 6 个 cell 的 packet：模拟槽位 15..=20，最后一个必丢
    assert!(!q.admit(hdr(5, 6 * CELL_PAYLOAD_BITS, 1)).is_admitted());
    assert_eq!(q.len(), 15);
    // 首 cell 被拒后，该 packet 的数据 cell 全部直接丢
    assert!(!q.admit(dat(5, 2)).is_admitted());
    q.drain(15);
    // 重发的首 cell 也命中丢弃记忆
    assert!(!q.admit(hdr(5, CELL_PAYLOAD_BITS, 3)).is_admitted());
}

#[test]
fn epd_accepted_packet_bypasses_later_draws() {
    let mut q = queue(Discipline::Epd);
    // 空队列上整个 packet 的模拟槽位都不超过阈值，必收
    assert!(q.admit(hdr(5, 4 * CELL_PAYLOAD_BITS, 1)).is_admitted());
    fill(&mut q, 19);
    // packet 5 在接受记忆里，占用 19 也不抽签
    assert!(q.admit(dat(5, 2)).is_admitted());
    assert_eq!(q.len(), 20);
    // 记忆之外的 packet 走普通 RED：占用 = 容量，必丢
    assert!(!q.admit(dat(9, 3)).is_admitted());
}

#[test]
fn epd_unremembered_data_cell_admitted_below_threshold() {
    let mut q = queue(Discipline::Epd);
    assert!(q.admit(dat(3, 1)).is_admitted());
    assert_eq!(q.len(), 1);
}

#[test]
fn switching_discipline_keeps_drop_memory_until_reset() {
    let mut q = queue(Discipline::Ppd);
    fill(&mut q, 20);
    assert!(!q.admit(dat(9, 1)).is_admitted());
    q.drain(20);

    q.set_discipline(Discipline::Epd);
    assert!(!q.admit(dat(9, 2)).is_admitted());

    q.reset_memory();
    assert!(q.admit(dat(9, 3)).is_admitted());
}

#[test]
fn drain_is_fifo_and_bounded() {
    let mut q = queue(Discipline::TailDrop);
    for i in 1..=15 {
        assert!(q.admit(sig(i)).is_admitted());
    }
    let first = q.drain(10);
    assert_eq!(first.len(), 10);
    assert_eq!(
        first.iter().map(|c| c.trace_id).collect::<Vec<_>>(),
        (1..=10).collect::<Vec<u64>>()
    );
    assert_eq!(q.len(), 5);

    let rest = q.drain(10);
    assert_eq!(rest.len(), 5);
    assert_eq!(rest[0].trace_id, 11);
    assert!(q.is_empty());
}

#[test]
fn same_seed_reproduces_admission_decisions() {
    let run = |seed: u64| {
        let mut q = OutputQueue::new(
            QueueConfig {
                discipline: Discipline::Red,
                ..QueueConfig::default()
            },
            seed,
        );
        let mut outcomes = Vec::new();
        for i in 0..50 {
            fill(&mut q, 15);
            outcomes.push(q.admit(sig(i)).is_admitted());
            q.drain(q.len());
        }
        outcomes
    };
    assert_eq!(run(7), run(7));
    assert_ne!(run(7), run(8));
}

#[test]
fn queue_config_uses_wire_field_names() {
    let raw = r#"{"capacity":30,"dropStartThreshold":5,"drainRate":3,"discipline":"EPD"}"#;
    let cfg: QueueConfig = serde_json::from_str(raw).expect("parse config");
    assert_eq!(cfg.capacity, 30);
    assert_eq!(cfg.drop_start_threshold, 5);
    assert_eq!(cfg.drain_rate, 3);
    assert_eq!(cfg.discipline, Discipline::Epd);

    let defaults: QueueConfig = serde_json::from_str("{}").expect("parse empty");
    assert_eq!(defaults.capacity, 20);
    assert_eq!(defaults.drop_start_threshold, 10);
    assert_eq!(defaults.drain_rate, 10);
    assert_eq!(defaults.discipline, Discipline::TailDrop);

    let out = serde_json::to_string(&QueueConfig::default()).expect("serialize");
    assert!(out.contains("\"tailDrop\""), "{out}");
    assert!(out.contains("\"dropStartThreshold\""), "{out}");
}
