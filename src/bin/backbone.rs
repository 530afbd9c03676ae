//! 骨干网呼叫仿真
//!
//! 在五路由器骨干网上同时发起两路呼叫，观察信令握手、WAIT 重试
//! 与（可选的）数据面转发。

use clap::{Parser, ValueEnum};
use vcsim_rs::demo::build_backbone;
use vcsim_rs::net::Network;
use vcsim_rs::queue::Discipline;
use vcsim_rs::sim::Clock;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DisciplineArg {
    TailDrop,
    Red,
    Ppd,
    Epd,
}

impl From<DisciplineArg> for Discipline {
    fn from(d: DisciplineArg) -> Discipline {
        match d {
            DisciplineArg::TailDrop => Discipline::TailDrop,
            DisciplineArg::Red => Discipline::Red,
            DisciplineArg::Ppd => Discipline::Ppd,
            DisciplineArg::Epd => Discipline::Epd,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "backbone", about = "骨干网仿真：comp1 呼叫 13，comp2 呼叫 14")]
struct Args {
    /// 呼叫建立阶段运行多少个 tick
    #[arg(long, default_value_t = 14)]
    ticks: u64,
    /// 所有接口使用的丢弃策略
    #[arg(long, value_enum, default_value_t = DisciplineArg::TailDrop)]
    discipline: DisciplineArg,
    /// 随机源种子（入队判定可复现）
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// 建立后从 comp1 发一个多大的 packet（bits），不指定则不发
    #[arg(long)]
    packet_bits: Option<u32>,
    /// 发包后再运行多少个 tick
    #[arg(long, default_value_t = 6)]
    extra_ticks: u64,
}

fn main() -> Result<(), vcsim_rs::net::NetError> {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut net = Network::new(args.seed);
    let bb = build_backbone(&mut net);
    for el in [bb.r1, bb.r2, bb.r3, bb.r4, bb.r5, bb.comp1, bb.comp2] {
        net.set_discipline(el, args.discipline.into());
    }

    let mut clock = Clock::default();
    clock.advance(&mut net)?;

    // 两路呼叫同时发起，会在 R2 上撞出 WAIT 重试
    net.host_setup(bb.comp1, 13)?;
    net.host_setup(bb.comp2, 14)?;
    clock.run(&mut net, args.ticks)?;

    println!(
        "established @ {:?}: comp1 vc={:?}, comp2 vc={:?}",
        clock.now(),
        net.host_active_vc(bb.comp1),
        net.host_active_vc(bb.comp2),
    );

    if let Some(bits) = args.packet_bits {
        let pkt = net.host_send_packet(bb.comp1, bits)?;
        clock.run(&mut net, args.extra_ticks)?;
        println!("sent packet {:?} ({} bits)", pkt, bits);
    }

    println!(
        "done @ {:?}: admitted={}, dropped={}, delivered={}, protocol_drops={}",
        clock.now(),
        net.stats.admitted_cells,
        net.stats.dropped_cells,
        net.stats.delivered_cells,
        net.stats.protocol_drops,
    );
    Ok(())
}
