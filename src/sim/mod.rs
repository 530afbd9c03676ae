//! 仿真核心模块
//!
//! 此模块包含离散时钟仿真的核心组件：全局 tick 与两阶段时钟驱动。

// 子模块声明
mod clock;
mod tick;

// 重新导出公共接口
pub use clock::Clock;
pub use tick::Tick;
