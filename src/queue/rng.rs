//! 可注入的随机源
//!
//! 丢弃概率判定需要可复现：用一个简单、确定性的 splitmix64 序列
//! （替代外部随机库，避免每次运行结果不稳定），种子可由调用方注入。

/// splitmix64 随机源。
#[derive(Debug, Clone)]
pub struct DropRng {
    state: u64,
}

impl DropRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// 重新播种，后续序列完全由新种子决定。
    pub fn reseed(&mut self, seed: u64) {
        self.state = seed;
    }

    pub fn next_u64(&mut self) -> u64 {
        // splitmix64
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    /// 均匀分布的 [0, 1) 浮点数
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}
