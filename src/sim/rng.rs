/// Seeded linear-congruential generator for the level compiler.
///
/// Every compile call builds its own `Lcg` from the seed and threads it
/// through each generation step, so two compiles never share a sequence.
///
/// `state' = state × 1664525 + 1013904223 (mod 2^32)`

#[derive(Clone, Debug)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    const MULTIPLIER: u32 = 1_664_525;
    const INCREMENT: u32 = 1_013_904_223;

    /// Mix a 64-bit seed into the 32-bit state with one splitmix64 round,
    /// so seeds that differ only in how their halves combine still diverge.
    pub fn new(seed: u64) -> Self {
        let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        Lcg { state: (z ^ (z >> 32)) as u32 }
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.state
    }

    /// Uniform in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits: the low bits of an LCG are the weak ones.
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform in [0, n). Returns 0 for n == 0.
    pub fn below(&mut self, n: usize) -> usize {
        if n == 0 { return 0; }
        ((self.next_f32() * n as f32) as usize).min(n - 1)
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Fisher–Yates, walking from the last index down.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}
