//! Seeded xorshift32 used for spawn layout and lift jitter.
//!
//! Each scene owns its own state so scenes never share a random stream.

#[inline]
pub fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Small PRNG wrapper around xorshift32
#[derive(Clone, Debug)]
pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        // xorshift gets stuck at zero
        Self { state: if seed == 0 { 0x9E37_79B9 } else { seed } }
    }

    /// Uniform in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        (xorshift32(&mut self.state) >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform in [-0.5, 0.5)
    pub fn centered(&mut self) -> f32 {
        self.next_f32() - 0.5
    }

    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    /// Uniform index in [0, n)
    pub fn index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        ((self.next_f32() * n as f32) as usize).min(n - 1)
    }

    /// Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_f32_stays_in_unit_interval() {
        let mut rng = Rng::new(12345);
        for _ in 0..10_000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn zero_seed_does_not_stall() {
        let mut rng = Rng::new(0);
        let a = rng.next_f32();
        let b = rng.next_f32();
        assert_ne!(a, b);
    }

    #[test]
    fn shuffle_keeps_every_element() {
        let mut rng = Rng::new(7);
        let mut items: Vec<usize> = (0..24).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..24).collect::<Vec<_>>());
    }
}
