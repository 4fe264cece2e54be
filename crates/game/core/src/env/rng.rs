//! RNG oracle for the simulation's random decisions.
//!
//! Every random choice in the core (waypoint selection, random walk targets,
//! damage rolls, blood spray, loot) goes through [`RngOracle::random_int`], so a
//! seeded generator replays a session exactly.

/// Source of uniformly distributed integers.
pub trait RngOracle {
    /// Next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform integer in `[0, max]` inclusive.
    fn random_int(&mut self, max: u32) -> u32 {
        match max.checked_add(1) {
            Some(span) => self.next_u32() % span,
            None => self.next_u32(),
        }
    }

    /// Uniform float in `[min, max]`.
    fn random_range(&mut self, min: f32, max: f32) -> f32 {
        const STEPS: u32 = 1000;
        min + (max - min) * self.random_int(STEPS) as f32 / STEPS as f32
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR variant: 64-bit LCG state, 32-bit permuted output.
#[derive(Clone, Copy, Debug)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self {
            state: Self::pcg_step(seed.wrapping_add(Self::INCREMENT)),
        }
    }

    /// `state' = (state * multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl Default for PcgRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = Self::pcg_step(old);
        Self::pcg_output(old)
    }
}

/// Replays a fixed list of raw values, cycling when exhausted.
///
/// Useful for scripted scenarios: `random_int(max)` yields `value % (max + 1)`.
#[derive(Clone, Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    cursor: usize,
}

impl SequenceRng {
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, cursor: 0 }
    }

    /// A source that always yields `value`.
    pub fn constant(value: u32) -> Self {
        Self::new(vec![value])
    }
}

impl RngOracle for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value
    }
}
