//! Deterministic string-seeded randomness.
//!
//! Every random decision in the engine (rival rolls, weekly events, quest
//! shuffles, roster names) is keyed by a string such as a date or an id, so a
//! replay over the same log always sees the same sequence. The hash is
//! `cyrb128` over UTF-16 code units and the generator is `sfc32`; both are
//! pure 32-bit integer arithmetic and therefore identical on every platform.

use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// Hash a seed string into four 32-bit state words.
#[must_use]
pub fn cyrb128(seed: &str) -> [u32; 4] {
    let mut h1: u32 = 1_779_033_703;
    let mut h2: u32 = 3_144_134_277;
    let mut h3: u32 = 1_013_904_242;
    let mut h4: u32 = 2_773_480_762;
    for unit in seed.encode_utf16() {
        let k = u32::from(unit);
        h1 = h2 ^ (h1 ^ k).wrapping_mul(597_399_067);
        h2 = h3 ^ (h2 ^ k).wrapping_mul(2_869_860_233);
        h3 = h4 ^ (h3 ^ k).wrapping_mul(951_274_213);
        h4 = h1 ^ (h4 ^ k).wrapping_mul(2_716_044_179);
    }
    h1 = (h3 ^ (h1 >> 18)).wrapping_mul(597_399_067);
    h2 = (h4 ^ (h2 >> 22)).wrapping_mul(2_869_860_233);
    h3 = (h1 ^ (h3 >> 17)).wrapping_mul(951_274_213);
    h4 = (h2 ^ (h4 >> 19)).wrapping_mul(2_716_044_179);
    h1 ^= h2 ^ h3 ^ h4;
    h2 ^= h1;
    h3 ^= h1;
    h4 ^= h1;
    [h1, h2, h3, h4]
}

/// Small fast counting generator with 128 bits of state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sfc32 {
    a: u32,
    b: u32,
    c: u32,
    d: u32,
}

impl Sfc32 {
    #[must_use]
    pub const fn new(state: [u32; 4]) -> Self {
        Self {
            a: state[0],
            b: state[1],
            c: state[2],
            d: state[3],
        }
    }

    /// Seed a generator from an arbitrary string via [`cyrb128`].
    #[must_use]
    pub fn from_seed_str(seed: &str) -> Self {
        Self::new(cyrb128(seed))
    }

    fn step(&mut self) -> u32 {
        let mut t = self.a.wrapping_add(self.b);
        self.a = self.b ^ (self.b >> 9);
        self.b = self.c.wrapping_add(self.c << 3);
        self.c = self.c.rotate_left(21);
        self.d = self.d.wrapping_add(1);
        t = t.wrapping_add(self.d);
        self.c = self.c.wrapping_add(t);
        t
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.step()) / 4_294_967_296.0
    }
}

impl RngCore for Sfc32 {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.step());
        let hi = u64::from(self.step());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Sfc32 {
    type Seed = [u8; 16];

    fn from_seed(seed: Self::Seed) -> Self {
        let mut words = [0_u32; 4];
        for (word, bytes) in words.iter_mut().zip(seed.chunks_exact(4)) {
            *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }
        Self::new(words)
    }
}

/// One-shot draw in `[0, 1)` derived from `seed` without retaining state.
#[must_use]
pub fn seeded_float(seed: &str) -> f64 {
    Sfc32::from_seed_str(seed).next_f64()
}

/// Fisher–Yates shuffle driven by an [`Sfc32`] stream.
pub fn shuffle_in_place<T>(items: &mut [T], rng: &mut Sfc32) {
    for i in (1..items.len()).rev() {
        let j = crate::numbers::index_from_unit(rng.next_f64(), i + 1);
        items.swap(i, j);
    }
}
