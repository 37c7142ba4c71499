use alloc::boxed::Box;
use wrapping_arithmetic::wrappit;
#[cfg(feature = "serde")] use serde::{Deserialize, Serialize};

use super::mix::{hash_seed, mix};
use super::source::{high_bits_64, Source, Stateful};

// Xoshiro256 features
// -shift/rotate/xor state advance over a quadruple of 64-bit words
// -64-bit output with a PlusPlus rotate-add scrambler
// -period 2**256 - 1, the all-zero state is excluded and silently replaced

/// Fallback word substituted whenever an all-zero state would be produced.
#[inline] fn fallback() -> u64 {
    super::GOLDEN_GAMMA
}

/// Xoshiro256++ non-cryptographic RNG. 64-bit output, 4x64-bit state.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Eq, PartialEq)]
pub struct Xoshiro256 {
    s0: u64,
    s1: u64,
    s2: u64,
    s3: u64,
}

// As recommended, this Debug implementation does not expose internal state.
impl core::fmt::Debug for Xoshiro256 {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Xoshiro256 {{}}")
    }
}

impl Xoshiro256 {

    /// Returns the current 64-bit output. The PlusPlus scrambler from
    /// Blackman, D. and Vigna, S., Scrambled Linear Pseudorandom Number
    /// Generators (2018).
    #[wrappit] #[inline]
    fn get(&self) -> u64 {
        (self.s0 + self.s3).rotate_left(23) + self.s0
    }

    /// Advances to the next state.
    #[inline]
    fn step(&mut self) {
        let t = self.s1 << 17;
        self.s2 ^= self.s0;
        self.s3 ^= self.s1;
        self.s1 ^= self.s2;
        self.s0 ^= self.s3;
        self.s2 ^= t;
        self.s3 = self.s3.rotate_left(45);
    }

    /// Generates the next 64-bit random number.
    #[inline]
    pub fn next(&mut self) -> u64 {
        let x = self.get();
        self.step();
        x
    }

    /// Creates a new Xoshiro256 RNG.
    pub fn new() -> Self {
        Self::from_seed(0)
    }

    /// Creates a new Xoshiro256 RNG from a 64-bit seed.
    /// The four words come from consecutive avalanche outputs; the
    /// astronomically unlikely all-zero result is replaced.
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = Xoshiro256 {
            s0: mix(seed.wrapping_add(super::GOLDEN_GAMMA)),
            s1: mix(seed.wrapping_add(super::GOLDEN_GAMMA.wrapping_mul(2))),
            s2: mix(seed.wrapping_add(super::GOLDEN_GAMMA.wrapping_mul(3))),
            s3: mix(seed.wrapping_add(super::GOLDEN_GAMMA.wrapping_mul(4))),
        };
        if (rng.s0 | rng.s1 | rng.s2 | rng.s3) == 0 {
            rng.s0 = fallback();
        }
        rng
    }

    /// Creates a new Xoshiro256 RNG from a string seed.
    pub fn from_text(text: &str) -> Self {
        Self::from_seed(hash_seed(text))
    }
}

impl Source for Xoshiro256 {
    #[inline]
    fn next_bits(&mut self, bits: u32) -> u32 {
        high_bits_64(self.next(), bits)
    }

    #[inline]
    fn next_long(&mut self) -> u64 {
        self.next()
    }

    fn copy(&self) -> Box<dyn Source> {
        Box::new(self.clone())
    }
}

impl Stateful for Xoshiro256 {
    type State = (u64, u64, u64, u64);

    #[inline]
    fn state(&self) -> (u64, u64, u64, u64) {
        (self.s0, self.s1, self.s2, self.s3)
    }

    /// The all-zero quadruple is degenerate and is silently replaced.
    #[inline]
    fn set_state(&mut self, state: (u64, u64, u64, u64)) {
        self.s0 = state.0;
        self.s1 = state.1;
        self.s2 = state.2;
        self.s3 = state.3;
        if (self.s0 | self.s1 | self.s2 | self.s3) == 0 {
            self.s0 = fallback();
        }
    }
}

use super::{Error, RngCore, SeedableRng};

impl RngCore for Xoshiro256 {
    fn next_u32(&mut self) -> u32 {
        (self.next() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let bytes = dest.len();
        let mut i = 0;
        while i < bytes {
            let x = self.next();
            let j = bytes.min(i + 8);
            // Always use Little-Endian.
            dest[i .. j].copy_from_slice(&x.to_le_bytes()[0 .. (j - i)]);
            i = j;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        Ok(self.fill_bytes(dest))
    }
}

impl SeedableRng for Xoshiro256 {
    type Seed = [u8; 32];

    fn from_seed(seed: Self::Seed) -> Self {
        use core::convert::TryInto;
        // Always use Little-Endian.
        let mut rng = Xoshiro256 {
            s0: u64::from_le_bytes(seed[0 .. 8].try_into().unwrap()),
            s1: u64::from_le_bytes(seed[8 .. 16].try_into().unwrap()),
            s2: u64::from_le_bytes(seed[16 .. 24].try_into().unwrap()),
            s3: u64::from_le_bytes(seed[24 .. 32].try_into().unwrap()),
        };
        if (rng.s0 | rng.s1 | rng.s2 | rng.s3) == 0 {
            rng.s0 = fallback();
        }
        rng
    }
}
