use alloc::boxed::Box;
use wrapping_arithmetic::wrappit;
#[cfg(feature = "serde")] use serde::{Deserialize, Serialize};

use super::mix::{hash_seed, mix};
use super::source::{high_bits_32, Source, Stateful};

// Xoroshiro64 features
// -rotate/shift/xor state advance over a pair of 32-bit words
// -32-bit output with a StarStar multiplying scrambler
// -period 2**64 - 1, the all-zero state is excluded and silently replaced
// -built purely on 32-bit operations, so the sequence is identical on any
//  word size

/// Fallback word substituted whenever an all-zero state would be produced.
#[inline] fn fallback() -> u32 {
    0x9e3779bb
}

/// Xoroshiro64** non-cryptographic RNG. 32-bit output, 2x32-bit state.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Eq, PartialEq)]
pub struct Xoroshiro64 {
    s0: u32,
    s1: u32,
}

// As recommended, this Debug implementation does not expose internal state.
impl core::fmt::Debug for Xoroshiro64 {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Xoroshiro64 {{}}")
    }
}

impl Xoroshiro64 {

    /// Returns the current 32-bit output. The StarStar scrambler from
    /// Blackman, D. and Vigna, S., Scrambled Linear Pseudorandom Number
    /// Generators (2018).
    #[wrappit] #[inline]
    fn get(&self) -> u32 {
        (self.s0 * 0x9e3779bb).rotate_left(5) * 5
    }

    /// Advances to the next state. Rotation triple (26, 9, 13).
    #[inline]
    fn step(&mut self) {
        let s1 = self.s1 ^ self.s0;
        self.s0 = self.s0.rotate_left(26) ^ s1 ^ (s1 << 9);
        self.s1 = s1.rotate_left(13);
    }

    /// Generates the next 32-bit random number.
    #[inline]
    pub fn next(&mut self) -> u32 {
        let x = self.get();
        self.step();
        x
    }

    /// Creates a new Xoroshiro64 RNG.
    pub fn new() -> Self {
        Self::from_seed(0)
    }

    /// Creates a new Xoroshiro64 RNG from a 64-bit seed.
    /// The seed is spread over both words through the avalanche; the
    /// astronomically unlikely all-zero result is replaced.
    pub fn from_seed(seed: u64) -> Self {
        let x = mix(seed);
        let mut rng = Xoroshiro64 { s0: (x >> 32) as u32, s1: x as u32 };
        if (rng.s0 | rng.s1) == 0 {
            rng.s0 = fallback();
        }
        rng
    }

    /// Creates a new Xoroshiro64 RNG from a string seed.
    pub fn from_text(text: &str) -> Self {
        Self::from_seed(hash_seed(text))
    }
}

impl Source for Xoroshiro64 {
    #[inline]
    fn next_bits(&mut self, bits: u32) -> u32 {
        high_bits_32(self.next(), bits)
    }

    #[inline]
    fn next_long(&mut self) -> u64 {
        ((self.next() as u64) << 32) | self.next() as u64
    }

    fn copy(&self) -> Box<dyn Source> {
        Box::new(self.clone())
    }
}

impl Stateful for Xoroshiro64 {
    type State = (u32, u32);

    #[inline]
    fn state(&self) -> (u32, u32) {
        (self.s0, self.s1)
    }

    /// The all-zero pair is degenerate and is silently replaced.
    #[inline]
    fn set_state(&mut self, state: (u32, u32)) {
        self.s0 = state.0;
        self.s1 = state.1;
        if (self.s0 | self.s1) == 0 {
            self.s0 = fallback();
        }
    }
}

use super::{Error, RngCore, SeedableRng};

impl RngCore for Xoroshiro64 {
    fn next_u32(&mut self) -> u32 {
        self.next()
    }

    fn next_u64(&mut self) -> u64 {
        Source::next_long(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let bytes = dest.len();
        let mut i = 0;
        while i < bytes {
            let x = self.next();
            let j = bytes.min(i + 4);
            // Always use Little-Endian.
            dest[i .. j].copy_from_slice(&x.to_le_bytes()[0 .. (j - i)]);
            i = j;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        Ok(self.fill_bytes(dest))
    }
}

impl SeedableRng for Xoroshiro64 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        // Always use Little-Endian.
        Xoroshiro64::from_seed(u64::from_le_bytes(seed))
    }
}
