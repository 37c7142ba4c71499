use alloc::boxed::Box;
use wrapping_arithmetic::wrappit;
#[cfg(feature = "serde")] use serde::{Deserialize, Serialize};

use super::mix::{hash_seed, mix};
use super::source::{high_bits_64, Source, Stateful};

// Xoroshiro128 features
// -rotate/shift/xor state advance over a pair of 64-bit words
// -64-bit output with a StarStar multiplying scrambler
// -period 2**128 - 1, the all-zero state is excluded and silently replaced

/// Fallback word substituted whenever an all-zero state would be produced.
#[inline] fn fallback() -> u64 {
    super::GOLDEN_GAMMA
}

/// Xoroshiro128** non-cryptographic RNG. 64-bit output, 2x64-bit state.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Eq, PartialEq)]
pub struct Xoroshiro128 {
    s0: u64,
    s1: u64,
}

// As recommended, this Debug implementation does not expose internal state.
impl core::fmt::Debug for Xoroshiro128 {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Xoroshiro128 {{}}")
    }
}

impl Xoroshiro128 {

    /// Returns the current 64-bit output. The StarStar scrambler from
    /// Blackman, D. and Vigna, S., Scrambled Linear Pseudorandom Number
    /// Generators (2018).
    #[wrappit] #[inline]
    fn get(&self) -> u64 {
        (self.s0 * 5).rotate_left(7) * 9
    }

    /// Advances to the next state. Rotation triple (24, 16, 37).
    #[inline]
    fn step(&mut self) {
        let s1 = self.s1 ^ self.s0;
        self.s0 = self.s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.s1 = s1.rotate_left(37);
    }

    /// Generates the next 64-bit random number.
    #[inline]
    pub fn next(&mut self) -> u64 {
        let x = self.get();
        self.step();
        x
    }

    /// Creates a new Xoroshiro128 RNG.
    pub fn new() -> Self {
        Self::from_seed(0)
    }

    /// Creates a new Xoroshiro128 RNG from a 64-bit seed.
    /// Both words come from consecutive avalanche outputs, in the manner
    /// recommended for seeding the xoshiro/xoroshiro family; the
    /// astronomically unlikely all-zero result is replaced.
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = Xoroshiro128 {
            s0: mix(seed.wrapping_add(super::GOLDEN_GAMMA)),
            s1: mix(seed.wrapping_add(super::GOLDEN_GAMMA.wrapping_mul(2))),
        };
        if (rng.s0 | rng.s1) == 0 {
            rng.s0 = fallback();
        }
        rng
    }

    /// Creates a new Xoroshiro128 RNG from a string seed.
    pub fn from_text(text: &str) -> Self {
        Self::from_seed(hash_seed(text))
    }
}

impl Source for Xoroshiro128 {
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

impl Stateful for Xoroshiro128 {
    type State = (u64, u64);

    #[inline]
    fn state(&self) -> (u64, u64) {
        (self.s0, self.s1)
    }

    /// The all-zero pair is degenerate and is silently replaced.
    #[inline]
    fn set_state(&mut self, state: (u64, u64)) {
        self.s0 = state.0;
        self.s1 = state.1;
        if (self.s0 | self.s1) == 0 {
            self.s0 = fallback();
        }
    }
}

use super::{Error, RngCore, SeedableRng};

impl RngCore for Xoroshiro128 {
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

impl SeedableRng for Xoroshiro128 {
    type Seed = [u8; 16];

    fn from_seed(seed: Self::Seed) -> Self {
        use core::convert::TryInto;
        // Always use Little-Endian.
        let mut rng = Xoroshiro128 {
            s0: u64::from_le_bytes(seed[0 .. 8].try_into().unwrap()),
            s1: u64::from_le_bytes(seed[8 .. 16].try_into().unwrap()),
        };
        if (rng.s0 | rng.s1) == 0 {
            rng.s0 = fallback();
        }
        rng
    }
}

#[cfg(test)] mod tests {
    use super::*;
    use super::super::*;

    #[test] pub fn run_tests() {

        let mut r: u64 = 0;
        let mut rnd = || -> u64 { r = r.wrapping_mul(MIX_M1).wrapping_add(0xffff); r };

        // The all-zero state is repaired on set and on byte seeding.
        let mut zeroed = Xoroshiro128::new();
        zeroed.set_state((0, 0));
        assert_ne!((0, 0), zeroed.state());
        let byte_zeroed = <Xoroshiro128 as SeedableRng>::from_seed([0; 16]);
        assert_ne!((0, 0), byte_zeroed.state());

        for _ in 0 .. 1<<8 {
            let seed = rnd();
            let mut a = Xoroshiro128::from_seed(seed);
            let mut b = Xoroshiro128::from_seed(seed);
            for _ in 0 .. 100 {
                assert_eq!(a.next(), b.next());
            }
            assert_ne!((0, 0), a.state());

            // State round-trips through get and set.
            let mut c = Xoroshiro128::new();
            c.set_state(a.state());
            assert_eq!(a.next(), c.next());

            // An independent copy continues the same sequence.
            let mut d = a.clone();
            assert_eq!(a.next(), d.next());
            a.next();
            assert_ne!(a.state(), d.state());
        }
    }

    #[test] pub fn determinism() {
        let mut a = Xoroshiro128::from_seed(0xdecafbad);
        let mut b = Xoroshiro128::from_seed(0xdecafbad);
        for _ in 0 .. 10000 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test] pub fn no_early_repeat() {
        let mut rng = Xoroshiro128::from_seed(42);
        let first = rng.next();
        for _ in 0 .. 1000000 {
            assert_ne!(first, rng.next());
        }
    }
}
