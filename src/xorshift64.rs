use alloc::boxed::Box;
use wrapping_arithmetic::wrappit;
#[cfg(feature = "serde")] use serde::{Deserialize, Serialize};

use super::mix::hash_seed;
use super::source::{high_bits_64, Source, Stateful};

// Xorshift64 features
// -classic three-shift xorshift register with a multiplying scrambler
// -64-bit output, 64-bit state, period 2**64 - 1 (zero state excluded)
// -the all-zero state is a fixed point and is silently replaced

/// Fallback substituted whenever an all-zero state would be produced.
#[inline] fn fallback() -> u64 {
    super::GOLDEN_GAMMA
}

/// Xorshift64* non-cryptographic RNG. 64-bit output, 64-bit nonzero state.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Eq, PartialEq)]
pub struct Xorshift64 {
    state: u64,
}

// As recommended, this Debug implementation does not expose internal state.
impl core::fmt::Debug for Xorshift64 {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Xorshift64 {{}}")
    }
}

impl Xorshift64 {

    /// Advances to the next state. Shift triple (12, 25, 27) from
    /// Vigna, S., An experimental exploration of Marsaglia's xorshift
    /// generators, scrambled (2016).
    #[inline]
    fn step(&mut self) {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
    }

    /// Returns the current 64-bit output.
    #[wrappit] #[inline]
    fn get(&self) -> u64 {
        self.state * super::XORSHIFT_MULTIPLIER
    }

    /// Generates the next 64-bit random number.
    #[inline]
    pub fn next(&mut self) -> u64 {
        self.step();
        self.get()
    }

    /// Creates a new Xorshift64 RNG.
    pub fn new() -> Self {
        Xorshift64 { state: fallback() }
    }

    /// Creates a new Xorshift64 RNG from a 64-bit seed.
    /// A zero seed is replaced with a fixed nonzero fallback.
    pub fn from_seed(seed: u64) -> Self {
        Xorshift64 { state: if seed == 0 { fallback() } else { seed } }
    }

    /// Creates a new Xorshift64 RNG from a string seed.
    pub fn from_text(text: &str) -> Self {
        Self::from_seed(hash_seed(text))
    }
}

impl Source for Xorshift64 {
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

impl Stateful for Xorshift64 {
    type State = u64;

    #[inline]
    fn state(&self) -> u64 {
        self.state
    }

    /// Zero is degenerate and is silently replaced.
    #[inline]
    fn set_state(&mut self, state: u64) {
        self.state = if state == 0 { fallback() } else { state };
    }
}

use super::{Error, RngCore, SeedableRng};

impl RngCore for Xorshift64 {
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

impl SeedableRng for Xorshift64 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        // Always use Little-Endian.
        Xorshift64::from_seed(u64::from_le_bytes(seed))
    }
}
