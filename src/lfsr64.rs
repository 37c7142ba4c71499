use alloc::boxed::Box;
#[cfg(feature = "serde")] use serde::{Deserialize, Serialize};

use super::mix::hash_seed;
use super::source::{high_bits_64, Source, Stateful};

// Lfsr64 features
// -Galois linear-feedback shift register over a single 64-bit word
// -maximal-length taps: every nonzero state occurs exactly once per period
// -period 2**64 - 1, the zero state is a fixed point and is silently
//  replaced

/// Fallback substituted whenever a zero state would be produced.
#[inline] fn fallback() -> u64 {
    super::GOLDEN_GAMMA
}

/// Galois LFSR RNG. 64-bit output, 64-bit nonzero state. The output is the
/// state itself, so consecutive outputs are strongly correlated; the draw
/// of this family is the exactly-once-per-period guarantee, useful for
/// visiting every nonzero 64-bit value in a scrambled order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Eq, PartialEq)]
pub struct Lfsr64 {
    state: u64,
}

// As recommended, this Debug implementation does not expose internal state.
impl core::fmt::Debug for Lfsr64 {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Lfsr64 {{}}")
    }
}

impl Lfsr64 {

    /// Advances to the next state: shift right, feed the dropped bit back
    /// into the tap positions. Branchless; `0u64.wrapping_sub(bit)` is
    /// all-ones exactly when the low bit was set.
    #[inline]
    fn step(&mut self) {
        let bit = self.state & 1;
        self.state = (self.state >> 1) ^ (super::LFSR_TAPS & 0u64.wrapping_sub(bit));
    }

    /// Generates the next 64-bit random number.
    #[inline]
    pub fn next(&mut self) -> u64 {
        self.step();
        self.state
    }

    /// Creates a new Lfsr64 RNG.
    pub fn new() -> Self {
        Lfsr64 { state: fallback() }
    }

    /// Creates a new Lfsr64 RNG from a 64-bit seed.
    /// A zero seed is replaced with a fixed nonzero fallback.
    pub fn from_seed(seed: u64) -> Self {
        Lfsr64 { state: if seed == 0 { fallback() } else { seed } }
    }

    /// Creates a new Lfsr64 RNG from a string seed.
    pub fn from_text(text: &str) -> Self {
        Self::from_seed(hash_seed(text))
    }
}

impl Source for Lfsr64 {
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

impl Stateful for Lfsr64 {
    type State = u64;

    #[inline]
    fn state(&self) -> u64 {
        self.state
    }

    /// Zero is a fixed point of the transition and is silently replaced.
    #[inline]
    fn set_state(&mut self, state: u64) {
        self.state = if state == 0 { fallback() } else { state };
    }
}

use super::{Error, RngCore, SeedableRng};

impl RngCore for Lfsr64 {
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

impl SeedableRng for Lfsr64 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        // Always use Little-Endian.
        Lfsr64::from_seed(u64::from_le_bytes(seed))
    }
}
