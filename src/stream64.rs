use alloc::boxed::Box;
use wrapping_arithmetic::wrappit;
#[cfg(feature = "serde")] use serde::{Deserialize, Serialize};

use super::mix::{hash_seed, mix};
use super::source::{high_bits_64, Skipping, Source, Stateful};

// Stream64 features
// -SplitMix-derived with a caller-settable increment (the stream)
// -the stream is forced odd by construction, giving 2**63 distinguishable
//  pairwise non-overlapping sequences from the same seed space
// -full period 2**64 within each stream, O(1) signed jump-ahead

/// Stream64 non-cryptographic RNG. 64-bit output, 64-bit state plus a
/// rarely-changing odd stream constant. Two instances seeded identically
/// but on different streams produce unrelated sequences.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Eq, PartialEq)]
pub struct Stream64 {
    /// Post-increment state of the previous call.
    state: u64,
    /// Per-call increment. Odd by construction.
    stream: u64,
}

// As recommended, this Debug implementation does not expose internal state.
impl core::fmt::Debug for Stream64 {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Stream64 {{}}")
    }
}

impl Stream64 {

    /// Advances to the next state.
    #[wrappit] #[inline]
    fn step(&mut self) {
        self.state = self.state + self.stream;
    }

    /// Returns the current 64-bit output.
    #[inline]
    fn get(&self) -> u64 {
        mix(self.state)
    }

    /// Generates the next 64-bit random number.
    #[inline]
    pub fn next(&mut self) -> u64 {
        self.step();
        self.get()
    }

    /// Creates a new Stream64 RNG on the default stream.
    pub fn new() -> Self {
        Stream64 { state: 0, stream: super::GOLDEN_GAMMA }
    }

    /// Creates a new Stream64 RNG from a 64-bit seed, on the default stream.
    pub fn from_seed(seed: u64) -> Self {
        Stream64 { state: seed, stream: super::GOLDEN_GAMMA }
    }

    /// Creates a new Stream64 RNG from a seed and a stream selector.
    /// Any selector works; its low bit is forced on.
    pub fn from_seed_and_stream(seed: u64, stream: u64) -> Self {
        Stream64 { state: seed, stream: stream | 1 }
    }

    /// Creates a new Stream64 RNG from a string seed, on the default stream.
    pub fn from_text(text: &str) -> Self {
        Self::from_seed(hash_seed(text))
    }

    /// Returns the stream constant. Always odd.
    #[inline]
    pub fn stream(&self) -> u64 {
        self.stream
    }

    /// Selects a stream without touching the state. The low bit is forced
    /// on rather than rejecting even selectors.
    #[inline]
    pub fn set_stream(&mut self, stream: u64) {
        self.stream = stream | 1;
    }

    /// Jumps forward (if steps > 0) or backward (if steps < 0) and returns
    /// the output at the new position, by scaling the increment.
    #[wrappit] #[inline]
    pub fn jump(&mut self, steps: i64) -> u64 {
        self.state = self.state + self.stream * steps as u64;
        self.get()
    }
}

impl Source for Stream64 {
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

impl Stateful for Stream64 {
    type State = (u64, u64);

    #[inline]
    fn state(&self) -> (u64, u64) {
        (self.state, self.stream)
    }

    /// The stream half has its low bit forced on; the state half accepts
    /// every value.
    #[inline]
    fn set_state(&mut self, state: (u64, u64)) {
        self.state = state.0;
        self.stream = state.1 | 1;
    }
}

impl Skipping for Stream64 {
    #[inline]
    fn skip(&mut self, steps: i64) -> u64 {
        self.jump(steps)
    }
}

use super::{Error, RngCore, SeedableRng};

impl RngCore for Stream64 {
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

impl SeedableRng for Stream64 {
    type Seed = [u8; 16];

    fn from_seed(seed: Self::Seed) -> Self {
        use core::convert::TryInto;
        // Always use Little-Endian.
        Stream64::from_seed_and_stream(
            u64::from_le_bytes(seed[0 .. 8].try_into().unwrap()),
            u64::from_le_bytes(seed[8 .. 16].try_into().unwrap()),
        )
    }
}
