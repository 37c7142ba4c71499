use alloc::boxed::Box;
use wrapping_arithmetic::wrappit;
#[cfg(feature = "serde")] use serde::{Deserialize, Serialize};

use super::mix::{hash_seed, mix, unmix};
use super::source::{high_bits_64, Invertible, Skipping, Source, Stateful};

// Light64 features
// -SplitMix-derived: state advances by the golden gamma each call
// -64-bit output from a 64-bit state, full period 2**64, no bad states
// -O(1) signed jump-ahead by scaling the increment
// -the avalanche is a bijection of the post-increment state, so outputs
//  invert back to the state that produced them

/// Light64 non-cryptographic RNG. 64-bit output, 64-bit state.
/// The only family in the crate whose outputs are algebraically invertible.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Eq, PartialEq)]
pub struct Light64 {
    /// Post-increment state of the previous call.
    state: u64,
}

// As recommended, this Debug implementation does not expose internal state.
impl core::fmt::Debug for Light64 {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Light64 {{}}")
    }
}

impl Light64 {

    /// Advances to the next state.
    #[wrappit] #[inline]
    fn step(&mut self) {
        self.state = self.state + super::GOLDEN_GAMMA;
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

    /// Creates a new Light64 RNG at state 0.
    pub fn new() -> Self {
        Light64 { state: 0 }
    }

    /// Creates a new Light64 RNG from a 64-bit seed.
    /// All seeds work equally well; the period is the full 2**64.
    pub fn from_seed(seed: u64) -> Self {
        Light64 { state: seed }
    }

    /// Creates a new Light64 RNG from a string seed.
    pub fn from_text(text: &str) -> Self {
        Self::from_seed(hash_seed(text))
    }

    /// Jumps forward (if steps > 0) or backward (if steps < 0) and returns
    /// the output at the new position. The additive state transition makes
    /// this a single scaled increment, never a loop.
    #[wrappit] #[inline]
    pub fn jump(&mut self, steps: i64) -> u64 {
        self.state = self.state + super::GOLDEN_GAMMA * steps as u64;
        self.get()
    }
}

impl Source for Light64 {
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

impl Stateful for Light64 {
    type State = u64;

    #[inline]
    fn state(&self) -> u64 {
        self.state
    }

    /// Every 64-bit state is valid, including zero.
    #[inline]
    fn set_state(&mut self, state: u64) {
        self.state = state;
    }
}

impl Skipping for Light64 {
    #[inline]
    fn skip(&mut self, steps: i64) -> u64 {
        self.jump(steps)
    }
}

impl Invertible for Light64 {
    /// Undoes the avalanche, then backs off one increment, yielding the
    /// state that produces `output` on the next call.
    #[inline]
    fn inverse(output: u64) -> u64 {
        unmix(output).wrapping_sub(super::GOLDEN_GAMMA)
    }

    /// The pre-mix states of two outputs differ by steps times the
    /// increment; multiplying by the increment's inverse mod 2**64
    /// recovers the signed step count.
    #[inline]
    fn distance(from: u64, to: u64) -> i64 {
        unmix(to)
            .wrapping_sub(unmix(from))
            .wrapping_mul(super::GOLDEN_GAMMA_INVERSE) as i64
    }
}

use super::{Error, RngCore, SeedableRng};

impl RngCore for Light64 {
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

impl SeedableRng for Light64 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        // Always use Little-Endian.
        Light64::from_seed(u64::from_le_bytes(seed))
    }
}

#[cfg(test)] mod tests {
    use super::*;
    use super::super::*;

    #[test] pub fn run_tests() {

        let mut r: u64 = 0;
        let mut rnd = || -> u64 { r = r.wrapping_mul(MIX_M1).wrapping_add(0xffff); r };

        for _ in 0 .. 1<<8 {
            let seed = rnd();
            let mut light1 = Light64::from_seed(seed);
            let mut light2 = Light64::from_seed(seed);
            for _ in 0 .. 100 {
                assert_eq!(light1.next(), light2.next());
            }

            // Inverse round-trip: recover the state behind an output.
            let x = light1.next();
            let mut light3 = Light64::new();
            light3.set_state(Light64::inverse(x));
            assert_eq!(x, light3.next());

            // Distance recovers signed gaps between outputs.
            let from = light1.next();
            let gap = (rnd() & 0xffff) as i64;
            light1.jump(gap - 1);
            let to = light1.next();
            assert_eq!(gap, Light64::distance(from, to));
            assert_eq!(-gap, Light64::distance(to, from));
        }
    }

    #[test] pub fn determinism() {
        let mut light1 = Light64::from_seed(0xfeedbeef);
        let mut light2 = Light64::from_seed(0xfeedbeef);
        for _ in 0 .. 10000 {
            assert_eq!(light1.next(), light2.next());
        }
    }

    #[test] pub fn skip_round_trip() {
        let mut light = Light64::new();
        light.set_state(0x1);
        let expected = light.clone().next();
        light.skip(5);
        light.skip(-5);
        assert_eq!(0x1, light.state());
        // skip(0) reports the current output without mutating.
        assert_eq!(mix(0x1), light.skip(0));
        assert_eq!(0x1, light.state());
        assert_eq!(expected, light.next());
    }

    #[test] pub fn inverse_round_trip() {
        let mut light = Light64::from_seed(0x12345678);
        for _ in 0 .. 1000 {
            let x = light.next();
            let mut probe = Light64::new();
            probe.set_state(Light64::inverse(x));
            assert_eq!(x, probe.next());
        }
    }

    #[test] pub fn no_early_repeat() {
        let mut light = Light64::from_seed(99);
        let first = light.next();
        for _ in 0 .. 1000000 {
            assert_ne!(first, light.next());
        }
    }
}
