use alloc::boxed::Box;

// This module defines the contracts every generator in the crate implements.
// The derived-operations layer in gen.rs is written once against Source and
// never learns which concrete algorithm is plugged in.

/// A source of pseudorandom bits with mutable internal state.
///
/// Sources are single-threaded value objects. Mutating one instance from
/// several threads at once is a data race; callers who want sharing wrap
/// the source in an explicit handle such as `SharedGen`.
pub trait Source {
    /// Returns the top `bits` bits (1 to 32) of the next draw, and no more.
    fn next_bits(&mut self, bits: u32) -> u32;

    /// Generates the next 64-bit random number.
    fn next_long(&mut self) -> u64;

    /// Returns an independent deep copy. The copy and the original
    /// continue the same sequence without affecting each other.
    fn copy(&self) -> Box<dyn Source>;
}

/// A generator whose entire state reads and writes as one value or a small
/// tuple of words, suitable for round-tripping through a save file.
pub trait Stateful: Source {
    type State: Copy + PartialEq + core::fmt::Debug;

    /// Returns the full internal state.
    fn state(&self) -> Self::State;

    /// Replaces the full internal state. Degenerate values (an all-zero
    /// state where the transition collapses, an even stream constant) are
    /// silently repaired rather than rejected, so the generator is always
    /// left in a valid, maximal-period state.
    fn set_state(&mut self, state: Self::State);
}

/// A generator whose state transition is linear and therefore supports
/// jumping by an arbitrary signed step count in O(1).
pub trait Skipping: Source {
    /// Jumps forward (if steps > 0) or backward (if steps < 0) and returns
    /// the output at the new position. `skip(0)` returns the most recently
    /// produced output without mutating state. `skip(n)` followed by
    /// `skip(-n)` restores bit-identical state.
    fn skip(&mut self, steps: i64) -> u64;
}

/// A generator whose avalanche is a bijection of the pre-mix state, so a
/// previously produced output maps back to the exact state that produced it.
pub trait Invertible: Skipping {
    /// Returns the state that produces `output` on the next call, i.e.
    /// `g.set_state(inverse(x)); g.next_long() == x` holds for any `x`.
    fn inverse(output: u64) -> u64;

    /// Returns the signed number of steps from the state producing `from`
    /// to the state producing `to` in the same sequence.
    fn distance(from: u64, to: u64) -> i64;
}

/// Top `bits` bits of a 64-bit draw.
#[inline]
pub(crate) fn high_bits_64(x: u64, bits: u32) -> u32 {
    debug_assert!(bits >= 1 && bits <= 32);
    (x >> (64 - bits)) as u32
}

/// Top `bits` bits of a 32-bit draw.
#[inline]
pub(crate) fn high_bits_32(x: u32, bits: u32) -> u32 {
    debug_assert!(bits >= 1 && bits <= 32);
    x >> (32 - bits)
}
