use wrapping_arithmetic::wrappit;

// This module contains the shared avalanche steps, their algebraic inverses,
// and the stateless determine functions built directly on them.

/// SplitMix64 three-round avalanche. Bijective on u64, so feeding it every
/// 64-bit value once produces every 64-bit output once.
#[wrappit] #[inline]
pub fn mix(x: u64) -> u64 {
    let x = (x ^ (x >> 30)) * super::MIX_M1;
    let x = (x ^ (x >> 27)) * super::MIX_M2;
    x ^ (x >> 31)
}

/// Exact inverse of `mix`.
///
/// Each round of the avalanche is reversible on its own: a multiply by an
/// odd constant is undone by its inverse mod 2**64, and `x ^ (x >> n)` is
/// undone by reapplying the xor-shift with doubled shifts until the shift
/// leaves the word. Undoing the rounds in reverse order undoes the whole.
#[wrappit] #[inline]
pub fn unmix(x: u64) -> u64 {
    let x = x ^ (x >> 31) ^ (x >> 62);
    let x = x * super::MIX_M2_INVERSE;
    let x = x ^ (x >> 27) ^ (x >> 54);
    let x = x * super::MIX_M1_INVERSE;
    x ^ (x >> 30) ^ (x >> 60)
}

/// Returns the inverse of an odd `a` mod 2**64 by Newton iteration.
/// Each iteration doubles the number of correct low bits; five suffice
/// starting from `a` itself, which is correct to 3 bits.
#[wrappit]
pub fn mul_inverse(a: u64) -> u64 {
    debug_assert!(a & 1 == 1);
    let mut x = a;
    for _ in 0..5 {
        x = x * (2u64 - a * x);
    }
    x
}

/// Stateless determine function: hashes a position to a 64-bit output.
/// The same position always yields the same output. Callers vary the
/// position themselves, typically by incrementing with an odd constant,
/// to obtain a non-repeating stream.
#[inline]
pub fn determine(position: u64) -> u64 {
    mix(position)
}

/// Stateless bounded determine function. Non-positive bounds return 0,
/// matching the bounded sampling quirk of the stateful layer.
#[inline]
pub fn determine_bounded(position: u64, bound: i32) -> i32 {
    if bound <= 0 {
        return 0;
    }
    ((bound as u64 * (mix(position) & 0xffffffff)) >> 32) as i32
}

/// Stateless determine function producing a double in [0, 1).
#[inline]
pub fn determine_double(position: u64) -> f64 {
    (mix(position) >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Hashes a UTF-8 string to a 64-bit seed. Platform-independent: the hash
/// walks the raw bytes with FNV-1a and finishes with the avalanche, so the
/// same text seeds the same sequence everywhere.
#[wrappit]
pub fn hash_seed(text: &str) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for byte in text.bytes() {
        h = (h ^ byte as u64) * 0x100000001b3;
    }
    mix(h)
}
