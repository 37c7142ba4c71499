#![no_std]

extern crate alloc;

pub mod gen;
pub mod isaac64;
pub mod lfsr64;
pub mod light64;
pub mod mix;
pub mod source;
pub mod stream64;
pub mod xoroshiro128;
pub mod xoroshiro64;
pub mod xorshift64;
pub mod xoshiro128;
pub mod xoshiro256;

pub use gen::*;
pub use isaac64::*;
pub use lfsr64::*;
pub use light64::*;
pub use mix::*;
pub use rand_core::*;
pub use source::*;
pub use stream64::*;
pub use xoroshiro128::*;
pub use xoroshiro64::*;
pub use xorshift64::*;
pub use xoshiro128::*;
pub use xoshiro256::*;

// Increment and avalanche multipliers from Vigna, S., SplitMix64 (2015).
// The increment is 2**64 divided by the golden ratio, rounded to odd.

pub const GOLDEN_GAMMA: u64 = 0x9e3779b97f4a7c15;
pub const MIX_M1: u64 = 0xbf58476d1ce4e5b9;
pub const MIX_M2: u64 = 0x94d049bb133111eb;

// Inverses of the above, mod 2**64. Every odd multiplier has exactly one.

pub const GOLDEN_GAMMA_INVERSE: u64 = 0xf1de83e19937733d;
pub const MIX_M1_INVERSE: u64 = 0x96de1b173f119089;
pub const MIX_M2_INVERSE: u64 = 0x319642b2d24d8ec3;

// Taps of the maximal-length degree-64 polynomial x^64 + x^63 + x^61 + x^60 + 1
// for the Galois shift register.

pub const LFSR_TAPS: u64 = 0xd800000000000000;

// Finalizing multiplier from Vigna's xorshift64* generator.

pub const XORSHIFT_MULTIPLIER: u64 = 0x2545f4914f6cdd1d;
