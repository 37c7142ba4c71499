use alloc::boxed::Box;
use wrapping_arithmetic::wrappit;

use super::mix::{hash_seed, mix};
use super::source::{high_bits_64, Source};

// Isaac64 features
// -cryptographic-derived design by Bob Jenkins (ISAAC-64, 1996)
// -256-word internal table refreshed in one batch pass per 256 outputs
// -state also carries an accumulator, a running sum and a monotonic counter
// -seeded from up to 256 raw words; shorter seeds are padded by continued
//  hashing
//
// Unlike the rest of the crate this family was designed with adversarial
// prediction in mind, although this implementation makes no security claims
// and is exposed through the same Source contract as everything else.

const WORDS: usize = 256;

/// Initial value for the eight mixing registers: the golden ratio as used
/// by Jenkins' reference randinit.
const INIT: u64 = 0x9e3779b97f4a7c13;

/// ISAAC-64 RNG. 64-bit output, 256-word table plus accumulator, sum and
/// counter. Output is consumed from a results table one word at a time and
/// the whole table is regenerated when exhausted, so a single call is O(1)
/// amortized and O(256) worst case.
#[derive(Clone, Eq, PartialEq)]
pub struct Isaac64 {
    mem: [u64; WORDS],
    results: [u64; WORDS],
    a: u64,
    b: u64,
    c: u64,
    /// Number of words already consumed from `results`; WORDS means
    /// exhausted.
    used: usize,
}

// As recommended, this Debug implementation does not expose internal state.
impl core::fmt::Debug for Isaac64 {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Isaac64 {{}}")
    }
}

/// One round of Jenkins' eight-register seeding mix.
#[wrappit]
fn mix8(v: &mut [u64; 8]) {
    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *v;
    a = a - e; f = f ^ (h >> 9);  h = h + a;
    b = b - f; g = g ^ (a << 9);  a = a + b;
    c = c - g; h = h ^ (b >> 23); b = b + c;
    d = d - h; a = a ^ (c << 15); c = c + d;
    e = e - a; b = b ^ (d >> 14); d = d + e;
    f = f - b; c = c ^ (e << 20); e = e + f;
    g = g - c; d = d ^ (f >> 17); f = f + g;
    h = h - d; e = e ^ (g << 14); g = g + h;
    *v = [a, b, c, d, e, f, g, h];
}

impl Isaac64 {

    /// Creates a new Isaac64 RNG from a zero key.
    pub fn new() -> Self {
        Self::from_key(&[0u64; WORDS])
    }

    /// Creates a new Isaac64 RNG from a 64-bit seed.
    pub fn from_seed(seed: u64) -> Self {
        Self::from_words(&[seed])
    }

    /// Creates a new Isaac64 RNG from a string seed.
    pub fn from_text(text: &str) -> Self {
        Self::from_words(&[hash_seed(text)])
    }

    /// Creates a new Isaac64 RNG from up to 256 raw words. Words beyond
    /// the 256th are ignored; missing words are padded by continued
    /// hashing of the last word present, so short seeds still spread over
    /// the whole key.
    #[wrappit]
    pub fn from_words(seed: &[u64]) -> Self {
        let mut key = [0u64; WORDS];
        let n = seed.len().min(WORDS);
        key[0 .. n].copy_from_slice(&seed[0 .. n]);
        if n > 0 {
            for i in n .. WORDS {
                key[i] = mix(key[i - 1] + super::GOLDEN_GAMMA);
            }
        }
        Self::from_key(&key)
    }

    /// Jenkins' randinit: mix the golden-ratio registers, fold in the key,
    /// then fold in the table itself for a second pass.
    #[wrappit]
    fn from_key(key: &[u64; WORDS]) -> Self {
        let mut rng = Isaac64 {
            mem: [0; WORDS],
            results: [0; WORDS],
            a: 0,
            b: 0,
            c: 0,
            used: WORDS,
        };
        let mut v = [INIT; 8];
        for _ in 0 .. 4 {
            mix8(&mut v);
        }
        for i in (0 .. WORDS).step_by(8) {
            for j in 0 .. 8 {
                v[j] = v[j] + key[i + j];
            }
            mix8(&mut v);
            rng.mem[i .. i + 8].copy_from_slice(&v);
        }
        for i in (0 .. WORDS).step_by(8) {
            for j in 0 .. 8 {
                v[j] = v[j] + rng.mem[i + j];
            }
            mix8(&mut v);
            rng.mem[i .. i + 8].copy_from_slice(&v);
        }
        rng.regen();
        rng
    }

    /// Refreshes the whole results table: one pass of the ISAAC-64 mixing
    /// step over every table word, cycling the accumulator shifts with a
    /// period of four. Wrapping ops are spelled out here; the macro does
    /// not accept the indexing casts in this body.
    fn regen(&mut self) {
        self.c = self.c.wrapping_add(1);
        self.b = self.b.wrapping_add(self.c);
        for i in 0 .. WORDS {
            let x = self.mem[i];
            self.a = match i & 3 {
                0 => !(self.a ^ (self.a << 21)),
                1 => self.a ^ (self.a >> 5),
                2 => self.a ^ (self.a << 12),
                _ => self.a ^ (self.a >> 33),
            };
            self.a = self.a.wrapping_add(self.mem[(i + WORDS / 2) & (WORDS - 1)]);
            let y = self.mem[((x >> 3) & (WORDS as u64 - 1)) as usize]
                .wrapping_add(self.a)
                .wrapping_add(self.b);
            self.mem[i] = y;
            self.b = self.mem[((y >> 11) & (WORDS as u64 - 1)) as usize].wrapping_add(x);
            self.results[i] = self.b;
        }
        self.used = 0;
    }

    /// Generates the next 64-bit random number. The results table is
    /// consumed from the top down, matching the order of Jenkins'
    /// reference rand().
    #[inline]
    pub fn next(&mut self) -> u64 {
        if self.used == WORDS {
            self.regen();
        }
        let x = self.results[WORDS - 1 - self.used];
        self.used += 1;
        x
    }
}

impl Source for Isaac64 {
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

use super::{Error, RngCore, SeedableRng};

impl RngCore for Isaac64 {
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

impl SeedableRng for Isaac64 {
    type Seed = [u8; 32];

    fn from_seed(seed: Self::Seed) -> Self {
        use core::convert::TryInto;
        // Always use Little-Endian.
        let mut words = [0u64; 4];
        for i in 0 .. 4 {
            words[i] = u64::from_le_bytes(seed[(i << 3) .. ((i + 1) << 3)].try_into().unwrap());
        }
        Isaac64::from_words(&words)
    }
}

#[cfg(test)] mod tests {
    use super::*;
    use super::super::*;

    #[test] pub fn run_tests() {

        // First outputs of the zero-key reference sequence, as published
        // with Jenkins' isaac64.c.
        let mut reference = Isaac64::new();
        assert_eq!(0x9d39247e33776d41, reference.next());
        assert_eq!(0x2af7398005aaa5c7, reference.next());
        assert_eq!(0x44db015024623547, reference.next());
        assert_eq!(0x9c15f73e62a76ae2, reference.next());

        // The sequence stays in published order across the batch boundary.
        for _ in 4 .. 255 {
            reference.next();
        }
        assert_eq!(0x48cbff086ddf285a, reference.next());
        assert_eq!(0x7f9b6af1ebf78baf, reference.next());
        assert_eq!(0x58627e1a149bba21, reference.next());

        // Short seeds pad deterministically and diverge from each other.
        let mut a = Isaac64::from_words(&[1, 2, 3]);
        let mut b = Isaac64::from_words(&[1, 2, 3]);
        let mut c = Isaac64::from_words(&[1, 2, 4]);
        let mut same = true;
        for _ in 0 .. 100 {
            let x = a.next();
            assert_eq!(x, b.next());
            same &= x == c.next();
        }
        assert!(!same);

        // Copies stay independent across a regen boundary.
        let mut d = Isaac64::from_seed(0xabcd);
        for _ in 0 .. 250 {
            d.next();
        }
        let mut e = d.clone();
        for _ in 0 .. 20 {
            assert_eq!(d.next(), e.next());
        }
        d.next();
        // d is now one draw ahead of e; the sequences no longer line up.
        assert_ne!(d.next(), e.next());
    }

    #[test] pub fn determinism() {
        // 10000 draws cross many regen batch boundaries.
        let mut a = Isaac64::from_seed(0x15aac);
        let mut b = Isaac64::from_seed(0x15aac);
        for _ in 0 .. 10000 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test] pub fn string_and_text_seeding() {
        let mut a = Isaac64::from_text("the quick brown fox");
        let mut b = Isaac64::from_text("the quick brown fox");
        let mut c = Isaac64::from_text("the quick brown vox");
        let mut same = true;
        for _ in 0 .. 100 {
            let x = a.next();
            assert_eq!(x, b.next());
            same &= x == c.next();
        }
        assert!(!same);
    }
}
