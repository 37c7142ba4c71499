use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use super::light64::Light64;
use super::mix::hash_seed;
use super::source::Source;

// This module contains the derived-operations layer: everything built once
// against the Source contract, independent of which algorithm is plugged in.

/// Derived operations available on every Source. Bounded sampling uses the
/// multiply-high-bits technique rather than naive modulo, which would bias
/// toward small remainders.
pub trait SourceExt: Source {
    /// Returns a uniform integer in [0, bound). Non-positive bounds return
    /// 0 rather than failing; callers of the original surface depend on
    /// this quirk, so it is contract, not accident.
    #[inline]
    fn next_int(&mut self, bound: i32) -> i32 {
        if bound <= 0 {
            return 0;
        }
        // Multiply the bound into the high bits of a 32-bit draw; the top
        // of the 64-bit product is uniform over [0, bound) up to a bias of
        // at most bound / 2**32, far below naive modulo's.
        ((bound as u64 * (self.next_long() & 0xffffffff)) >> 32) as i32
    }

    /// Returns a uniform long in [0, bound). Non-positive bounds return 0.
    #[inline]
    fn next_long_bounded(&mut self, bound: i64) -> i64 {
        if bound <= 0 {
            return 0;
        }
        ((bound as u128 * self.next_long() as u128) >> 64) as i64
    }

    /// Returns a uniform index in [0, bound); 0 when the bound is 0.
    #[inline]
    fn next_index(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        ((bound as u128 * self.next_long() as u128) >> 64) as usize
    }

    /// Returns a uniform double in [0, 1) with 53 random mantissa bits.
    #[inline]
    fn next_double(&mut self) -> f64 {
        (self.next_long() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Returns a uniform double in [min, max); degenerate ranges return min.
    #[inline]
    fn next_double_between(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_double() * (max - min)
    }

    /// Returns a uniform float in [0, 1) with 24 random mantissa bits.
    #[inline]
    fn next_float(&mut self) -> f32 {
        self.next_bits(24) as f32 * (1.0 / (1u32 << 24) as f32)
    }

    /// Returns a uniform float in [min, max); degenerate ranges return min.
    #[inline]
    fn next_float_between(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_float() * (max - min)
    }

    /// Returns a uniform boolean from the sign bit of the next draw.
    #[inline]
    fn next_boolean(&mut self) -> bool {
        (self.next_long() as i64) < 0
    }

    /// Shuffles a sequence in place with Fisher-Yates. Given a uniform
    /// underlying source, each of the n! permutations is equally likely.
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1 .. items.len()).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }

    /// Returns a shuffled copy, leaving the input untouched.
    fn shuffled<T: Clone>(&mut self, items: &[T]) -> Vec<T>
    where Self: Sized {
        let mut copy = items.to_vec();
        self.shuffle(&mut copy);
        copy
    }

    /// Returns a uniformly random permutation of [0, n): Fisher-Yates over
    /// an identity-initialized array. The result is always a bijection.
    fn random_ordering(&mut self, n: usize) -> Vec<usize> {
        let mut ordering: Vec<usize> = (0 .. n).collect();
        self.shuffle(&mut ordering);
        ordering
    }

    /// Picks a uniformly random element of a slice, or None when empty.
    fn random_element<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            items.get(self.next_index(items.len()))
        }
    }

    /// Picks a uniformly random element of any iterable in a single pass,
    /// without needing its size up front: reservoir selection keeps the
    /// i-th element with probability 1/(i+1).
    fn random_element_from<I: IntoIterator>(&mut self, items: I) -> Option<I::Item>
    where Self: Sized {
        let mut chosen = None;
        for (seen, item) in items.into_iter().enumerate() {
            if self.next_index(seen + 1) == 0 {
                chosen = Some(item);
            }
        }
        chosen
    }
}

impl<S: Source + ?Sized> SourceExt for S {}

/// A randomness wrapper with a swappable underlying source. Collaborating
/// subsystems depend on this surface only; the concrete algorithm behind it
/// can be replaced at runtime through `set_source`, never through hidden
/// globals.
pub struct Gen {
    source: Box<dyn Source>,
}

impl Gen {
    /// Wraps the given source.
    pub fn new(source: Box<dyn Source>) -> Self {
        Gen { source }
    }

    /// Creates a Gen backed by the default algorithm (Light64).
    pub fn from_seed(seed: u64) -> Self {
        Gen::new(Box::new(Light64::from_seed(seed)))
    }

    /// Creates a Gen backed by the default algorithm, seeded from a string.
    pub fn from_text(text: &str) -> Self {
        Gen::from_seed(hash_seed(text))
    }

    /// Creates a Gen seeded from platform entropy, for callers with no
    /// seed of their own.
    #[cfg(feature = "getrandom")]
    pub fn from_entropy() -> Self {
        use super::SeedableRng;
        Gen::new(Box::new(Light64::from_entropy()))
    }

    /// Replaces the underlying source in place.
    pub fn set_source(&mut self, source: Box<dyn Source>) {
        self.source = source;
    }

    /// Borrows the underlying source.
    pub fn source_mut(&mut self) -> &mut dyn Source {
        &mut *self.source
    }

    /// Converts this Gen into an explicitly shared handle.
    pub fn into_shared(self) -> SharedGen {
        SharedGen { inner: Rc::new(RefCell::new(self)) }
    }
}

impl Clone for Gen {
    /// Deep copy: the clone owns an independent source.
    fn clone(&self) -> Self {
        Gen { source: self.source.copy() }
    }
}

impl core::fmt::Debug for Gen {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Gen {{}}")
    }
}

impl Source for Gen {
    #[inline]
    fn next_bits(&mut self, bits: u32) -> u32 {
        self.source.next_bits(bits)
    }

    #[inline]
    fn next_long(&mut self) -> u64 {
        self.source.next_long()
    }

    fn copy(&self) -> Box<dyn Source> {
        Box::new(self.clone())
    }
}

use super::{Error, RngCore};

impl RngCore for Gen {
    fn next_u32(&mut self) -> u32 {
        self.next_bits(32)
    }

    fn next_u64(&mut self) -> u64 {
        self.source.next_long()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let bytes = dest.len();
        let mut i = 0;
        while i < bytes {
            let x = self.source.next_long();
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

/// An explicitly shared handle to one Gen. Cloning the handle aliases the
/// same generator, so collaborators holding clones observably perturb each
/// other's sequences; that aliasing is the point (a dice roller sharing
/// state with a broader game RNG, for example). `Source::copy` detaches an
/// independent deep copy instead.
///
/// Sharing is single-threaded; the handle is deliberately not Send or Sync.
#[derive(Clone)]
pub struct SharedGen {
    inner: Rc<RefCell<Gen>>,
}

impl SharedGen {
    /// Wraps a Gen in a fresh shared handle.
    pub fn new(gen: Gen) -> Self {
        gen.into_shared()
    }
}

impl core::fmt::Debug for SharedGen {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "SharedGen {{}}")
    }
}

impl Source for SharedGen {
    #[inline]
    fn next_bits(&mut self, bits: u32) -> u32 {
        self.inner.borrow_mut().next_bits(bits)
    }

    #[inline]
    fn next_long(&mut self) -> u64 {
        self.inner.borrow_mut().next_long()
    }

    /// Detaches an independent deep copy of the shared generator.
    fn copy(&self) -> Box<dyn Source> {
        Box::new(self.inner.borrow().clone().into_shared())
    }
}

#[cfg(test)] mod tests {
    use super::*;
    use super::super::*;
    use alloc::vec::Vec;

    #[test] pub fn bounded_sampling() {

        let mut r: u64 = 0;
        let mut rnd = || -> u64 { r = r.wrapping_mul(MIX_M1).wrapping_add(0xffff); r };

        let mut gen = Gen::from_seed(0x600dcafe);

        // The non-positive-bound quirk holds for every source and seed.
        // Flagged rather than fixed: see the bounded sampling notes.
        let mut sources: Vec<Box<dyn Source>> = Vec::new();
        sources.push(Box::new(Light64::from_seed(rnd())));
        sources.push(Box::new(Stream64::from_seed(rnd())));
        sources.push(Box::new(Xorshift64::from_seed(rnd())));
        sources.push(Box::new(Xoroshiro64::from_seed(rnd())));
        sources.push(Box::new(Xoroshiro128::from_seed(rnd())));
        sources.push(Box::new(Xoshiro128::from_seed(rnd())));
        sources.push(Box::new(Xoshiro256::from_seed(rnd())));
        sources.push(Box::new(Lfsr64::from_seed(rnd())));
        sources.push(Box::new(Isaac64::from_seed(rnd())));
        for source in sources.iter_mut() {
            assert_eq!(0, source.next_int(0));
            assert_eq!(0, source.next_int(-5));
            assert_eq!(0, source.next_long_bounded(0));
            assert_eq!(0, source.next_long_bounded(-5));
            for _ in 0 .. 1000 {
                let bound = (rnd() & 0xfffff) as i32 + 1;
                let x = source.next_int(bound);
                assert!(x >= 0 && x < bound);
                let bound = (rnd() & 0xffffffffffff) as i64 + 1;
                let x = source.next_long_bounded(bound);
                assert!(x >= 0 && x < bound);
            }
        }

        for _ in 0 .. 1000 {
            let f = gen.next_double();
            assert!(f >= 0.0 && f < 1.0);
            let f = gen.next_float();
            assert!(f >= 0.0 && f < 1.0);
            let f = gen.next_double_between(-3.0, 5.0);
            assert!(f >= -3.0 && f < 5.0);
            let f = gen.next_float_between(2.0, 4.0);
            assert!(f >= 2.0 && f < 4.0);
        }

        let mut seen = [false; 2];
        for _ in 0 .. 100 {
            seen[gen.next_boolean() as usize] = true;
        }
        assert!(seen[0] && seen[1]);
    }

    #[test] pub fn unbiased_bounds() {
        // Residues of bound 37 stay within 5% of expectation and the
        // chi-square statistic over 36 degrees of freedom stays far below
        // any plausible rejection threshold.
        let mut gen = Gen::from_seed(123);
        let mut counts = [0u32; 37];
        let draws = 1000000;
        for _ in 0 .. draws {
            counts[gen.next_int(37) as usize] += 1;
        }
        let expected = draws as f64 / 37.0;
        let mut chi2 = 0.0;
        for &count in counts.iter() {
            let delta = count as f64 - expected;
            assert!(delta < expected * 0.05 && -delta < expected * 0.05);
            chi2 += delta * delta / expected;
        }
        assert!(chi2 < 80.0);
    }

    #[test] pub fn shuffling() {

        let mut r: u64 = 0;
        let mut rnd = || -> u64 { r = r.wrapping_mul(MIX_M1).wrapping_add(0xffff); r };

        let mut gen = Gen::from_seed(0x5eed);

        for _ in 0 .. 100 {
            let n = (rnd() & 0x7f) as usize;

            // A shuffle is a permutation: same elements, same length.
            let mut items: Vec<u64> = (0 .. n as u64).map(|i| i * 3).collect();
            let original = items.clone();
            gen.shuffle(&mut items);
            assert_eq!(original.len(), items.len());
            let mut sorted = items.clone();
            sorted.sort();
            assert_eq!(original, sorted);

            // The non-mutating variant leaves the input untouched.
            let copy = gen.shuffled(&original);
            let mut sorted = copy.clone();
            sorted.sort();
            assert_eq!(original, sorted);

            // A random ordering is a bijection over [0, n).
            let mut ordering = gen.random_ordering(n);
            ordering.sort();
            assert_eq!((0 .. n).collect::<Vec<usize>>(), ordering);
        }
    }

    #[test] pub fn element_selection() {
        let mut gen = Gen::from_seed(0xe1e);

        let empty: [u32; 0] = [];
        assert_eq!(None, gen.random_element(&empty));
        assert_eq!(None, gen.random_element_from(empty.iter()));
        assert_eq!(Some(&7), gen.random_element(&[7]));
        assert_eq!(Some(7), gen.random_element_from([7].iter().copied()));

        let items = [10u32, 20, 30, 40, 50];
        let mut counts = [0u32; 5];
        for _ in 0 .. 10000 {
            let x = *gen.random_element(&items).unwrap();
            counts[(x / 10 - 1) as usize] += 1;
        }
        for &count in counts.iter() {
            assert!(count > 1500 && count < 2500);
        }

        // Reservoir selection works without O(1) indexing and is roughly
        // uniform over the same range.
        let mut counts = [0u32; 5];
        for _ in 0 .. 10000 {
            let x = gen.random_element_from(items.iter().copied()).unwrap();
            counts[(x / 10 - 1) as usize] += 1;
        }
        for &count in counts.iter() {
            assert!(count > 1500 && count < 2500);
        }
    }

    #[test] pub fn swappable_source() {
        let mut gen = Gen::from_seed(1);
        let mut light = Light64::from_seed(1);
        for _ in 0 .. 10 {
            assert_eq!(light.next(), gen.next_long());
        }

        gen.set_source(Box::new(Xoroshiro128::from_seed(1)));
        let mut xoro = Xoroshiro128::from_seed(1);
        for _ in 0 .. 10 {
            assert_eq!(xoro.next(), gen.next_long());
        }

        // Clone deep-copies: the clone continues independently.
        let mut copy = gen.clone();
        assert_eq!(copy.next_long(), gen.next_long());
        gen.next_long();
        assert_ne!(copy.next_long(), gen.next_long());
    }

    #[test] pub fn shared_aliasing() {
        // Two collaborators holding clones of one handle draw from the
        // same underlying sequence, interleaved.
        let mut reference = Light64::from_seed(9);
        let mut dice = Gen::from_seed(9).into_shared();
        let mut game = dice.clone();
        for _ in 0 .. 10 {
            assert_eq!(reference.next(), dice.next_long());
            assert_eq!(reference.next(), game.next_long());
        }

        // A detached copy stops aliasing.
        let mut detached = dice.copy();
        assert_eq!(detached.next_long(), game.next_long());
        game.next_long();
        assert_ne!(detached.next_long(), game.next_long());
    }
}
