use criterion::{criterion_group, criterion_main, Criterion};

use rand_mill::*;

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut light = Light64::from_seed(0);
    c.bench_function("Light64::next", move |b| b.iter(|| light.next()));
    let mut stream = Stream64::from_seed(0);
    c.bench_function("Stream64::next", move |b| b.iter(|| stream.next()));
    let mut xorshift = Xorshift64::from_seed(1);
    c.bench_function("Xorshift64::next", move |b| b.iter(|| xorshift.next()));
    let mut xoro = Xoroshiro128::from_seed(0);
    c.bench_function("Xoroshiro128::next", move |b| b.iter(|| xoro.next()));
    let mut xoshiro = Xoshiro256::from_seed(0);
    c.bench_function("Xoshiro256::next", move |b| b.iter(|| xoshiro.next()));
    let mut lfsr = Lfsr64::from_seed(1);
    c.bench_function("Lfsr64::next", move |b| b.iter(|| lfsr.next()));
    let mut isaac = Isaac64::from_seed(0);
    c.bench_function("Isaac64::next", move |b| b.iter(|| isaac.next()));
    let mut gen = Gen::from_seed(0);
    c.bench_function("Gen::next_int", move |b| b.iter(|| gen.next_int(37)));
    c.bench_function("determine", move |b| {
        let mut n = 0;
        b.iter(|| {
            n += 1;
            determine(n)
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
