use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use rijndael_core::{Aes, KeySchedule, Rijndael};

fn bench_key_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_schedule");
    for key_bytes in [16usize, 24, 32] {
        let key = vec![0x2bu8; key_bytes];
        group.bench_with_input(BenchmarkId::from_parameter(key_bytes * 8), &key, |b, key| {
            b.iter(|| KeySchedule::new(key, 16).expect("valid key"));
        });
    }
    group.finish();
}

fn bench_blocks(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
    let mut key = [0u8; 16];
    rng.fill_bytes(&mut key);

    let aes = Aes::new(&key).expect("valid key");
    let wide = Rijndael::with_block_size(&key, 32).expect("valid block size");

    let mut group = c.benchmark_group("block");
    group.bench_function("aes128_encrypt", |b| {
        let mut block = [0u8; 16];
        rng.fill_bytes(&mut block);
        b.iter(|| aes.encrypt(&block).expect("encrypt"));
    });
    group.bench_function("aes128_decrypt", |b| {
        let block = [0x5au8; 16];
        b.iter(|| aes.decrypt(&block).expect("decrypt"));
    });
    group.bench_function("rijndael_256_block_encrypt", |b| {
        let block = [0xa5u8; 32];
        b.iter(|| wide.encrypt(&block).expect("encrypt"));
    });
    group.finish();
}

criterion_group!(benches, bench_key_schedule, bench_blocks);
criterion_main!(benches);
