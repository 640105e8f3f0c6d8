use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fse::{FseDecoder, FseEncoder};

fn skewed_input(len: usize) -> Vec<u8> {
    // Roughly geometric: each symbol half as likely as the one before.
    let mut seed = 0x9E37_79B9u32;
    (0..len)
        .map(|_| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            (seed.trailing_zeros() as u8).min(15)
        })
        .collect()
}

fn text_input(len: usize) -> Vec<u8> {
    b"It was the best of times, it was the worst of times, it was the age of wisdom. "
        .iter()
        .cycle()
        .take(len)
        .copied()
        .collect()
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("fse_compress");
    let encoder = FseEncoder::default();
    for (name, input) in [
        ("skewed", skewed_input(64 * 1024)),
        ("text", text_input(64 * 1024)),
    ] {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, input| {
            b.iter(|| encoder.compress(black_box(input)).unwrap())
        });
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("fse_decompress");
    let encoder = FseEncoder::default();
    let decoder = FseDecoder::new();
    for (name, input) in [
        ("skewed", skewed_input(64 * 1024)),
        ("text", text_input(64 * 1024)),
    ] {
        let packed = encoder.compress(&input).unwrap();
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &packed, |b, packed| {
            b.iter(|| decoder.decompress(black_box(packed)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress);
criterion_main!(benches);
