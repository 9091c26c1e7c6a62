use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dnacodec::{
    arithmetic_decode, arithmetic_encode, build_models, huffman_decode, huffman_encode,
};

fn bench_huffman(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman");
    // Skewed 10k-base input, roughly 40/30/20/10.
    let input: String = (0..10_000)
        .map(|i| match i % 10 {
            0..=3 => 'A',
            4..=6 => 'C',
            7 | 8 => 'G',
            _ => 'T',
        })
        .collect();

    group.bench_function("build_models", |b| b.iter(|| build_models(black_box(input.as_str()))));

    let models = build_models(&input).unwrap();
    group.bench_function("encode", |b| {
        b.iter(|| huffman_encode(black_box(&models.sequence), &models.huffman_codes))
    });

    let bits = huffman_encode(&models.sequence, &models.huffman_codes).unwrap();
    group.bench_function("decode", |b| {
        b.iter(|| huffman_decode(black_box(&bits), &models.huffman_codes))
    });
}

fn bench_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("arithmetic");
    let input = "GATTACACCGTAGGCTAAT";

    let models = build_models(input).unwrap();
    let model = models.arithmetic().unwrap();
    group.bench_function("encode", |b| {
        b.iter(|| arithmetic_encode(black_box(&models.sequence), model))
    });

    let code = arithmetic_encode(&models.sequence, model).unwrap();
    group.bench_function("decode", |b| {
        b.iter(|| arithmetic_decode(black_box(code.value), code.length, model))
    });
}

criterion_group!(benches, bench_huffman, bench_arithmetic);
criterion_main!(benches);
