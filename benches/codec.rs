//! Codec benchmarks: object encode/decode and the raw LZW layer.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lynon::bitio::{BitInput, BitOutput};
use lynon::{lzw, LynonDecoder, LynonEncoder, LynonValue};

// ============================================================================
// Test data generation
// ============================================================================

/// A document-shaped value graph with repeated sub-values so the cache path
/// is exercised.
fn sample_document(records: usize) -> LynonValue {
    let status_ok = LynonValue::String("status: healthy".into());
    let status_bad = LynonValue::String("status: degraded".into());
    let rows = (0..records)
        .map(|i| {
            LynonValue::Map(vec![
                (LynonValue::String("id".into()), LynonValue::Int(i as i64)),
                (
                    LynonValue::String("status".into()),
                    if i % 7 == 0 {
                        status_bad.clone()
                    } else {
                        status_ok.clone()
                    },
                ),
                (
                    LynonValue::String("score".into()),
                    LynonValue::Real(i as f64 * 0.125),
                ),
            ])
        })
        .collect();
    LynonValue::List(rows)
}

fn repetitive_bytes(len: usize) -> Vec<u8> {
    b"the quick brown fox jumps over the lazy dog. "
        .iter()
        .cycle()
        .take(len)
        .copied()
        .collect()
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_encode(c: &mut Criterion) {
    let doc = sample_document(1000);
    c.bench_function("encode_document_1000", |b| {
        b.iter(|| {
            let mut enc = LynonEncoder::new();
            enc.encode_any(black_box(&doc)).unwrap();
            enc.into_bytes()
        })
    });
}

fn bench_decode(c: &mut Criterion) {
    let doc = sample_document(1000);
    let mut enc = LynonEncoder::new();
    enc.encode_any(&doc).unwrap();
    let (bytes, len) = enc.into_bytes();

    c.bench_function("decode_document_1000", |b| {
        b.iter(|| {
            let mut dec = LynonDecoder::with_bit_len(black_box(&bytes), len);
            dec.decode_any().unwrap()
        })
    });
}

fn bench_lzw(c: &mut Criterion) {
    let bytes = repetitive_bytes(64 * 1024);
    let mut group = c.benchmark_group("lzw");
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("compress_64k", |b| {
        b.iter(|| {
            let mut out = BitOutput::new();
            lzw::compress(black_box(&bytes), &mut out);
            out.into_bytes()
        })
    });

    let mut out = BitOutput::new();
    lzw::compress(&bytes, &mut out);
    let (data, bit_len) = out.into_bytes();
    group.bench_function("decompress_64k", |b| {
        b.iter(|| {
            let mut input = BitInput::with_bit_len(black_box(&data), bit_len);
            lzw::decompress(&mut input, bytes.len()).unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_lzw);
criterion_main!(benches);
