//! Benchmark batch conversion throughput and spreadsheet export
//!
//! Run with: cargo bench --bench batch_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use rand::SeedableRng;
use tempfile::TempDir;

use uniconv::converters::batch::{convert_lines, export_rows, ExportFormat, ExportTarget};
use uniconv::converters::datetime::{to_datetime, to_timestamp};
use uniconv::converters::number::hex_to_dec;

/// Newline separated hex values, roughly one in twenty invalid
fn generate_hex_lines(n_lines: usize, seed: u64) -> String {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..n_lines)
        .map(|_| {
            if rng.gen::<f64>() < 0.05 {
                "not-hex".to_string()
            } else {
                format!("0x{:x}", rng.gen::<u64>())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Newline separated Unix timestamps with fractional seconds
fn generate_timestamp_lines(n_lines: usize, seed: u64) -> String {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..n_lines)
        .map(|_| format!("{:.3}", rng.gen_range(0.0..2_000_000_000.0)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn benchmark_batch_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_conversion");

    for n_lines in [1_000, 10_000, 100_000] {
        let hex = generate_hex_lines(n_lines, 42);
        let timestamps = generate_timestamp_lines(n_lines, 42);
        group.throughput(Throughput::Elements(n_lines as u64));

        group.bench_with_input(BenchmarkId::new("hex2dec", n_lines), &hex, |b, text| {
            b.iter(|| convert_lines(black_box(text), hex_to_dec));
        });

        group.bench_with_input(
            BenchmarkId::new("to_dt", n_lines),
            &timestamps,
            |b, text| {
                b.iter(|| convert_lines(black_box(text), to_datetime));
            },
        );
    }

    group.finish();
}

/// Round trip through both datetime directions on one batch
fn benchmark_datetime_round_trip(c: &mut Criterion) {
    let timestamps = generate_timestamp_lines(10_000, 7);
    let datetimes: String = convert_lines(&timestamps, to_datetime)
        .into_iter()
        .filter_map(|row| row.output.ok())
        .collect::<Vec<_>>()
        .join("\n");

    c.bench_function("to_ts_10000", |b| {
        b.iter(|| convert_lines(black_box(&datetimes), to_timestamp));
    });
}

fn benchmark_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    group.sample_size(20);

    let rows = convert_lines(&generate_hex_lines(50_000, 42), hex_to_dec);
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    for extension in ["csv", "parquet"] {
        let path = temp_dir.path().join(format!("rows.{}", extension));
        let target = ExportTarget {
            format: ExportFormat::from_path(&path).expect("Unsupported export format"),
            path,
        };
        group.bench_with_input(BenchmarkId::new("rows_50000", extension), &target, |b, target| {
            b.iter(|| export_rows(black_box(&rows), black_box(target)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_batch_conversion,
    benchmark_datetime_round_trip,
    benchmark_export
);
criterion_main!(benches);
