//! Ingestion and export performance benchmarks.
//!
//! Measures parsing across file sizes and formats, and writing back out.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use orderlens::input::Parser;
use orderlens::{ExportFormat, export, ingest};
use std::io::Write;
use tempfile::NamedTempFile;

/// Generate synthetic delivery orders with the given number of rows.
fn generate_orders_csv(rows: usize) -> String {
    let sizes = ["Small", "Medium", "Large"];
    let types = ["Margherita", "Pepperoni", "Veggie", "Hawaiian"];
    let traffic = ["Low", "Medium", "High"];

    let mut data = String::from(
        "order_id,order_time,pizza_size,pizza_type,traffic_level,order_hour,estimated_duration,is_delayed\n",
    );
    for row in 0..rows {
        data.push_str(&format!(
            "ORD{:06},2024-{:02}-{:02} {:02}:15:00,{},{},{},{},{:.1},{}\n",
            row,
            (row % 12) + 1,
            (row % 28) + 1,
            11 + row % 12,
            sizes[row % sizes.len()],
            types[row % types.len()],
            traffic[row % traffic.len()],
            11 + row % 12,
            15.0 + (row % 40) as f64 * 0.75,
            row % 4 == 0
        ));
    }
    data
}

/// Benchmark parsing CSV files of various sizes from disk.
fn bench_parse_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_csv");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_orders_csv(*rows);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter_with_setup(
                || {
                    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
                    temp.write_all(data.as_bytes()).unwrap();
                    temp
                },
                |temp| {
                    let parser = Parser::new();
                    black_box(parser.parse_file(temp.path()).unwrap())
                },
            )
        });
    }

    group.finish();
}

/// Benchmark ingesting the same table from each binary and text format.
fn bench_ingest_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest_formats");
    let table = ingest(generate_orders_csv(5_000).as_bytes(), "csv").unwrap();

    for format in [
        ExportFormat::Csv,
        ExportFormat::Json,
        ExportFormat::NdJson,
        ExportFormat::Parquet,
        ExportFormat::Xlsx,
    ] {
        let bytes = export(&table, format).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("format", format.extension()),
            &bytes,
            |b, bytes| b.iter(|| black_box(ingest(bytes, format.extension()).unwrap())),
        );
    }

    group.finish();
}

/// Benchmark exporting a table to each format.
fn bench_export_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_formats");
    let table = ingest(generate_orders_csv(5_000).as_bytes(), "csv").unwrap();

    for format in [
        ExportFormat::Csv,
        ExportFormat::Json,
        ExportFormat::Parquet,
        ExportFormat::Xlsx,
    ] {
        group.bench_function(format.extension(), |b| {
            b.iter(|| black_box(export(&table, format).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_csv,
    bench_ingest_formats,
    bench_export_formats,
);
criterion_main!(benches);
