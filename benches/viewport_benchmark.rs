//! Viewport query benchmarks on a million-line document.
//!
//! Custom line heights every 50 lines and a whitespace zone every 1000 lines.
//! Viewport queries should stay logarithmic in document size.
//!
//! Run with: cargo bench --bench viewport_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lines_layout::layout::{DecorationId, LinesLayout, Pixels};

const LINE_HEIGHT: Pixels = 19;

/// Build a layout with periodic overrides and whitespace zones.
fn generate_layout(line_count: u32) -> LinesLayout {
    let mut layout = LinesLayout::new(line_count, LINE_HEIGHT, 0, 0, &[]);
    layout.change_line_heights(|accessor| {
        for line in (1..=line_count).step_by(50) {
            let id = DecorationId::new(format!("heading-{line}")).expect("valid id");
            accessor.insert_or_change_custom_line_height(&id, line, line, 2 * LINE_HEIGHT);
        }
    });
    layout.change_whitespace(|accessor| {
        for line in (0..line_count).step_by(1000) {
            accessor.insert_whitespace(line, 0, 120, 0);
        }
    });
    // Prime every cache.
    let _ = layout.lines_total_height();
    layout
}

/// Viewport queries at different scroll positions in a 1M line document.
fn benchmark_viewport_positions(c: &mut Criterion) {
    let mut layout = generate_layout(1_000_000);
    let total_height = layout.lines_total_height();
    let viewport_height = 60 * LINE_HEIGHT;

    let mut group = c.benchmark_group("viewport_positions_1m");
    let positions = [
        ("start", 0),
        ("quarter", total_height / 4),
        ("middle", total_height / 2),
        ("three_quarters", total_height * 3 / 4),
        ("end", total_height - viewport_height),
    ];

    for (name, top) in positions {
        group.bench_function(BenchmarkId::new("lines", name), |b| {
            b.iter(|| layout.lines_viewport_data(black_box(top), black_box(top + viewport_height)));
        });
        group.bench_function(BenchmarkId::new("whitespaces", name), |b| {
            b.iter(|| layout.whitespace_viewport_data(black_box(top), black_box(top + viewport_height)));
        });
    }

    group.finish();
}

/// Line lookup by offset at growing document sizes.
fn benchmark_line_at_offset_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_at_offset_scaling");

    for line_count in [10_000, 100_000, 1_000_000] {
        let mut layout = generate_layout(line_count);
        let total_height = layout.lines_total_height();
        group.bench_function(BenchmarkId::new("line_at_offset", line_count), |b| {
            b.iter(|| {
                for offset in [0, total_height / 3, total_height / 2, total_height - 1] {
                    black_box(layout.line_number_at_or_after_vertical_offset(black_box(offset)));
                }
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(std::time::Duration::from_secs(10));
    targets = benchmark_viewport_positions, benchmark_line_at_offset_scaling
}

criterion_main!(benches);
