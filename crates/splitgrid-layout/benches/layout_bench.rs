//! Benchmarks for drag resolution and template rendering.
//!
//! Run with: cargo bench -p splitgrid-layout

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use splitgrid_layout::{
    PaneProvider, Point, SplitterConfig, SplitterInput, TrackValues, Unit, track_values,
};
use std::hint::black_box;

fn columns(n: usize) -> TrackValues {
    track_values((0..n).map(|i| (format!("col{i}"), 1.0 + (i % 3) as f64)))
}

fn provider(n: usize) -> PaneProvider {
    PaneProvider::uncontrolled(1920.0, 1080.0, TrackValues::default(), columns(n))
        .expect("valid provider")
}

fn bench_grid_template(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/grid_template");

    for n in [2, 8, 32, 128] {
        let provider = provider(n);
        group.bench_with_input(BenchmarkId::new("px", n), &provider, |b, provider| {
            b.iter(|| black_box(provider.grid_template_columns(Unit::Px)))
        });
        group.bench_with_input(BenchmarkId::new("fr", n), &provider, |b, provider| {
            b.iter(|| black_box(provider.grid_template_columns(Unit::Fr)))
        });
    }

    group.finish();
}

fn bench_drag_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/drag_stream");

    for n in [2, 16, 128] {
        group.bench_function(BenchmarkId::new("moves_64", n), |b| {
            b.iter_batched(
                || {
                    let provider = provider(n);
                    let key = format!("col{}", n / 2 - 1);
                    let drag = provider
                        .activate(&SplitterConfig::new(key, 0.0, 1_000.0))
                        .expect("valid splitter");
                    (provider, drag)
                },
                |(mut provider, mut drag)| {
                    provider
                        .dispatch(&mut drag, &SplitterInput::pointer_down(1, Point::new(960.0, 0.0)))
                        .expect("press");
                    for step in 0..64_u32 {
                        let x = 960.0 + f64::from(step % 16) * 7.5 - 60.0;
                        black_box(
                            provider
                                .dispatch(&mut drag, &SplitterInput::pointer_move(1, Point::new(x, 0.0)))
                                .expect("move"),
                        );
                    }
                    provider
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grid_template, bench_drag_stream);
criterion_main!(benches);
