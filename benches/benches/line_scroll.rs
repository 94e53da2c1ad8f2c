// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_line_scroll`.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use understory_line_scroll::{LineScroll, index_for_offset};

fn line_scroll(viewport: f64) -> LineScroll<Vec<u8>, f64> {
    let mut line = LineScroll::new(50.0, viewport).unwrap();
    line.register_cell_class(|| Vec::with_capacity(64));
    line.reload_cells().unwrap();
    line
}

fn bench_scroll_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_scroll/scroll");

    // Hypothesis: per-tick cost depends on the indices crossing the window
    // edges, not on the viewport size or how far the strip extends.
    for viewport in [320.0_f64, 3_200.0, 32_000.0] {
        group.bench_with_input(
            BenchmarkId::new("sub_cell_ticks", viewport),
            &viewport,
            |b, &viewport| {
                b.iter_batched(
                    || line_scroll(viewport),
                    |mut line| {
                        for tick in 0..1_000 {
                            line.set_scroll_offset(f64::from(tick) * 7.5).unwrap();
                        }
                        black_box(line);
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.bench_function("reload_320", |b| {
        let mut line = line_scroll(320.0);
        b.iter(|| line.reload_cells().unwrap());
    });

    group.bench_function("jump_far", |b| {
        let mut line = line_scroll(320.0);
        let mut target = 0_isize;
        b.iter(|| {
            target = (target + 1_000_003) % 1_000_000_000;
            black_box(line.set_current_index(target).unwrap());
        });
    });

    group.finish();
}

fn bench_geometry(c: &mut Criterion) {
    c.bench_function("line_scroll/index_for_offset", |b| {
        let mut offset = -1_000.0_f64;
        b.iter(|| {
            offset += 0.37;
            black_box(index_for_offset(black_box(offset), 50.0).unwrap())
        });
    });
}

criterion_group!(benches, bench_scroll_ticks, bench_geometry);
criterion_main!(benches);
