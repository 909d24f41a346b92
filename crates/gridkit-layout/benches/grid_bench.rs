//! Solver benchmark: re-solving a configured grid after dirtying.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use gridkit_core::{Margin, Rect, WidgetId};
use gridkit_layout::{Align, Grid};

fn build_grid(rows: usize, cols: usize) -> Grid {
    let mut grid = Grid::new(Rect::new(0, 0, 1920, 1080));
    grid.layout(rows, cols);
    grid.set_margin(Margin::uniform(8));
    grid.set_gap(4, 4);
    for r in 0..rows {
        if r % 3 == 0 {
            grid.set_row_height(r, 24);
        }
        grid.set_row_weight(r, (r as i32 % 5) * 20 + 10);
    }
    for c in 0..cols {
        grid.set_col_weight(c, (c as i32 % 4) * 25 + 10);
    }
    let mut id = 0;
    for r in 0..rows {
        for c in (0..cols).step_by(2) {
            let w = WidgetId(id);
            id += 1;
            grid.add_child(w);
            grid.widget(w, r, c, 1, 1, Align::FILL);
        }
    }
    grid
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_solve");
    for &(rows, cols) in &[(4usize, 4usize), (16, 16), (64, 64)] {
        let mut grid = build_grid(rows, cols);
        group.bench_function(format!("{rows}x{cols}"), |b| {
            b.iter(|| {
                grid.need_layout();
                grid.perform_layout();
                black_box(grid.computed_row_height(rows - 1))
            });
        });
    }
    group.finish();
}

fn bench_child_layout(c: &mut Criterion) {
    let mut grid = build_grid(16, 16);
    c.bench_function("child_layout_16x16", |b| {
        b.iter(|| {
            grid.need_layout();
            black_box(grid.child_layout())
        });
    });
}

criterion_group!(benches, bench_solve, bench_child_layout);
criterion_main!(benches);
