use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pathgrid::{solve, Algorithm, CellState, Grid, Point};

/// Square grid of side `size` with alternating wall columns that force a serpentine detour
fn create_maze(size: usize) -> Grid {
    let mut grid = Grid::empty(size).unwrap();
    for x in (2..size - 1).step_by(4) {
        for y in 0..size - 1 {
            grid.set_cell(Point::new(x, y), CellState::Wall).unwrap();
        }
    }
    for x in (4..size - 1).step_by(4) {
        for y in 1..size {
            grid.set_cell(Point::new(x, y), CellState::Wall).unwrap();
        }
    }
    grid
}

fn bench_algorithm(c: &mut Criterion, algorithm: Algorithm, size: usize) {
    let grid = create_maze(size);

    c.bench_function(&format!("{}_{}", algorithm.name(), size), |b| {
        b.iter(|| {
            let outcome = solve(black_box(&grid), black_box(algorithm));
            assert!(outcome.path.is_some());
        })
    });
}

pub fn maze_reference(c: &mut Criterion) {
    for algorithm in Algorithm::ALL {
        bench_algorithm(c, algorithm, 40);
    }
}

pub fn maze_large(c: &mut Criterion) {
    for algorithm in Algorithm::ALL {
        bench_algorithm(c, algorithm, 160);
    }
}

criterion_group!(benches, maze_reference, maze_large);
criterion_main!(benches);
