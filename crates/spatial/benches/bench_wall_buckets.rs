use std::hint::black_box;
use std::time::Instant;

use dungeon_common::{GRID_CELL_SIZE, Rect, WALL_BUCKET_SIZE};
use dungeon_spatial::{PathGrid, WallBuckets};
use glam::Vec2;

/// Walls on every tile border of a square room plus a sparse interior lattice.
fn make_walls(side: f32) -> Vec<Rect> {
    let tiles = (side / GRID_CELL_SIZE) as usize;
    let mut walls = Vec::new();
    for x in 0..tiles {
        for y in 0..tiles {
            let border = x == 0 || y == 0 || x == tiles - 1 || y == tiles - 1;
            if border || (x % 7 == 3 && y % 5 == 2) {
                walls.push(Rect::new(
                    x as f32 * GRID_CELL_SIZE,
                    y as f32 * GRID_CELL_SIZE,
                    GRID_CELL_SIZE,
                    GRID_CELL_SIZE,
                ));
            }
        }
    }
    walls
}

fn sample_points(side: f32, count: usize) -> Vec<Vec2> {
    (0..count)
        .map(|i| {
            let t = i as f32 / count as f32;
            Vec2::new(t * side, (t * 7.0).fract() * side)
        })
        .collect()
}

fn bench_build(side: f32, iterations: usize) {
    let walls = make_walls(side);
    let world = Vec2::splat(side);
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(WallBuckets::build(
            world,
            WALL_BUCKET_SIZE,
            walls.iter().map(|w| w.position()),
        ));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  build ({} walls, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        walls.len()
    );
}

fn bench_neighborhood(side: f32, iterations: usize) {
    let walls = make_walls(side);
    let buckets = WallBuckets::build(
        Vec2::splat(side),
        WALL_BUCKET_SIZE,
        walls.iter().map(|w| w.position()),
    );
    let points = sample_points(side, 256);
    let footprint = Vec2::splat(30.0);

    let start = Instant::now();
    let mut hits = 0usize;
    for _ in 0..iterations {
        for &p in &points {
            let area = Rect::from_pos_size(p, footprint);
            hits += buckets
                .walls_near(black_box(p))
                .into_iter()
                .filter(|&i| walls[i].intersects(&area))
                .count();
        }
    }
    let bucketed = start.elapsed();

    let start = Instant::now();
    let mut brute_hits = 0usize;
    for _ in 0..iterations {
        for &p in &points {
            let area = Rect::from_pos_size(black_box(p), footprint);
            brute_hits += walls.iter().filter(|w| w.intersects(&area)).count();
        }
    }
    let brute = start.elapsed();

    println!(
        "  3x3 query ({} walls, {} points x {iterations}): bucketed {:?}, brute force {:?}, hits {hits}/{brute_hits}",
        walls.len(),
        points.len(),
        bucketed,
        brute
    );
}

fn bench_view_cull(side: f32, iterations: usize) {
    let walls = make_walls(side);
    let buckets = WallBuckets::build(
        Vec2::splat(side),
        WALL_BUCKET_SIZE,
        walls.iter().map(|w| w.position()),
    );
    let view = Rect::new(side / 3.0, side / 3.0, 800.0, 600.0);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(buckets.walls_in_rect(black_box(&view)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  view cull ({} walls, {iterations} iters): {per_iter:?}/iter", walls.len());
}

fn bench_path_grid(side: f32, iterations: usize) {
    let walls = make_walls(side);
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(PathGrid::build(
            Vec2::splat(side),
            GRID_CELL_SIZE,
            walls.iter().map(|w| w.position()),
        ));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  path grid build ({} walls): {per_iter:?}/iter", walls.len());
}

fn main() {
    println!("=== Wall Bucket Benchmarks ===\n");

    println!("Build:");
    bench_build(1000.0, 1000);
    bench_build(4000.0, 100);

    println!("\nNeighborhood query vs brute force:");
    bench_neighborhood(1000.0, 100);
    bench_neighborhood(4000.0, 20);

    println!("\nCamera culling:");
    bench_view_cull(4000.0, 10000);

    println!("\nPath grid:");
    bench_path_grid(4000.0, 100);

    println!("\n=== Done ===");
}
