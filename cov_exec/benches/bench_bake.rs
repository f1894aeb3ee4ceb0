//! # Bake Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use cov_lib::{
    coverage::CoverageDecomposer,
    geom::{Point, Rect, Wall},
    graph::CoverageGraph,
    grid::OccupancyGrid,
    path::{BackPathMode, PathBuilder},
};

fn bake_benchmark(c: &mut Criterion) {
    // ---- Build the open room ----

    let walls = vec![
        Wall::new(Point::new(0, 0), Point::new(400, 0)),
        Wall::new(Point::new(400, 0), Point::new(400, 400)),
        Wall::new(Point::new(400, 400), Point::new(0, 400)),
        Wall::new(Point::new(0, 400), Point::new(0, 0)),
        // A partition with a doorway
        Wall::new(Point::new(200, 0), Point::new(200, 260)),
    ];
    let bounds = Rect::from_xywh(0, 0, 400, 400);

    c.bench_function("OccupancyGrid::build", |b| {
        b.iter(|| OccupancyGrid::build(20, bounds, &walls).unwrap())
    });

    let grid = OccupancyGrid::build(20, bounds, &walls).unwrap();

    c.bench_function("CoverageDecomposer::new", |b| {
        b.iter(|| CoverageDecomposer::new(grid.clone(), 3).unwrap())
    });

    let decomposer = CoverageDecomposer::new(grid, 3).unwrap();

    c.bench_function("CoverageGraph::make_from", |b| {
        b.iter(|| CoverageGraph::make_from(&decomposer))
    });
    c.bench_function("CoverageGraph::make_optimized_from", |b| {
        b.iter(|| CoverageGraph::make_optimized_from(&decomposer))
    });

    let graph = CoverageGraph::make_optimized_from(&decomposer);
    let start = Point::new(100, 100);

    let builders = vec![
        ("breadth_first", PathBuilder::BreadthFirst),
        (
            "right_first",
            PathBuilder::RightFirst {
                back_path: BackPathMode::ShortestPath,
                zone: None,
                link_wall_points: false,
            },
        ),
        (
            "non_occupied",
            PathBuilder::NonOccupied {
                zones: vec![],
                back_path: BackPathMode::ShortestPath,
            },
        ),
    ];

    for (name, builder) in builders.iter() {
        c.bench_function(&format!("PathBuilder::make_path::{}", name), |b| {
            b.iter(|| builder.make_path(&graph, &decomposer, &start))
        });
    }
}

criterion_group!(benches, bake_benchmark);
criterion_main!(benches);
