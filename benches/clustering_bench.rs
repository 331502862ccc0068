//! Benchmark for the clustering distance matrix and label assignment.

use apidrift::algorithms::dbscan::{dbscan_labels, distance_matrix, Point};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

fn synthetic_points(count: usize) -> Vec<Point> {
    (0..count)
        .map(|i| {
            Point::Text(format!(
                "handler_{} (self, request_{}, timeout=30) Handle request number {}.",
                i % 17,
                i % 5,
                i
            ))
        })
        .collect()
}

fn benchmark_distance_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance_matrix");
    group.sample_size(10); // Reduce sample size for faster benchmarking

    for size in [50, 200, 400] {
        let points = synthetic_points(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &points, |b, points| {
            b.iter(|| black_box(distance_matrix(black_box(points))));
        });
    }

    group.finish();
}

fn benchmark_label_assignment(c: &mut Criterion) {
    let points = synthetic_points(400);
    let distances = distance_matrix(&points);

    c.bench_function("dbscan_labels_400", |b| {
        b.iter(|| black_box(dbscan_labels(black_box(&distances), 0.5, 2)));
    });
}

criterion_group!(benches, benchmark_distance_matrix, benchmark_label_assignment);
criterion_main!(benches);
