// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

use canopy_index::{PointIndex, Quadtree, Rtree, Zgrid};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

const EXTENT: f64 = 1000.0;

fn gen_random_cloud(count: usize) -> Vec<[f64; 3]> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            [
                rng.next_f64() * EXTENT,
                rng.next_f64() * EXTENT,
                50.0 + rng.next_f64() * 50.0,
            ]
        })
        .collect()
}

fn gen_clustered_cloud(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<[f64; 3]> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((rng.next_f64() * EXTENT, rng.next_f64() * EXTENT));
    }
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            out.push([
                cx + (rng.next_f64() - 0.5) * spread,
                cy + (rng.next_f64() - 0.5) * spread,
                50.0 + rng.next_f64() * 50.0,
            ]);
        }
    }
    out
}

fn gen_queries(count: usize) -> Vec<(f64, f64)> {
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    (0..count)
        .map(|_| (rng.next_f64() * EXTENT, rng.next_f64() * EXTENT))
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[10_000_usize, 100_000] {
        let cloud = gen_random_cloud(n);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(format!("quadtree_n{}", n), |b| {
            b.iter_batched(
                || cloud.clone(),
                |records| {
                    let mut qt = Quadtree::new(0.0, EXTENT, 0.0, EXTENT);
                    qt.build(&records);
                    black_box(qt.num_leaves());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("zgrid_n{}", n), |b| {
            b.iter_batched(
                || cloud.clone(),
                |records| {
                    let mut zg = Zgrid::new(0.0, EXTENT, 0.0, EXTENT);
                    zg.build(&records, 6);
                    black_box(zg.num_cells());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rtree_n{}", n), |b| {
            b.iter_batched(
                || cloud.clone(),
                |records| {
                    let mut rt = Rtree::new();
                    rt.build(&records);
                    black_box(rt.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_knn");
    let cloud = gen_random_cloud(100_000);
    let queries = gen_queries(64);

    let mut qt = Quadtree::new(0.0, EXTENT, 0.0, EXTENT);
    qt.build(&cloud);
    let mut zg = Zgrid::new(0.0, EXTENT, 0.0, EXTENT);
    zg.build(&cloud, 6);
    let mut rt = Rtree::new();
    rt.build(&cloud);

    for &k in &[1_usize, 16, 128] {
        group.throughput(Throughput::Elements(queries.len() as u64));

        group.bench_function(format!("quadtree_k{}", k), |b| {
            b.iter(|| {
                let mut found = 0;
                for &(x, y) in &queries {
                    found += qt.query_knn(k, x, y).len();
                }
                black_box(found);
            })
        });

        group.bench_function(format!("zgrid_k{}", k), |b| {
            b.iter(|| {
                let mut found = 0;
                for &(x, y) in &queries {
                    found += zg.query_knn(k, x, y).len();
                }
                black_box(found);
            })
        });

        group.bench_function(format!("rtree_k{}", k), |b| {
            b.iter(|| {
                let mut found = 0;
                for &(x, y) in &queries {
                    found += rt.query_knn(k, x, y).len();
                }
                black_box(found);
            })
        });
    }
    group.finish();
}

fn bench_query_clustered(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_knn_clustered");
    let cloud = gen_clustered_cloud(64, 1024, 40.0);
    let queries = gen_queries(64);

    let mut qt = Quadtree::new(0.0, EXTENT, 0.0, EXTENT);
    qt.build(&cloud);
    let mut zg = Zgrid::new(0.0, EXTENT, 0.0, EXTENT);
    zg.build(&cloud, 6);
    let mut rt = Rtree::new();
    rt.build(&cloud);

    group.throughput(Throughput::Elements(queries.len() as u64));
    group.bench_function("quadtree_k16", |b| {
        b.iter(|| {
            let mut found = 0;
            for &(x, y) in &queries {
                found += qt.query_knn(16, x, y).len();
            }
            black_box(found);
        })
    });
    group.bench_function("zgrid_k16", |b| {
        b.iter(|| {
            let mut found = 0;
            for &(x, y) in &queries {
                found += zg.query_knn(16, x, y).len();
            }
            black_box(found);
        })
    });
    group.bench_function("rtree_k16", |b| {
        b.iter(|| {
            let mut found = 0;
            for &(x, y) in &queries {
                found += rt.query_knn(16, x, y).len();
            }
            black_box(found);
        })
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_query, bench_query_clustered);
criterion_main!(benches);
