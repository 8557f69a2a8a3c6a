// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Canopy Index: build each variant, query its neighbours.

use canopy_index::{PointIndex, Quadtree, Rtree, Zgrid};

fn main() {
    let records = vec![
        [2.0, 3.0, 61.5],
        [7.5, 1.0, 58.2],
        [4.0, 8.0, 70.1],
        [9.0, 9.0, 66.0],
        [1.0, 1.0, 55.9],
    ];

    let mut qt = Quadtree::new(0.0, 10.0, 0.0, 10.0);
    qt.build(&records);

    let mut zg = Zgrid::new(0.0, 10.0, 0.0, 10.0);
    zg.build(&records, 3);

    let mut rt = Rtree::new();
    rt.build(&records);

    // All three agree on the neighbour set; results are farthest-first.
    println!("quadtree: {:?}", qt.query_knn(3, 3.0, 3.0));
    println!("z-grid:   {:?}", zg.query_knn(3, 3.0, 3.0));
    println!("r-tree:   {:?}", rt.query_knn(3, 3.0, 3.0));
}
