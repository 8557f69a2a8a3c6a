// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read a las2txt file and query the 8 returns nearest to its centre.

use std::env;
use std::process::ExitCode;

use canopy_index::{PointIndex, Quadtree};
use canopy_lidar::PointCloud;

fn main() -> ExitCode {
    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: read_cloud <cloud.txt>");
        return ExitCode::FAILURE;
    };

    let cloud = match PointCloud::from_path(&path) {
        Ok(cloud) => cloud,
        Err(err) => {
            eprintln!("failed to read {path}: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!(
        "{} points, x [{}, {}], y [{}, {}]",
        cloud.records.len(),
        cloud.min[0],
        cloud.max[0],
        cloud.min[1],
        cloud.max[1]
    );

    let mut index = Quadtree::new(cloud.min[0], cloud.max[0], cloud.min[1], cloud.max[1]);
    index.build(&cloud.records);

    let cx = (cloud.min[0] + cloud.max[0]) / 2.0;
    let cy = (cloud.min[1] + cloud.max[1]) / 2.0;
    for record in index.query_knn(8, cx, cy) {
        println!("{:10.2} {:10.2} {:7.2}", record[0], record[1], record[2]);
    }
    ExitCode::SUCCESS
}
