// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Record ingestion and the uniform query contract shared by all indexes.

use crate::types::{Datum, Point};

/// A record that can be projected onto the indexed plane.
///
/// The first two components of a record are its `x` and `y` coordinates;
/// anything else it carries is opaque payload that queries hand back intact.
pub trait Record {
    /// The record's x coordinate.
    fn x(&self) -> f64;
    /// The record's y coordinate.
    fn y(&self) -> f64;
}

impl Record for [f64; 2] {
    fn x(&self) -> f64 {
        self[0]
    }
    fn y(&self) -> f64 {
        self[1]
    }
}

impl Record for [f64; 3] {
    fn x(&self) -> f64 {
        self[0]
    }
    fn y(&self) -> f64 {
        self[1]
    }
}

impl Record for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
}

/// Rows of at least two components, e.g. the `x y z …` rows of a LiDAR
/// text file. Panics on rows shorter than two.
impl Record for Vec<f64> {
    fn x(&self) -> f64 {
        self[0]
    }
    fn y(&self) -> f64 {
        self[1]
    }
}

/// Wrap each record with its projected point, preserving order.
pub fn datumize<R: Record + Clone>(records: &[R]) -> Vec<Datum<R>> {
    records
        .iter()
        .map(|record| Datum {
            point: Point::new(record.x(), record.y()),
            payload: record.clone(),
        })
        .collect()
}

/// The query contract every index variant implements.
pub trait PointIndex<P> {
    /// Collect up to `k` payloads nearest to `(x, y)`.
    ///
    /// Results are ordered **farthest-first** (non-increasing distance from
    /// the query point). Fewer than `k` payloads come back when the index
    /// holds fewer points; `k == 0` and empty indexes yield an empty vector.
    fn query_knn(&self, k: usize, x: f64, y: f64) -> Vec<P>;

    /// Number of points held by the index.
    fn len(&self) -> usize;

    /// Whether the index holds no points.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
