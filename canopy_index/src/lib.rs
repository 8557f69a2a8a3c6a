// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Index: k-nearest-neighbour indexes for static 2D point clouds.
//!
//! Canopy Index bulk-loads a point cloud (for example LiDAR returns) into
//! one of three spatial indexes and answers k-NN queries over it. All
//! variants share one query algorithm — best-first distance browsing over
//! two priority queues — and one contract: results come back
//! **farthest-first**, at most `k` of them.
//!
//! - [`Quadtree`]: adaptive recursive partition, driven by a leaf
//!   capacity. Good general choice; leaves end up Z-ordered.
//! - [`Zgrid`]: flat Morton-coded grid at a fixed resolution with a thin
//!   overlay tree. Fastest build, but empty cells still cost memory.
//! - [`Rtree`]: dynamic point-insertion tree with quadratic splits. No
//!   global bounds needed up front.
//!
//! Records only need to project to a point: the first two components are
//! `(x, y)`, the rest rides along as payload (see [`Record`]).
//!
//! # Example
//!
//! ```rust
//! use canopy_index::{PointIndex, Quadtree};
//!
//! let points = vec![[0.0, 0.0], [1.0, 0.5], [4.0, 4.0]];
//! let mut qt = Quadtree::new(0.0, 5.0, 0.0, 5.0);
//! qt.build(&points);
//!
//! // Farthest-first: the closest of the two results comes last.
//! let hits = qt.query_knn(2, 0.0, 0.0);
//! assert_eq!(hits, vec![[1.0, 0.5], [0.0, 0.0]]);
//! ```
//!
//! # Mutability and threads
//!
//! Indexes are build-once, query-many. Queries take `&self`, allocate only
//! their own priority queues, and never touch index state, so a fully
//! built index can be queried from many threads at once. Interleaving
//! builds with queries is not supported.
//!
//! # Float semantics
//!
//! Coordinates are `f64` and must be finite; NaN coordinates are a
//! precondition violation. The quadtree and z-grid widen their top/right
//! bounds by a small epsilon so points exactly on the maximum bound stay
//! inside the tree.

pub mod backends;
pub mod index;
pub mod knn;
pub mod types;
pub mod zorder;

pub use backends::quadtree::Quadtree;
pub use backends::rtree::Rtree;
pub use backends::zgrid::Zgrid;
pub use index::{PointIndex, Record, datumize};
pub use knn::Browse;
pub use types::{Datum, Point, Range, Rect};
