// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy LiDAR: a reader for las2txt-style point cloud text files.
//!
//! The format is the `.txt` output of LAStools' `las2txt`: a handful of
//! `%`-prefixed header lines, of which `% min x y z …` and `% max x y z …`
//! carry the dataset bounds, followed by one whitespace-separated
//! `x y z` triple per line.
//!
//! This is deliberately not a general LAS parser; production code should
//! read `.las`/`.laz` directly. It exists to feed [`canopy_index`] builds
//! with real clouds: the bounds seed the index constructor, the records go
//! to `build`.
//!
//! ```rust
//! use canopy_lidar::PointCloud;
//!
//! let text = "\
//! % file signature:    LASF
//! % min x y z          0.0 0.0 50.0
//! % max x y z          16.0 16.0 100.0
//! 1.5 2.5 61.0
//! 3.5 4.5 62.0
//! ";
//! let cloud = PointCloud::from_reader(text.as_bytes())?;
//! assert_eq!(cloud.min[0], 0.0);
//! assert_eq!(cloud.records.len(), 2);
//! # Ok::<(), canopy_lidar::ReadError>(())
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Failures while reading a LiDAR text file.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The underlying reader failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A `% min x y z` / `% max x y z` header carried unparsable bounds.
    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),

    /// The header ended without both `min x y z` and `max x y z` bounds.
    #[error("missing `% min x y z` / `% max x y z` header bounds")]
    MissingBounds,
}

/// Crate-local result alias.
pub type Result<T> = std::result::Result<T, ReadError>;

/// A parsed point cloud: dataset bounds plus the raw `x y z` records.
#[derive(Clone, Debug, PartialEq)]
pub struct PointCloud {
    /// Per-axis minima from the `% min x y z` header.
    pub min: [f64; 3],
    /// Per-axis maxima from the `% max x y z` header.
    pub max: [f64; 3],
    /// The point records, in file order.
    pub records: Vec<[f64; 3]>,
}

impl PointCloud {
    /// Read a cloud from a file on disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Read a cloud from any buffered reader.
    ///
    /// Data lines that do not parse as three floats are skipped with a
    /// warning rather than aborting the whole read.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut min = None;
        let mut max = None;
        let mut records = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if let Some(header) = line.strip_prefix('%') {
                let header = header.trim_start();
                if let Some(coords) = header.strip_prefix("min x y z") {
                    min = Some(parse_triple(coords).ok_or_else(|| {
                        ReadError::MalformedHeader(line.clone())
                    })?);
                } else if let Some(coords) = header.strip_prefix("max x y z") {
                    max = Some(parse_triple(coords).ok_or_else(|| {
                        ReadError::MalformedHeader(line.clone())
                    })?);
                }
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            match parse_triple(&line) {
                Some(record) => records.push(record),
                None => log::warn!("skipping malformed point record: {line:?}"),
            }
        }

        match (min, max) {
            (Some(min), Some(max)) => Ok(Self { min, max, records }),
            _ => Err(ReadError::MissingBounds),
        }
    }
}

/// Parse the first three whitespace-separated floats of `s`.
fn parse_triple(s: &str) -> Option<[f64; 3]> {
    let mut parts = s.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    let z = parts.next()?.parse().ok()?;
    Some([x, y, z])
}
