// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! R-tree built by point-by-point insertion with quadratic splits.
//!
//! Entries are a tagged variant: an entry either references one datum
//! (with its bounding box collapsed to the point) or wraps a child node.
//! Inserts descend along the branch whose box needs the least area
//! expansion; a node overflowing its fan-out bound `M` is split by the
//! quadratic heuristic (pick the most wasteful seed pair, then hand out
//! the remaining entries by greatest expansion disparity). There is no
//! minimum-fill bound and no rebalancing.
//!
//! Unlike the quadtree and z-grid, no bounds are needed up front: the
//! root box grows from the first inserted point.

use std::fmt::Debug;

use crate::backends::NodeIdx;
use crate::index::{PointIndex, Record};
use crate::knn::{Browse, query_knn};
use crate::types::{Datum, Point, Rect};

/// Fan-out bound used by [`Rtree::new`].
pub const DEFAULT_MAX_ENTRIES: usize = 8;

/// A dynamically built R-tree over records of type `R`.
///
/// Immutable once built; queries are read-only and safe to run from
/// multiple threads. Interleaving queries with further builds is not
/// supported.
pub struct Rtree<R> {
    max_entries: usize,
    root: Entry,
    nodes: Vec<Node>,
    data: Vec<Datum<R>>,
}

struct Node {
    entries: Vec<Entry>,
    /// Points in this subtree. At a leaf this equals `entries.len()`.
    load: usize,
}

impl Node {
    fn empty() -> Self {
        Self {
            entries: Vec::new(),
            load: 0,
        }
    }
}

#[derive(Copy, Clone)]
struct Entry {
    mbb: Rect,
    child: Child,
}

#[derive(Copy, Clone)]
enum Child {
    /// A subtree.
    Node(NodeIdx),
    /// One datum, by index into the tree's data vector.
    Item(usize),
}

/// The pair of entries whose combined box wastes the most area.
fn pick_seeds(entries: &[Entry]) -> (usize, usize) {
    let mut best = (0, 1);
    let mut max_waste = f64::NEG_INFINITY;
    for (i, a) in entries.iter().enumerate() {
        for (j, b) in entries.iter().enumerate().skip(i + 1) {
            let waste = a.mbb.union(&b.mbb).area() - a.mbb.area() - b.mbb.area();
            if waste > max_waste {
                max_waste = waste;
                best = (i, j);
            }
        }
    }
    best
}

/// The leftover whose expansion costs differ most between the two groups.
fn pick_next(leftovers: &[Entry], g1: Rect, g2: Rect) -> usize {
    let mut max_diff = 0.0;
    let mut best = 0;
    for (i, entry) in leftovers.iter().enumerate() {
        let d1 = g1.union(&entry.mbb).area() - g1.area();
        let d2 = g2.union(&entry.mbb).area() - g2.area();
        if (d1 - d2).abs() > max_diff {
            max_diff = (d1 - d2).abs();
            best = i;
        }
    }
    best
}

impl<R> Default for Rtree<R> {
    fn default() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }
}

impl<R> Rtree<R> {
    /// Create an empty R-tree with the default fan-out bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty R-tree with an explicit fan-out bound (at least 2).
    pub fn with_max_entries(max_entries: usize) -> Self {
        debug_assert!(max_entries >= 2, "fan-out bound must allow a split");
        Self {
            max_entries,
            root: Entry {
                mbb: Rect::new(0.0, 0.0, 0.0, 0.0),
                child: Child::Node(NodeIdx::new(0)),
            },
            nodes: vec![Node::empty()],
            data: Vec::new(),
        }
    }

    fn root_node(&self) -> NodeIdx {
        match self.root.child {
            Child::Node(idx) => idx,
            Child::Item(_) => unreachable!("the root entry always wraps a node"),
        }
    }

    // A node is a leaf iff its entries are items. Nodes never mix entry
    // kinds, so the first entry decides; an empty node counts as a leaf.
    fn is_leaf_node(&self, node: NodeIdx) -> bool {
        self.nodes[node.get()]
            .entries
            .first()
            .is_none_or(|e| matches!(e.child, Child::Item(_)))
    }

    /// Points carried by an entry: one for an item, the subtree load for
    /// a node.
    fn entry_load(&self, entry: &Entry) -> usize {
        match entry.child {
            Child::Item(_) => 1,
            Child::Node(idx) => self.nodes[idx.get()].load,
        }
    }

    fn entry(&self, cursor: EntryRef) -> &Entry {
        match cursor.node {
            None => &self.root,
            Some(node) => &self.nodes[node.get()].entries[cursor.slot],
        }
    }
}

impl<R: Record + Clone> Rtree<R> {
    /// Bulk-build the tree by inserting `records` one by one. Building
    /// from no records is a no-op that leaves an empty, queryable tree.
    pub fn build(&mut self, records: &[R]) {
        let Some(first) = records.first() else {
            return;
        };
        // Seed the root box on the first point so expansion math starts
        // from a real location instead of the origin.
        self.root.mbb = Rect::from_point(Point::new(first.x(), first.y()));
        self.data.reserve(records.len());
        for record in records {
            let point = Point::new(record.x(), record.y());
            self.insert_datum(Datum {
                payload: record.clone(),
                point,
            });
        }
    }

    fn insert_datum(&mut self, datum: Datum<R>) {
        let point = datum.point;
        self.data.push(datum);
        let item = self.data.len() - 1;
        self.root.mbb = self.root.mbb.union_point(point);
        if self.insert_into(self.root_node(), item, point) {
            self.split_root();
        }
    }

    /// Recursively insert one point. Returns true when this node ends up
    /// holding more than `M` entries; splitting happens at the parent.
    fn insert_into(&mut self, node: NodeIdx, item: usize, point: Point) -> bool {
        if self.is_leaf_node(node) {
            self.nodes[node.get()].entries.push(Entry {
                mbb: Rect::from_point(point),
                child: Child::Item(item),
            });
        } else {
            let branch = self.choose_branch(node, point);
            let child = match self.nodes[node.get()].entries[branch].child {
                Child::Node(idx) => idx,
                Child::Item(_) => unreachable!("internal nodes hold node entries"),
            };
            let entry = &mut self.nodes[node.get()].entries[branch];
            entry.mbb = entry.mbb.union_point(point);
            if self.insert_into(child, item, point) {
                self.split(node, branch);
            }
        }
        let n = &mut self.nodes[node.get()];
        n.load += 1;
        n.entries.len() > self.max_entries
    }

    /// The branch whose box grows least to admit `p`; ties prefer the
    /// smaller box. A box already covering `p` wins outright.
    fn choose_branch(&self, node: NodeIdx, p: Point) -> usize {
        let entries = &self.nodes[node.get()].entries;
        let mut best = 0;
        let mut min_expansion = f64::INFINITY;
        for (i, entry) in entries.iter().enumerate() {
            let expansion = entry.mbb.union_point(p).area() - entry.mbb.area();
            if expansion == 0.0 {
                return i;
            }
            if expansion < min_expansion
                || (expansion == min_expansion && entry.mbb.area() < entries[best].mbb.area())
            {
                min_expansion = expansion;
                best = i;
            }
        }
        best
    }

    /// Split the overflowing child behind `parent.entries[branch]` into two
    /// sibling entries of `parent`.
    fn split(&mut self, parent: NodeIdx, branch: usize) {
        let overflowing = self.nodes[parent.get()].entries.remove(branch);
        let Child::Node(first_node) = overflowing.child else {
            unreachable!("only node entries overflow")
        };
        let mut leftovers = std::mem::take(&mut self.nodes[first_node.get()].entries);
        self.nodes[first_node.get()].load = 0;

        // Seed two fresh groups; the emptied node is reused for the first
        // seed, a new node holds the second. The seed entries themselves
        // stay in the leftovers and are handed out below.
        let (seed_a, seed_b) = pick_seeds(&leftovers);
        let second_node = NodeIdx::new(self.nodes.len());
        self.nodes.push(Node::empty());
        let parent_entries = &mut self.nodes[parent.get()].entries;
        parent_entries.push(Entry {
            mbb: leftovers[seed_a].mbb,
            child: Child::Node(first_node),
        });
        parent_entries.push(Entry {
            mbb: leftovers[seed_b].mbb,
            child: Child::Node(second_node),
        });
        let g2_slot = parent_entries.len() - 2;
        let g1_slot = parent_entries.len() - 1;

        // Hand each leftover to the group needing the smaller expansion;
        // ties go to the smaller box, then to the first group.
        while !leftovers.is_empty() {
            let g1 = self.nodes[parent.get()].entries[g1_slot].mbb;
            let g2 = self.nodes[parent.get()].entries[g2_slot].mbb;
            let next = pick_next(&leftovers, g1, g2);
            let entry = leftovers.remove(next);

            let g1_grown = g1.union(&entry.mbb);
            let g2_grown = g2.union(&entry.mbb);
            let g1_expansion = g1_grown.area() - g1.area();
            let g2_expansion = g2_grown.area() - g2.area();
            let choose_g1 = if g1_expansion == g2_expansion {
                g1.area() < g2.area()
            } else {
                g1_expansion < g2_expansion
            };
            let (slot, grown) = if choose_g1 {
                (g1_slot, g1_grown)
            } else {
                (g2_slot, g2_grown)
            };

            let load = self.entry_load(&entry);
            let Child::Node(group_node) = self.nodes[parent.get()].entries[slot].child else {
                unreachable!("group entries wrap nodes")
            };
            self.nodes[parent.get()].entries[slot].mbb = grown;
            let group = &mut self.nodes[group_node.get()];
            group.entries.push(entry);
            group.load += load;
        }
    }

    /// Grow the tree by one level: wrap the overflowing root node in a new
    /// root and split it there.
    fn split_root(&mut self) {
        let old_root = self.root;
        let old_load = self.nodes[self.root_node().get()].load;
        let new_root_node = NodeIdx::new(self.nodes.len());
        self.nodes.push(Node {
            entries: vec![old_root],
            load: old_load,
        });
        self.root = Entry {
            mbb: old_root.mbb,
            child: Child::Node(new_root_node),
        };
        self.split(new_root_node, 0);
    }
}

/// Address of one entry during traversal; the root entry lives outside
/// any node.
#[derive(Copy, Clone, Debug)]
pub struct EntryRef {
    node: Option<NodeIdx>,
    slot: usize,
}

// Distance browsing over entries rather than nodes: internal entries
// expand to their child's entries, item entries yield their datum. Item
// boxes are degenerate, so their box distance is the point distance.
impl<R: Record + Clone> Browse<R> for Rtree<R> {
    type Cursor = EntryRef;

    fn root(&self) -> Option<EntryRef> {
        (!self.data.is_empty()).then_some(EntryRef {
            node: None,
            slot: 0,
        })
    }

    fn bounds(&self, cursor: EntryRef) -> Rect {
        self.entry(cursor).mbb
    }

    fn is_leaf(&self, cursor: EntryRef) -> bool {
        matches!(self.entry(cursor).child, Child::Item(_))
    }

    fn expand(&self, cursor: EntryRef, out: &mut Vec<EntryRef>) {
        if let Child::Node(node) = self.entry(cursor).child {
            let slots = 0..self.nodes[node.get()].entries.len();
            out.extend(slots.map(|slot| EntryRef {
                node: Some(node),
                slot,
            }));
        }
    }

    fn bucket(&self, cursor: EntryRef) -> &[Datum<R>] {
        match self.entry(cursor).child {
            Child::Item(item) => std::slice::from_ref(&self.data[item]),
            Child::Node(_) => &[],
        }
    }
}

impl<R: Record + Clone> PointIndex<R> for Rtree<R> {
    fn query_knn(&self, k: usize, x: f64, y: f64) -> Vec<R> {
        query_knn(self, k, x, y)
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

impl<R> Debug for Rtree<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rtree")
            .field("max_entries", &self.max_entries)
            .field("arena_nodes", &self.nodes.len())
            .field("points", &self.data.len())
            .finish_non_exhaustive()
    }
}
