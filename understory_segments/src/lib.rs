// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_segments --heading-base-level=0

//! Understory Segments: nested 1D line segments with cached world extents.
//!
//! A segment is a closed interval `[a, b]` on a number line. Segments nest: each
//! one may hang from a parent that translates it (position) and optionally mirrors
//! it around the parent's own position (flip). Every segment caches its
//! world-space extent, position, and flip parity so reads are O(1).
//!
//! - Writes resolve eagerly: setting A, B, position, flip state, or parent updates
//!   the segment and exactly its subtree before returning.
//! - Redundant writes (same value, same parent) are no-ops and never walk the tree.
//! - Mirroring composes by parity: a segment is flipped in world space when an odd
//!   number of segments on its root path are locally flipped.
//!
//! ## Frames
//!
//! Each segment carries two parallel frames:
//! - Local: `a`, `b`, `position`, and the local flip bit, as written by callers.
//! - World: the same values composed with every ancestor, relative to the root.
//!
//! A parent at world position `P` places a child with local position `p` at
//! `P + p`, or at `P - p` when the parent is flipped in world space. A segment at
//! world position `X` spans `[X + a, X + b]`, or `[X - b, X - a]` when flipped.
//!
//! ## API overview
//!
//! - [`SegmentTree`]: arena owning every segment and running the cascades.
//! - [`LocalSegment`]: local geometry used to create segments.
//! - [`SegmentId`]: generational handle of a segment.
//! - [`FlipFlags`]: local and world flip bits.
//! - [`Interval`]: closed world extent used for collision tests.
//!
//! Key operations:
//! - [`SegmentTree::insert`] / [`SegmentTree::insert_segment`] → [`SegmentId`]
//! - [`SegmentTree::set_a`], [`SegmentTree::set_b`], [`SegmentTree::set_position`], [`SegmentTree::flip`]
//! - [`SegmentTree::set_parent`] and [`SegmentTree::add`]
//! - [`SegmentTree::collides`], [`SegmentTree::colliding_with`], and [`SegmentTree::intersect_interval`]
//!
//! ## Minimal usage
//!
//! ```
//! use understory_segments::{LocalSegment, SegmentTree};
//!
//! let mut tree = SegmentTree::new();
//!
//! let parent = tree.insert(None, LocalSegment { position: 1.0, ..LocalSegment::new(1.0, 2.0) });
//! let child = tree.insert(None, LocalSegment { position: 2.0, ..LocalSegment::new(3.0, 4.0) });
//!
//! tree.add(parent, child).unwrap();
//! assert_eq!(tree.world_a(child), Some(6.0));
//! assert_eq!(tree.world_b(child), Some(7.0));
//! assert_eq!(tree.world_position(child), Some(3.0));
//!
//! // Mirroring the parent reflects the child around the parent's position.
//! tree.flip(parent, true);
//! assert_eq!(tree.world_flipped(child), Some(true));
//! assert_eq!(tree.world_a(child), Some(-5.0));
//! assert_eq!(tree.world_b(child), Some(-4.0));
//! assert_eq!(tree.world_position(child), Some(-1.0));
//!
//! // Detaching restores the child's own frame.
//! tree.set_parent(child, None).unwrap();
//! assert_eq!(tree.world_a(child), Some(5.0));
//! ```
//!
//! ### Collisions
//!
//! ```
//! use understory_segments::SegmentTree;
//!
//! let mut tree = SegmentTree::new();
//! let s1 = tree.insert_segment(-2.0, -1.0);
//! let s2 = tree.insert_segment(1.0, 2.0);
//! assert!(!tree.collides(s1, s2));
//!
//! // Touching endpoints count.
//! tree.set_position(s1, 2.0);
//! assert!(tree.collides(s1, s2));
//! assert_eq!(tree.colliding_with(s1).collect::<Vec<_>>(), [s2]);
//! ```
//!
//! The crate logs through the [`log`] facade (`debug` for structural changes,
//! `trace` for cascades) and never installs a logger itself.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod interval;
mod tree;
mod types;

pub use error::{ConsistencyError, ReparentError};
pub use interval::Interval;
pub use tree::SegmentTree;
pub use types::{FlipFlags, LocalSegment, SegmentId};
