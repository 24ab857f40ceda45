// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the segment tree: identifiers, flip flags, and local geometry.

/// Identifier for a segment in the tree.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `SegmentId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `SegmentId`.
///
/// Use [`SegmentTree::is_alive`](crate::SegmentTree::is_alive) to check whether a `SegmentId`
/// still refers to a live segment.
/// Stale ids never alias a different live segment because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SegmentId(pub(crate) u32, pub(crate) u32);

impl SegmentId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Mirroring state of a segment.
    ///
    /// Mirroring composes by parity: [`FlipFlags::WORLD`] is the XOR of
    /// [`FlipFlags::LOCAL`] along the path from the root to the segment.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FlipFlags: u8 {
        /// The segment mirrors itself and its subtree around its own position.
        const LOCAL = 0b0000_0001;
        /// The segment's frame is mirrored relative to the root frame.
        const WORLD = 0b0000_0010;
    }
}

/// Local geometry for a segment, expressed in its parent's frame.
///
/// `a` and `b` are not required to be ordered; an inverted pair is accepted as-is.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocalSegment {
    /// Start of the segment in its own untransformed frame.
    pub a: f64,
    /// End of the segment in its own untransformed frame.
    pub b: f64,
    /// Offset from the parent's position, measured along the parent's frame.
    pub position: f64,
    /// Whether the segment mirrors itself (and its children) around its position.
    pub flipped: bool,
}

impl LocalSegment {
    /// Create an unflipped segment spanning `a..=b` at position zero.
    pub const fn new(a: f64, b: f64) -> Self {
        Self {
            a,
            b,
            position: 0.0,
            flipped: false,
        }
    }
}

/// One coordinate frame of a segment: endpoints plus position.
///
/// Every segment carries two of these, the local one as written by callers and
/// the cached world one derived from it and from its ancestors.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Frame {
    pub(crate) a: f64,
    pub(crate) b: f64,
    pub(crate) position: f64,
}

impl Frame {
    pub(crate) const fn from_local(local: &LocalSegment) -> Self {
        Self {
            a: local.a,
            b: local.b,
            position: local.position,
        }
    }

    /// World frame of a segment with this local frame placed at `position`.
    ///
    /// When `flipped`, the endpoints swap roles and are mirrored around `position`.
    pub(crate) fn placed_at(&self, position: f64, flipped: bool) -> Self {
        if flipped {
            Self {
                a: position - self.b,
                b: position - self.a,
                position,
            }
        } else {
            Self {
                a: position + self.a,
                b: position + self.b,
                position,
            }
        }
    }

    pub(crate) fn translate(&mut self, delta: f64) {
        self.a += delta;
        self.b += delta;
        self.position += delta;
    }
}
