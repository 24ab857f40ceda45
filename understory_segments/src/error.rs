// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by reparenting and by cache validation.

use thiserror::Error;

use crate::types::SegmentId;

/// Why [`SegmentTree::set_parent`](crate::SegmentTree::set_parent) refused a change.
///
/// The tree is left untouched when any of these is returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ReparentError {
    /// The child or the requested parent is not a live segment.
    #[error("segment {0:?} is not alive")]
    StaleSegment(SegmentId),
    /// A segment was asked to become its own parent.
    #[error("segment {0:?} cannot be its own parent")]
    SelfParent(SegmentId),
    /// The requested parent lives inside the child's subtree.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Segment being reparented.
        child: SegmentId,
        /// Requested parent, a descendant of `child`.
        parent: SegmentId,
    },
}

/// First inconsistency found by [`SegmentTree::validate`](crate::SegmentTree::validate).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    /// Cached world values disagree with a recomputation from the root.
    #[error("cached world frame of {0:?} is stale")]
    StaleWorld(SegmentId),
    /// A parent link and the parent's child list disagree.
    #[error("{child:?} and {parent:?} disagree about their parent link")]
    LinkMismatch {
        /// Segment whose parent link was followed.
        child: SegmentId,
        /// Parent on the other end of the broken link.
        parent: SegmentId,
    },
}
