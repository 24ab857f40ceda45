// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, cascading updates, queries.

use alloc::vec::Vec;
use log::{debug, trace};

use crate::error::{ConsistencyError, ReparentError};
use crate::interval::Interval;
use crate::types::{FlipFlags, Frame, LocalSegment, SegmentId};

impl Default for SegmentTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Arena of nested line segments with eagerly cached world frames.
///
/// Every mutation resolves its full cascade before returning, so readers never
/// observe a stale world value.
pub struct SegmentTree {
    segments: Vec<Option<Segment>>, // slots
    generations: Vec<u32>,          // last generation per slot (persists across frees)
    free_list: Vec<usize>,
}

impl core::fmt::Debug for SegmentTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.segments.len();
        let alive = self.len();
        let free = self.free_list.len();
        f.debug_struct("SegmentTree")
            .field("segments_total", &total)
            .field("segments_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Segment {
    generation: u32,
    parent: Option<SegmentId>,
    children: Vec<SegmentId>,
    local: Frame,
    world: Frame,
    flip: FlipFlags,
}

impl Segment {
    fn new(generation: u32, local: LocalSegment) -> Self {
        let frame = Frame::from_local(&local);
        let flip = if local.flipped {
            FlipFlags::LOCAL | FlipFlags::WORLD
        } else {
            FlipFlags::empty()
        };
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local: frame,
            world: frame.placed_at(local.position, local.flipped),
            flip,
        }
    }

    fn world_flipped(&self) -> bool {
        self.flip.contains(FlipFlags::WORLD)
    }

    fn local_flipped(&self) -> bool {
        self.flip.contains(FlipFlags::LOCAL)
    }
}

impl SegmentTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Create an empty tree with room for `capacity` segments before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            segments: Vec::with_capacity(capacity),
            generations: Vec::with_capacity(capacity),
            free_list: Vec::new(),
        }
    }

    /// Insert a new segment as a child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` is ignored and the segment becomes a root.
    pub fn insert(&mut self, parent: Option<SegmentId>, local: LocalSegment) -> SegmentId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.segments[idx] = Some(Segment::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "SegmentId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.segments.push(Some(Segment::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "SegmentId uses 32-bit indices by design."
            )]
            ((self.segments.len() - 1) as u32, generation)
        };
        let id = SegmentId::new(idx, generation);
        if let Some(p) = parent.filter(|p| self.is_alive(*p)) {
            self.attach(id, p);
        }
        id
    }

    /// Insert a parentless, unflipped segment spanning `a..=b` at position zero.
    pub fn insert_segment(&mut self, a: f64, b: f64) -> SegmentId {
        self.insert(None, LocalSegment::new(a, b))
    }

    /// Remove a segment (and its subtree) from the tree.
    pub fn remove(&mut self, id: SegmentId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.segment(id).parent {
            self.unlink_parent(id, parent);
        }
        self.free_subtree(id);
        debug!("removed {id:?} and its subtree");
    }

    /// Set local A.
    ///
    /// Only this segment's world extent changes: world A when unflipped, world B
    /// when flipped. Children never depend on A or B.
    pub fn set_a(&mut self, id: SegmentId, value: f64) {
        let Some(seg) = self.segment_opt_mut(id) else {
            return;
        };
        let delta = value - seg.local.a;
        if delta == 0.0 {
            return;
        }
        seg.local.a = value;
        if seg.world_flipped() {
            seg.world.b -= delta;
        } else {
            seg.world.a += delta;
        }
    }

    /// Set local B.
    ///
    /// Only this segment's world extent changes: world B when unflipped, world A
    /// when flipped.
    pub fn set_b(&mut self, id: SegmentId, value: f64) {
        let Some(seg) = self.segment_opt_mut(id) else {
            return;
        };
        let delta = value - seg.local.b;
        if delta == 0.0 {
            return;
        }
        seg.local.b = value;
        if seg.world_flipped() {
            seg.world.a -= delta;
        } else {
            seg.world.b += delta;
        }
    }

    /// Set local position.
    ///
    /// The change is reversed in world space when the parent is flipped, and the
    /// resulting world delta moves the whole subtree.
    pub fn set_position(&mut self, id: SegmentId, value: f64) {
        let Some(seg) = self.segment_opt_mut(id) else {
            return;
        };
        let delta = value - seg.local.position;
        if delta == 0.0 {
            return;
        }
        seg.local.position = value;
        let world_delta = if self.parent_world_flipped(id) {
            -delta
        } else {
            delta
        };
        trace!("translate subtree of {id:?} by {world_delta}");
        self.translate_subtree(id, world_delta);
    }

    /// Set the local flip state, mirroring the segment and its subtree around the
    /// segment's world position.
    ///
    /// Setting the current state again is a no-op.
    pub fn flip(&mut self, id: SegmentId, flipped: bool) {
        let Some(seg) = self.segment_opt_mut(id) else {
            return;
        };
        if seg.local_flipped() == flipped {
            return;
        }
        seg.flip.set(FlipFlags::LOCAL, flipped);
        // One local step always toggles the composed parity.
        let world_flipped = !seg.world_flipped();
        let position = seg.world.position;
        trace!("mirror subtree of {id:?} around {position}");
        self.reframe_subtree(id, position, world_flipped);
    }

    /// Reparent `id` under `new_parent`, or detach it with `None`.
    ///
    /// Detaching leaves the segment exactly as if it had never had a parent;
    /// moving between parents is a detach followed by an attach. Setting the
    /// current parent again is a no-op.
    pub fn set_parent(
        &mut self,
        id: SegmentId,
        new_parent: Option<SegmentId>,
    ) -> Result<(), ReparentError> {
        if !self.is_alive(id) {
            return Err(ReparentError::StaleSegment(id));
        }
        let old_parent = self.segment(id).parent;
        if old_parent == new_parent {
            return Ok(());
        }
        if let Some(p) = new_parent {
            if !self.is_alive(p) {
                return Err(ReparentError::StaleSegment(p));
            }
            if p == id {
                return Err(ReparentError::SelfParent(id));
            }
            if self.is_ancestor(id, p) {
                return Err(ReparentError::Cycle {
                    child: id,
                    parent: p,
                });
            }
        }
        if let Some(old) = old_parent {
            self.detach(id, old);
        }
        if let Some(p) = new_parent {
            self.attach(id, p);
        }
        debug!("reparented {id:?}: {old_parent:?} -> {new_parent:?}");
        Ok(())
    }

    /// Add `child` under `parent`; same as `set_parent(child, Some(parent))`.
    pub fn add(&mut self, parent: SegmentId, child: SegmentId) -> Result<(), ReparentError> {
        self.set_parent(child, Some(parent))
    }

    /// Whether the closed world extents of `x` and `y` overlap or touch.
    ///
    /// Stale ids never collide.
    pub fn collides(&self, x: SegmentId, y: SegmentId) -> bool {
        match (self.world_extent(x), self.world_extent(y)) {
            (Some(ex), Some(ey)) => ex.overlaps(&ey),
            _ => false,
        }
    }

    /// Iterate every other live segment whose world extent overlaps `id`'s.
    pub fn colliding_with(&self, id: SegmentId) -> impl Iterator<Item = SegmentId> + '_ {
        let extent = self.world_extent(id);
        self.ids().filter(move |other| {
            *other != id
                && extent
                    .zip(self.world_extent(*other))
                    .is_some_and(|(e, o)| e.overlaps(&o))
        })
    }

    /// Iterate live segments whose world extent overlaps `interval`.
    pub fn intersect_interval(&self, interval: Interval) -> impl Iterator<Item = SegmentId> + '_ {
        self.ids().filter(move |id| {
            self.world_extent(*id)
                .is_some_and(|extent| extent.overlaps(&interval))
        })
    }

    /// Returns true if `id` refers to a live segment.
    ///
    /// A `SegmentId` is live if its slot exists and its generation matches the
    /// current generation stored in that slot.
    pub fn is_alive(&self, id: SegmentId) -> bool {
        self.segments
            .get(id.idx())
            .and_then(|s| s.as_ref())
            .is_some_and(|s| s.generation == id.generation())
    }

    /// Number of live segments.
    pub fn len(&self) -> usize {
        self.segments.iter().filter(|s| s.is_some()).count()
    }

    /// True if the tree holds no live segments.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate all live segment ids in slot order.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "SegmentId uses 32-bit indices by design."
    )]
    pub fn ids(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| SegmentId::new(i as u32, s.generation)))
    }

    /// World A (start of the world extent).
    pub fn world_a(&self, id: SegmentId) -> Option<f64> {
        self.segment_opt(id).map(|s| s.world.a)
    }

    /// World B (end of the world extent).
    pub fn world_b(&self, id: SegmentId) -> Option<f64> {
        self.segment_opt(id).map(|s| s.world.b)
    }

    /// Position in the root frame.
    pub fn world_position(&self, id: SegmentId) -> Option<f64> {
        self.segment_opt(id).map(|s| s.world.position)
    }

    /// Whether the segment is mirrored relative to the root frame.
    pub fn world_flipped(&self, id: SegmentId) -> Option<bool> {
        self.segment_opt(id).map(Segment::world_flipped)
    }

    /// Both flip bits of a segment.
    pub fn flip_flags(&self, id: SegmentId) -> Option<FlipFlags> {
        self.segment_opt(id).map(|s| s.flip)
    }

    /// World extent `[world_a, world_b]`.
    pub fn world_extent(&self, id: SegmentId) -> Option<Interval> {
        self.segment_opt(id)
            .map(|s| Interval::new(s.world.a, s.world.b))
    }

    /// Local geometry as last written.
    pub fn local(&self, id: SegmentId) -> Option<LocalSegment> {
        self.segment_opt(id).map(|s| LocalSegment {
            a: s.local.a,
            b: s.local.b,
            position: s.local.position,
            flipped: s.local_flipped(),
        })
    }

    /// Returns the parent of a segment if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: SegmentId) -> Option<SegmentId> {
        self.segment_opt(id).and_then(|s| s.parent)
    }

    /// Get the children of a segment, or an empty slice if the id is stale.
    pub fn children_of(&self, id: SegmentId) -> &[SegmentId] {
        match self.segment_opt(id) {
            Some(s) => &s.children,
            None => &[],
        }
    }

    /// Recompute every world frame from the roots down and compare it with the cache.
    ///
    /// Also checks that parent links and child lists agree. Values are compared
    /// with a small relative tolerance to absorb rounding from incremental updates.
    pub fn validate(&self) -> Result<(), ConsistencyError> {
        for id in self.ids() {
            let seg = self.segment(id);
            if let Some(p) = seg.parent {
                let linked = self
                    .segment_opt(p)
                    .is_some_and(|parent| parent.children.contains(&id));
                if !linked {
                    return Err(ConsistencyError::LinkMismatch {
                        child: id,
                        parent: p,
                    });
                }
            }
            for &child in &seg.children {
                if self.parent_of(child) != Some(id) {
                    return Err(ConsistencyError::LinkMismatch { child, parent: id });
                }
            }
        }
        for id in self.ids() {
            if self.segment(id).parent.is_none() {
                self.validate_subtree(id, 0.0, false)?;
            }
        }
        Ok(())
    }

    // --- internals ---

    /// Access a segment; panics if `id` is stale.
    pub(crate) fn segment(&self, id: SegmentId) -> &Segment {
        self.segments[id.idx()]
            .as_ref()
            .expect("dangling SegmentId")
    }

    /// Access a segment mutably; panics if `id` is stale.
    pub(crate) fn segment_mut(&mut self, id: SegmentId) -> &mut Segment {
        self.segments[id.idx()]
            .as_mut()
            .expect("dangling SegmentId")
    }

    fn segment_opt(&self, id: SegmentId) -> Option<&Segment> {
        let s = self.segments.get(id.idx())?.as_ref()?;
        (s.generation == id.generation()).then_some(s)
    }

    fn segment_opt_mut(&mut self, id: SegmentId) -> Option<&mut Segment> {
        let s = self.segments.get_mut(id.idx())?.as_mut()?;
        if s.generation != id.generation() {
            return None;
        }
        Some(s)
    }

    fn child_at(&self, id: SegmentId, i: usize) -> Option<SegmentId> {
        self.segment(id).children.get(i).copied()
    }

    fn parent_world_flipped(&self, id: SegmentId) -> bool {
        self.segment(id)
            .parent
            .is_some_and(|p| self.segment(p).world_flipped())
    }

    /// True if `ancestor` is on the parent chain of `id` (or is `id`).
    fn is_ancestor(&self, ancestor: SegmentId, mut id: SegmentId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.segment(id).parent {
                Some(p) => id = p,
                None => return false,
            }
        }
    }

    fn unlink_parent(&mut self, id: SegmentId, parent: SegmentId) {
        let p = self.segment_mut(parent);
        p.children.retain(|c| *c != id);
        self.segment_mut(id).parent = None;
    }

    /// Unlink from `parent` and fall back to the segment's own local frame.
    fn detach(&mut self, id: SegmentId, parent: SegmentId) {
        self.unlink_parent(id, parent);
        let seg = self.segment(id);
        let position = seg.local.position;
        let flipped = seg.local_flipped();
        trace!("detach {id:?} from {parent:?}");
        self.reframe_subtree(id, position, flipped);
    }

    /// Link under `parent` and compose the local frame with the parent's world frame.
    ///
    /// Only the world flip bit picks up the parent's mirroring; the local bit is kept.
    fn attach(&mut self, id: SegmentId, parent: SegmentId) {
        let (parent_position, parent_flipped) = {
            let p = self.segment_mut(parent);
            p.children.push(id);
            (p.world.position, p.world_flipped())
        };
        let seg = self.segment_mut(id);
        seg.parent = Some(parent);
        let position = if parent_flipped {
            parent_position - seg.local.position
        } else {
            parent_position + seg.local.position
        };
        let flipped = seg.local_flipped() != parent_flipped;
        trace!("attach {id:?} under {parent:?}");
        self.reframe_subtree(id, position, flipped);
    }

    /// Shift the world frame of `id` and every descendant by `delta`.
    fn translate_subtree(&mut self, id: SegmentId, delta: f64) {
        self.segment_mut(id).world.translate(delta);
        let mut i = 0;
        while let Some(child) = self.child_at(id, i) {
            self.translate_subtree(child, delta);
            i += 1;
        }
    }

    /// Place `id` at world `position` with the given world flip and carry its
    /// subtree along.
    ///
    /// Each child keeps its offset from its immediate parent; the offset is
    /// negated, and the child's world flip toggled, when the parent's world flip
    /// toggled. Applied level by level this reflects every descendant around the
    /// frame it hangs from.
    fn reframe_subtree(&mut self, id: SegmentId, position: f64, world_flipped: bool) {
        let (old_position, toggled) = {
            let seg = self.segment_mut(id);
            let old_position = seg.world.position;
            let toggled = seg.world_flipped() != world_flipped;
            seg.flip.set(FlipFlags::WORLD, world_flipped);
            seg.world = seg.local.placed_at(position, world_flipped);
            (old_position, toggled)
        };
        if !toggled && old_position == position {
            return;
        }
        let mut i = 0;
        while let Some(child) = self.child_at(id, i) {
            let c = self.segment(child);
            let offset = c.world.position - old_position;
            let offset = if toggled { -offset } else { offset };
            let child_flipped = c.world_flipped() != toggled;
            self.reframe_subtree(child, position + offset, child_flipped);
            i += 1;
        }
    }

    fn free_subtree(&mut self, id: SegmentId) {
        let children = core::mem::take(&mut self.segment_mut(id).children);
        for child in children {
            self.free_subtree(child);
        }
        self.segments[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    fn validate_subtree(
        &self,
        id: SegmentId,
        parent_position: f64,
        parent_flipped: bool,
    ) -> Result<(), ConsistencyError> {
        let seg = self.segment(id);
        let position = if parent_flipped {
            parent_position - seg.local.position
        } else {
            parent_position + seg.local.position
        };
        let flipped = seg.local_flipped() != parent_flipped;
        let expected = seg.local.placed_at(position, flipped);
        let consistent = seg.world_flipped() == flipped
            && approx_eq(seg.world.a, expected.a)
            && approx_eq(seg.world.b, expected.b)
            && approx_eq(seg.world.position, expected.position);
        if !consistent {
            return Err(ConsistencyError::StaleWorld(id));
        }
        for &child in &seg.children {
            self.validate_subtree(child, position, flipped)?;
        }
        Ok(())
    }
}

fn approx_eq(x: f64, y: f64) -> bool {
    (x - y).abs() <= 1e-9 * (1.0 + x.abs().max(y.abs()))
}
