// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed 1D intervals used for world extents and collision queries.

/// Closed interval `[start, end]` on the number line.
///
/// A segment's world extent is `[world_a, world_b]`. Inverted intervals
/// (`end < start`) are representable; they contain no point and do not overlap
/// themselves, but [`Interval::overlaps`] applies the same endpoint test to them.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Interval {
    /// Start of the interval (world A for a segment).
    pub start: f64,
    /// End of the interval (world B for a segment).
    pub end: f64,
}

impl Interval {
    /// Create a new interval from its endpoints.
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Whether two closed intervals overlap. Touching endpoints count.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.end >= other.start && self.start <= other.end
    }

    /// Whether `x` lies inside the interval, endpoints included.
    pub fn contains(&self, x: f64) -> bool {
        self.start <= x && x <= self.end
    }

    /// Signed length `end - start`; negative for inverted intervals.
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// True if `end < start`. Assumes no NaN.
    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }

    /// Smallest interval covering both.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_counts_as_overlap() {
        let left = Interval::new(-2.0, 1.0);
        let right = Interval::new(1.0, 2.0);
        assert!(left.overlaps(&right), "shared endpoint must overlap");
        assert!(right.overlaps(&left), "overlap is symmetric");
        assert!(!Interval::new(-2.0, -1.0).overlaps(&right));
    }

    #[test]
    fn inverted_interval() {
        let inv = Interval::new(3.0, 1.0);
        assert!(inv.is_inverted());
        assert_eq!(inv.length(), -2.0);
        assert!(!inv.contains(2.0), "inverted intervals contain nothing");
        assert!(!inv.overlaps(&inv));
    }

    #[test]
    fn union_covers_both() {
        let u = Interval::new(0.0, 1.0).union(&Interval::new(4.0, 5.0));
        assert_eq!(u, Interval::new(0.0, 5.0));
        assert!(u.contains(2.5));
    }
}
