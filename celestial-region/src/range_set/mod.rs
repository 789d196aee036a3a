//! Ordered sets of disjoint half-open `u64` intervals.
//!
//! A [`RangeSet`] stores `2k` strictly increasing boundaries describing `k`
//! intervals `[r[2i], r[2i+1])`. Adjacent intervals are always merged, so two
//! sets cover the same integers exactly when their boundary arrays are equal.
//!
//! # Operations
//!
//! | Operation | Cost |
//! |-----------|------|
//! | [`append`](RangeSet::append) in non-decreasing order | amortized O(1) |
//! | [`contains`](RangeSet::contains), [`contains_range`](RangeSet::contains_range), [`overlaps_range`](RangeSet::overlaps_range) | O(log k) |
//! | [`add`](RangeSet::add), [`remove`](RangeSet::remove), [`intersect`](RangeSet::intersect) | O(log k) search + O(k) splice |
//! | [`union`](RangeSet::union), [`intersection`](RangeSet::intersection), [`difference`](RangeSet::difference) | O(n + m) or O(n log m), whichever is cheaper |
//! | [`contains_all`](RangeSet::contains_all), [`overlaps`](RangeSet::overlaps) | as above, stopping at the first decisive boundary |
//!
//! The set operations share one merge routine; see [`MergeStrategy`] for how
//! the algorithm is picked.
//!
//! ```
//! use celestial_region::RangeSet;
//!
//! let mut a = RangeSet::new();
//! a.add(10, 20);
//! a.add(15, 25);
//! assert_eq!(a.as_slice(), &[10, 25]);
//!
//! let b = RangeSet::from_range(20, 30);
//! assert_eq!(a.intersection(&b).as_slice(), &[20, 25]);
//! assert_eq!(a.union(&b).as_slice(), &[10, 30]);
//! assert_eq!(a.difference(&b).as_slice(), &[10, 20]);
//! ```

mod merge;
#[cfg(feature = "serde")]
mod serde_;

pub use merge::{MergeStrategy, SetOperation};

use crate::codec;
use crate::error::{RegionError, RegionResult};
use std::fmt;
use std::ops::Range;

/// Ordered set of disjoint, non-touching half-open intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RangeSet {
    r: Vec<u64>,
}

impl RangeSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self { r: Vec::new() }
    }

    /// Creates an empty set with room for `nranges` intervals.
    pub fn with_capacity(nranges: usize) -> Self {
        Self {
            r: Vec::with_capacity(2 * nranges),
        }
    }

    /// Creates a set holding the single interval `[a, b)`; empty if `a >= b`.
    pub fn from_range(a: u64, b: u64) -> Self {
        if a >= b {
            Self::new()
        } else {
            Self { r: vec![a, b] }
        }
    }

    /// Wraps a raw boundary array.
    ///
    /// # Errors
    /// Returns [`RegionError::InvariantViolation`] if the length is odd or the
    /// boundaries are not strictly increasing.
    pub fn from_boundaries(boundaries: Vec<u64>) -> RegionResult<Self> {
        check_consistency(&boundaries)?;
        Ok(Self { r: boundaries })
    }

    /// Number of intervals.
    #[inline]
    pub fn nranges(&self) -> usize {
        self.r.len() / 2
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    /// Start of interval `i`. Panics if `i >= nranges()`.
    #[inline]
    pub fn ivbegin(&self, i: usize) -> u64 {
        self.r[2 * i]
    }

    /// End (exclusive) of interval `i`. Panics if `i >= nranges()`.
    #[inline]
    pub fn ivend(&self, i: usize) -> u64 {
        self.r[2 * i + 1]
    }

    /// The boundary array `[b0, e0, b1, e1, ...]`.
    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.r
    }

    pub fn into_boundaries(self) -> Vec<u64> {
        self.r
    }

    /// Iterates over the intervals in ascending order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<u64>> + '_ {
        self.r.chunks_exact(2).map(|iv| iv[0]..iv[1])
    }

    /// Smallest covered value, if any.
    pub fn first(&self) -> Option<u64> {
        self.r.first().copied()
    }

    /// One past the largest covered value, if any.
    pub fn end(&self) -> Option<u64> {
        self.r.last().copied()
    }

    pub fn clear(&mut self) {
        self.r.clear();
    }

    /// Reserves room for at least `additional` more intervals.
    pub fn reserve(&mut self, additional: usize) {
        self.r.reserve(2 * additional);
    }

    /// Number of intervals the set can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.r.capacity() / 2
    }

    pub fn shrink_to_fit(&mut self) {
        self.r.shrink_to_fit();
    }

    /// Total number of covered integers.
    pub fn nval(&self) -> u64 {
        self.ranges().map(|iv| iv.end - iv.start).sum()
    }

    /// Appends `[a, b)` at the end of the set.
    ///
    /// If `a` falls inside or directly after the last interval, that interval
    /// is extended. Empty input (`a >= b`) is ignored.
    ///
    /// # Errors
    /// Returns [`RegionError::InvariantViolation`] if `a` lies before the
    /// start of the last interval.
    pub fn append(&mut self, a: u64, b: u64) -> RegionResult<()> {
        if a >= b {
            return Ok(());
        }
        if let Some(&last_end) = self.r.last() {
            let last_start = self.r[self.r.len() - 2];
            if a <= last_end && a < last_start {
                return Err(RegionError::invariant(
                    "RangeSet::append",
                    &format!(
                        "[{}, {}) starts before the last interval [{}, {})",
                        a, b, last_start, last_end
                    ),
                ));
            }
        }
        self.extend_tail(a, b);
        Ok(())
    }

    /// Appends the single value `v`. `u64::MAX` has no half-open interval
    /// and is ignored.
    pub fn append_single(&mut self, v: u64) -> RegionResult<()> {
        self.append(v, v.saturating_add(1))
    }

    /// Appends every interval of `other`, which must start at or after the
    /// start of this set's last interval.
    pub fn append_set(&mut self, other: &RangeSet) -> RegionResult<()> {
        self.reserve(other.nranges());
        for iv in other.ranges() {
            self.append(iv.start, iv.end)?;
        }
        Ok(())
    }

    /// Extends the last interval or pushes a new one. Callers guarantee that
    /// `a` is not before the last interval's start and that `a < b`.
    fn extend_tail(&mut self, a: u64, b: u64) {
        match self.r.last_mut() {
            Some(last_end) if a <= *last_end => {
                if b > *last_end {
                    *last_end = b;
                }
            }
            _ => {
                self.r.push(a);
                self.r.push(b);
            }
        }
    }

    /// Index of the last boundary `<= val`, or `-1` if `val` precedes every
    /// boundary. Even results mean `val` is inside an interval.
    #[inline]
    pub fn iiv(&self, val: u64) -> isize {
        self.r.partition_point(|&x| x <= val) as isize - 1
    }

    /// Inserts `[a, b)` anywhere in the set.
    pub fn add(&mut self, a: u64, b: u64) {
        if a >= b {
            return;
        }
        match self.r.last() {
            Some(&last_end) if a < last_end => self.add_remove(a, b, true),
            _ => self.extend_tail(a, b),
        }
    }

    /// Inserts the single value `v`. `u64::MAX` is ignored.
    pub fn add_single(&mut self, v: u64) {
        self.add(v, v.saturating_add(1));
    }

    /// Removes `[a, b)` from the set.
    pub fn remove(&mut self, a: u64, b: u64) {
        if a >= b || self.r.is_empty() {
            return;
        }
        let (first, end) = (self.r[0], self.r[self.r.len() - 1]);
        if b <= first || a >= end {
            return;
        }
        if a <= first && b >= end {
            self.r.clear();
            return;
        }
        self.add_remove(a, b, false);
    }

    /// Removes the single value `v`. `u64::MAX` is never a member.
    pub fn remove_single(&mut self, v: u64) {
        self.remove(v, v.saturating_add(1));
    }

    /// Restricts the set to `[a, b)`.
    pub fn intersect(&mut self, a: u64, b: u64) {
        if self.r.is_empty() {
            return;
        }
        let (first, end) = (self.r[0], self.r[self.r.len() - 1]);
        if a >= b || b <= first || a >= end {
            self.r.clear();
            return;
        }
        if a <= first && b >= end {
            return;
        }

        let mut pos2 = self.iiv(b);
        if pos2 >= 0 && self.r[pos2 as usize] == b {
            pos2 -= 1;
        }
        self.r.truncate((pos2 + 1) as usize);
        if pos2 & 1 == 0 {
            self.r.push(b);
        }

        let pos1 = self.iiv(a);
        let head = if pos1 & 1 == 0 { Some(a) } else { None };
        self.r.splice(0..(pos1 + 1) as usize, head);
    }

    /// Splices `[a, b)` in (`add == true`) or out of the boundary array.
    fn add_remove(&mut self, a: u64, b: u64, add: bool) {
        let parity: isize = if add { 1 } else { 0 };
        let mut pos1 = self.iiv(a);
        let pos2 = self.iiv(b);
        if pos1 >= 0 && self.r[pos1 as usize] == a {
            pos1 -= 1;
        }
        let insert_a = (pos1 & 1) == parity;
        let insert_b = (pos2 & 1) == parity;

        let mut replacement = Vec::with_capacity(2);
        if insert_a {
            replacement.push(a);
        }
        if insert_b {
            replacement.push(b);
        }
        debug_assert!(
            (pos2 - pos1 - replacement.len() as isize) % 2 == 0,
            "splice would break boundary parity"
        );
        self.r
            .splice((pos1 + 1) as usize..(pos2 + 1) as usize, replacement);
    }

    /// Returns `true` if `val` is covered.
    #[inline]
    pub fn contains(&self, val: u64) -> bool {
        self.iiv(val) & 1 == 0
    }

    /// Returns `true` if every value of `[a, b)` is covered.
    pub fn contains_range(&self, a: u64, b: u64) -> bool {
        let res = self.iiv(a);
        res & 1 == 0 && b <= self.r[(res + 1) as usize]
    }

    /// Returns `true` if any value of `[a, b)` is covered.
    pub fn overlaps_range(&self, a: u64, b: u64) -> bool {
        let res = self.iiv(a);
        if res & 1 == 0 {
            return true;
        }
        let next = (res + 1) as usize;
        next < self.r.len() && self.r[next] < b
    }

    /// Returns `true` if `other` is a subset of this set.
    pub fn contains_all(&self, other: &RangeSet) -> bool {
        merge::general_all_or_nothing(self, other, false, true, None)
    }

    /// Returns `true` if the two sets share at least one value.
    pub fn overlaps(&self, other: &RangeSet) -> bool {
        !merge::general_all_or_nothing(self, other, true, true, None)
    }

    pub fn union(&self, other: &RangeSet) -> RangeSet {
        self.combine(other, SetOperation::Union)
    }

    pub fn intersection(&self, other: &RangeSet) -> RangeSet {
        self.combine(other, SetOperation::Intersection)
    }

    /// Values in `self` but not in `other`.
    pub fn difference(&self, other: &RangeSet) -> RangeSet {
        self.combine(other, SetOperation::Difference)
    }

    /// Complement of this set within `[lo, hi)`.
    pub fn complement_within(&self, lo: u64, hi: u64) -> RangeSet {
        RangeSet::from_range(lo, hi).difference(self)
    }

    /// Applies `op`, choosing the merge algorithm by operand sizes.
    pub fn combine(&self, other: &RangeSet, op: SetOperation) -> RangeSet {
        let (flip_a, flip_b) = op.flips();
        merge::general_union(self, other, flip_a, flip_b, None)
    }

    /// Applies `op` with a fixed merge algorithm.
    ///
    /// Every strategy yields the same set; only the running time differs.
    pub fn combine_with(
        &self,
        other: &RangeSet,
        op: SetOperation,
        strategy: MergeStrategy,
    ) -> RangeSet {
        let (flip_a, flip_b) = op.flips();
        merge::general_union(self, other, flip_a, flip_b, Some(strategy))
    }

    /// [`contains_all`](Self::contains_all) with a fixed merge algorithm.
    pub fn contains_all_with(&self, other: &RangeSet, strategy: MergeStrategy) -> bool {
        merge::general_all_or_nothing(self, other, false, true, Some(strategy))
    }

    /// [`overlaps`](Self::overlaps) with a fixed merge algorithm.
    pub fn overlaps_with(&self, other: &RangeSet, strategy: MergeStrategy) -> bool {
        !merge::general_all_or_nothing(self, other, true, true, Some(strategy))
    }

    /// Serializes the boundaries with binary interpolative coding.
    pub fn to_compressed(&self) -> Vec<u8> {
        codec::encode_boundaries(&self.r)
    }

    /// Restores a set written by [`to_compressed`](Self::to_compressed).
    ///
    /// # Errors
    /// Returns [`RegionError::Codec`] for truncated or malformed input and
    /// [`RegionError::InvariantViolation`] if the decoded boundaries are not
    /// a valid range set.
    pub fn from_compressed(data: &[u8]) -> RegionResult<Self> {
        Self::from_boundaries(codec::decode_boundaries(data)?)
    }
}

fn check_consistency(r: &[u64]) -> RegionResult<()> {
    if r.len() % 2 != 0 {
        return Err(RegionError::invariant(
            "RangeSet::from_boundaries",
            &format!("odd boundary count {}", r.len()),
        ));
    }
    if let Some(i) = r.windows(2).position(|w| w[0] >= w[1]) {
        return Err(RegionError::invariant(
            "RangeSet::from_boundaries",
            &format!(
                "boundary {} at index {} is not below {}",
                r[i],
                i,
                r[i + 1]
            ),
        ));
    }
    Ok(())
}

impl FromIterator<Range<u64>> for RangeSet {
    fn from_iter<I: IntoIterator<Item = Range<u64>>>(iter: I) -> Self {
        let mut set = RangeSet::new();
        for iv in iter {
            set.add(iv.start, iv.end);
        }
        set
    }
}

impl fmt::Display for RangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, iv) in self.ranges().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[{},{})", iv.start, iv.end)?;
        }
        write!(f, "}}")
    }
}
