//! Union and intersection folds over regions.
//!
//! A [`RegionAccumulator`] follows the four-phase lifecycle of a
//! distributable aggregate:
//!
//! 1. [`new`](RegionAccumulator::new) starts with no state.
//! 2. [`accumulate`](RegionAccumulator::accumulate) folds in one input row.
//! 3. [`partial`](RegionAccumulator::partial) hands out the state of a
//!    partition and [`merge_partial`](RegionAccumulator::merge_partial)
//!    combines partitions in any order and at any fan-in.
//! 4. [`finalize`](RegionAccumulator::finalize) returns the region, or
//!    `None` if nothing was accumulated.
//!
//! The fold itself is a [`RegionFold`] strategy chosen by type parameter.
//! Both strategies are associative and commutative, so the result does not
//! depend on how rows are partitioned or merged.
//!
//! ```
//! use celestial_region::{Geometry, PixelRangeSet, RegionAccumulator, UnionFold};
//!
//! let mut left = RegionAccumulator::<UnionFold>::new();
//! let a = Geometry::region(PixelRangeSet::from_pixel_range(29, 10, 30).unwrap());
//! left.accumulate(Some(&a)).unwrap();
//!
//! let mut right = RegionAccumulator::<UnionFold>::new();
//! let b = Geometry::region(PixelRangeSet::from_pixel_range(29, 40, 70).unwrap());
//! right.accumulate(Some(&b)).unwrap();
//!
//! left.merge(right);
//! let region = left.finalize().unwrap();
//! assert_eq!(region.as_region().unwrap().nranges(), 2);
//! ```

use crate::error::{RegionError, RegionResult};
use crate::geometry::Geometry;
use crate::log::debug;
use crate::pixel_ranges::PixelRangeSet;
use std::fmt;
use std::marker::PhantomData;

/// An associative, commutative binary operation on regions.
pub trait RegionFold {
    /// Name used in logs.
    const NAME: &'static str;

    fn fold(acc: &PixelRangeSet, next: &PixelRangeSet) -> PixelRangeSet;
}

/// Set union of all inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnionFold;

impl RegionFold for UnionFold {
    const NAME: &'static str = "union";

    fn fold(acc: &PixelRangeSet, next: &PixelRangeSet) -> PixelRangeSet {
        acc.union(next)
    }
}

/// Set intersection of all inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntersectionFold;

impl RegionFold for IntersectionFold {
    const NAME: &'static str = "intersection";

    fn fold(acc: &PixelRangeSet, next: &PixelRangeSet) -> PixelRangeSet {
        acc.intersection(next)
    }
}

/// Modifiers a host may attach to an aggregate call.
///
/// None of them have a meaning for a set fold, so any of them being set is
/// rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AggregateOptions {
    /// `DISTINCT` inputs.
    pub distinct: bool,
    /// An `ORDER BY` inside the aggregate.
    pub ordered: bool,
    /// Used as a window function.
    pub windowed: bool,
}

impl AggregateOptions {
    pub fn validate(&self) -> RegionResult<()> {
        let rejected = [
            (self.distinct, "DISTINCT"),
            (self.ordered, "ORDER BY"),
            (self.windowed, "window"),
        ];
        match rejected.iter().find(|(set, _)| *set) {
            Some((_, name)) => Err(RegionError::invalid_argument(
                "RegionAccumulator",
                &format!("{} is not supported for region aggregates", name),
            )),
            None => Ok(()),
        }
    }
}

/// Accumulates regions with the fold `F`.
pub struct RegionAccumulator<F: RegionFold> {
    state: Option<PixelRangeSet>,
    rows: u64,
    _fold: PhantomData<F>,
}

/// Union accumulator.
pub type RegionUnion = RegionAccumulator<UnionFold>;
/// Intersection accumulator.
pub type RegionIntersection = RegionAccumulator<IntersectionFold>;

impl<F: RegionFold> RegionAccumulator<F> {
    pub fn new() -> Self {
        Self {
            state: None,
            rows: 0,
            _fold: PhantomData,
        }
    }

    /// Creates an accumulator after checking the host's call modifiers.
    pub fn with_options(options: &AggregateOptions) -> RegionResult<Self> {
        options.validate()?;
        Ok(Self::new())
    }

    /// Folds one input. `None` inputs are skipped.
    ///
    /// # Errors
    /// [`RegionError::InvalidArgument`] if the input is not a region.
    pub fn accumulate(&mut self, input: Option<&Geometry>) -> RegionResult<()> {
        let Some(geometry) = input else {
            return Ok(());
        };
        let ranges = geometry.as_region().ok_or_else(|| {
            RegionError::invalid_argument(
                "RegionAccumulator::accumulate",
                &format!("expected a region, got a {}", geometry.kind()),
            )
        })?;
        self.rows += 1;
        self.fold_in(ranges);
        Ok(())
    }

    /// Folds in a partial state produced by another accumulator.
    pub fn merge_partial(&mut self, partial: Option<PixelRangeSet>) {
        if let Some(ranges) = partial {
            match self.state.take() {
                None => self.state = Some(ranges),
                Some(acc) => self.state = Some(F::fold(&acc, &ranges)),
            }
        }
    }

    /// Folds in another accumulator of the same kind.
    pub fn merge(&mut self, other: RegionAccumulator<F>) {
        debug!(
            fold = F::NAME,
            rows = self.rows,
            other_rows = other.rows,
            "merging region partials"
        );
        self.rows += other.rows;
        self.merge_partial(other.state);
    }

    /// Current partial state, `None` before the first input.
    pub fn partial(&self) -> Option<&PixelRangeSet> {
        self.state.as_ref()
    }

    /// Number of non-null rows folded in, including merged partials.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// The final region, or `None` if nothing was accumulated.
    pub fn finalize(self) -> Option<Geometry> {
        debug!(fold = F::NAME, rows = self.rows, "finalizing region aggregate");
        self.state.map(Geometry::Region)
    }

    fn fold_in(&mut self, ranges: &PixelRangeSet) {
        self.state = Some(match self.state.take() {
            None => ranges.clone(),
            Some(acc) => F::fold(&acc, ranges),
        });
    }
}

impl<F: RegionFold> Default for RegionAccumulator<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: RegionFold> Clone for RegionAccumulator<F> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            rows: self.rows,
            _fold: PhantomData,
        }
    }
}

impl<F: RegionFold> fmt::Debug for RegionAccumulator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionAccumulator")
            .field("fold", &F::NAME)
            .field("rows", &self.rows)
            .field("state", &self.state)
            .finish()
    }
}

/// Folds `regions` left to right; `None` for an empty slice.
pub fn fold_regions<F: RegionFold>(regions: &[PixelRangeSet]) -> Option<PixelRangeSet> {
    let mut acc = RegionAccumulator::<F>::new();
    for ranges in regions {
        acc.rows += 1;
        acc.fold_in(ranges);
    }
    acc.state
}

/// Folds `regions` as a parallel tree reduction.
#[cfg(feature = "parallel")]
pub fn fold_regions_par<F: RegionFold>(regions: &[PixelRangeSet]) -> Option<PixelRangeSet> {
    use rayon::prelude::*;

    regions
        .par_iter()
        .map(|ranges| Some(ranges.clone()))
        .reduce(
            || None,
            |a, b| match (a, b) {
                (None, x) | (x, None) => x,
                (Some(a), Some(b)) => Some(F::fold(&a, &b)),
            },
        )
}
