//! Sky regions as ranges of order-29 pixel indices.
//!
//! In the nested scheme the `4^(29-o)` order-29 descendants of a pixel at
//! order `o` have consecutive indices, so a pixel `p` at any order is the
//! interval `[p << 2(29-o), (p+1) << 2(29-o))`. Regions of mixed resolution
//! therefore live in a single [`RangeSet`] and combine with plain interval
//! algebra.
//!
//! ```
//! use celestial_region::PixelRangeSet;
//!
//! let mut a = PixelRangeSet::new();
//! a.add_pixel_range(3, 10, 90).unwrap();
//! let mut b = PixelRangeSet::new();
//! b.add_pixel_range(3, 20, 40).unwrap();
//!
//! let both = a.intersection(&b);
//! assert_eq!(both, PixelRangeSet::from_pixel_range(3, 20, 40).unwrap());
//! assert_eq!(a.union(&b), a);
//! ```

mod uniq;

pub use uniq::{split_uniq_id, uniq_id};

use crate::constants::{MAX_ORDER, NPIX_MAX_ORDER, UNIT_PIXEL_AREA};
use crate::error::{RegionError, RegionResult};
use crate::pixel::{check_order, check_pixel, npix};
use crate::range_set::RangeSet;
use std::fmt;

/// Bit shift taking a pixel index at `order` to order 29.
#[inline]
pub fn order_shift(order: u8) -> u32 {
    2 * u32::from(MAX_ORDER - order)
}

/// A [`RangeSet`] over `[0, 12·4^29)`, the pixel indices at order 29.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RangeSet", into = "RangeSet"))]
pub struct PixelRangeSet {
    ranges: RangeSet,
}

impl PixelRangeSet {
    pub fn new() -> Self {
        Self {
            ranges: RangeSet::new(),
        }
    }

    /// The whole sphere.
    pub fn full_sky() -> Self {
        Self {
            ranges: RangeSet::from_range(0, NPIX_MAX_ORDER),
        }
    }

    /// Wraps order-29 ranges, rejecting values past `12·4^29`.
    pub fn from_range_set(ranges: RangeSet) -> RegionResult<Self> {
        if let Some(end) = ranges.end() {
            if end > NPIX_MAX_ORDER {
                return Err(RegionError::invalid_argument(
                    "PixelRangeSet::from_range_set",
                    &format!("range end {} exceeds {}", end, NPIX_MAX_ORDER),
                ));
            }
        }
        Ok(Self { ranges })
    }

    /// Region made of one pixel at `order`.
    pub fn from_pixel(order: u8, pix: u64) -> RegionResult<Self> {
        let mut set = Self::new();
        set.append_pixel(order, pix)?;
        Ok(set)
    }

    /// Region made of pixels `[begin, end)` at `order`.
    pub fn from_pixel_range(order: u8, begin: u64, end: u64) -> RegionResult<Self> {
        let mut set = Self::new();
        set.append_pixel_range(order, begin, end)?;
        Ok(set)
    }

    /// Lifts ranges of pixel indices at `order` into order-29 space.
    pub fn from_order_ranges(order: u8, pixels: &RangeSet) -> RegionResult<Self> {
        let mut set = Self::new();
        set.ranges.reserve(pixels.nranges());
        for iv in pixels.ranges() {
            set.append_pixel_range(order, iv.start, iv.end)?;
        }
        Ok(set)
    }

    #[inline]
    pub fn as_range_set(&self) -> &RangeSet {
        &self.ranges
    }

    pub fn into_range_set(self) -> RangeSet {
        self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn nranges(&self) -> usize {
        self.ranges.nranges()
    }

    /// Number of order-29 pixels covered.
    pub fn nval(&self) -> u64 {
        self.ranges.nval()
    }

    /// Covered solid angle in steradians.
    pub fn area(&self) -> f64 {
        self.nval() as f64 * UNIT_PIXEL_AREA
    }

    fn shifted(context: &str, order: u8, begin: u64, end: u64) -> RegionResult<(u64, u64)> {
        check_order(context, order)?;
        if begin > end || end > npix(order) {
            return Err(RegionError::invalid_argument(
                context,
                &format!(
                    "pixel range [{}, {}) invalid at order {}",
                    begin, end, order
                ),
            ));
        }
        let shift = order_shift(order);
        Ok((begin << shift, end << shift))
    }

    /// Inserts pixel `pix` at `order`.
    pub fn add_pixel(&mut self, order: u8, pix: u64) -> RegionResult<()> {
        check_pixel("PixelRangeSet::add_pixel", order, pix)?;
        let shift = order_shift(order);
        self.ranges.add(pix << shift, (pix + 1) << shift);
        Ok(())
    }

    /// Inserts pixels `[begin, end)` at `order`.
    pub fn add_pixel_range(&mut self, order: u8, begin: u64, end: u64) -> RegionResult<()> {
        let (a, b) = Self::shifted("PixelRangeSet::add_pixel_range", order, begin, end)?;
        self.ranges.add(a, b);
        Ok(())
    }

    /// Appends pixel `pix` at `order`; it must not start before the last
    /// interval.
    pub fn append_pixel(&mut self, order: u8, pix: u64) -> RegionResult<()> {
        check_pixel("PixelRangeSet::append_pixel", order, pix)?;
        let shift = order_shift(order);
        self.ranges.append(pix << shift, (pix + 1) << shift)
    }

    /// Appends pixels `[begin, end)` at `order`.
    pub fn append_pixel_range(&mut self, order: u8, begin: u64, end: u64) -> RegionResult<()> {
        let (a, b) = Self::shifted("PixelRangeSet::append_pixel_range", order, begin, end)?;
        self.ranges.append(a, b)
    }

    /// Returns `true` if every descendant of `pix` at `order` is covered.
    pub fn contains_pixel(&self, order: u8, pix: u64) -> RegionResult<bool> {
        check_pixel("PixelRangeSet::contains_pixel", order, pix)?;
        let shift = order_shift(order);
        Ok(self.ranges.contains_range(pix << shift, (pix + 1) << shift))
    }

    /// Returns `true` if any descendant of `pix` at `order` is covered.
    pub fn overlaps_pixel(&self, order: u8, pix: u64) -> RegionResult<bool> {
        check_pixel("PixelRangeSet::overlaps_pixel", order, pix)?;
        let shift = order_shift(order);
        Ok(self.ranges.overlaps_range(pix << shift, (pix + 1) << shift))
    }

    /// Snaps every interval to pixel boundaries at `order`.
    ///
    /// With `keep_partial` the result grows to every pixel touched by the
    /// region; otherwise it shrinks to the pixels fully inside it.
    pub fn degraded_to_order(&self, order: u8, keep_partial: bool) -> RegionResult<Self> {
        check_order("PixelRangeSet::degraded_to_order", order)?;
        let ofs = (1u64 << order_shift(order)) - 1;
        let mask = !ofs;
        let (add_begin, add_end) = if keep_partial { (0, ofs) } else { (ofs, 0) };

        let mut out = RangeSet::with_capacity(self.nranges());
        for iv in self.ranges.ranges() {
            let a = (iv.start + add_begin) & mask;
            let b = (iv.end + add_end) & mask;
            if b > a {
                out.append(a, b)?;
            }
        }
        Ok(Self { ranges: out })
    }

    /// Pixel indices at `order` touched by (`keep_partial`) or fully inside
    /// the region.
    pub fn to_order_ranges(&self, order: u8, keep_partial: bool) -> RegionResult<RangeSet> {
        let shift = order_shift(order.min(MAX_ORDER));
        let degraded = self.degraded_to_order(order, keep_partial)?;
        let mut out = RangeSet::with_capacity(degraded.nranges());
        for iv in degraded.ranges.ranges() {
            out.append(iv.start >> shift, iv.end >> shift)?;
        }
        Ok(out)
    }

    /// The rest of the sphere.
    pub fn complement(&self) -> Self {
        Self {
            ranges: self.ranges.complement_within(0, NPIX_MAX_ORDER),
        }
    }

    pub fn union(&self, other: &PixelRangeSet) -> Self {
        Self {
            ranges: self.ranges.union(&other.ranges),
        }
    }

    pub fn intersection(&self, other: &PixelRangeSet) -> Self {
        Self {
            ranges: self.ranges.intersection(&other.ranges),
        }
    }

    pub fn difference(&self, other: &PixelRangeSet) -> Self {
        Self {
            ranges: self.ranges.difference(&other.ranges),
        }
    }

    /// Returns `true` if `other` lies entirely inside this region.
    pub fn contains_all(&self, other: &PixelRangeSet) -> bool {
        self.ranges.contains_all(&other.ranges)
    }

    pub fn overlaps(&self, other: &PixelRangeSet) -> bool {
        self.ranges.overlaps(&other.ranges)
    }

    pub fn to_compressed(&self) -> Vec<u8> {
        self.ranges.to_compressed()
    }

    pub fn from_compressed(data: &[u8]) -> RegionResult<Self> {
        Self::from_range_set(RangeSet::from_compressed(data)?)
    }
}

impl TryFrom<RangeSet> for PixelRangeSet {
    type Error = RegionError;

    fn try_from(ranges: RangeSet) -> RegionResult<Self> {
        Self::from_range_set(ranges)
    }
}

impl From<PixelRangeSet> for RangeSet {
    fn from(set: PixelRangeSet) -> Self {
        set.ranges
    }
}

impl fmt::Display for PixelRangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.ranges, f)
    }
}
