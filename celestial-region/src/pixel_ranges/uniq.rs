//! Mixed-order cell lists in the NUNIQ encoding.
//!
//! A pixel `p` at order `o` has the unique identifier `4·4^o + p`, so one
//! `u64` carries both order and index and identifiers of coarser cells sort
//! before finer ones.

use super::{order_shift, PixelRangeSet};
use crate::constants::MAX_ORDER;
use crate::error::{RegionError, RegionResult};

/// Unique identifier of pixel `pix` at `order`.
#[inline]
pub fn uniq_id(order: u8, pix: u64) -> u64 {
    (4u64 << (2 * u32::from(order))) + pix
}

/// Splits a unique identifier into `(order, pixel)`.
pub fn split_uniq_id(uniq: u64) -> RegionResult<(u8, u64)> {
    if uniq < 4 {
        return Err(RegionError::invalid_argument(
            "split_uniq_id",
            &format!("{} is not a valid unique pixel id", uniq),
        ));
    }
    let order = (63 - uniq.leading_zeros() - 2) / 2;
    if order > u32::from(MAX_ORDER) {
        return Err(RegionError::invalid_argument(
            "split_uniq_id",
            &format!("{} encodes order {} above {}", uniq, order, MAX_ORDER),
        ));
    }
    let order = order as u8;
    Ok((order, uniq - (4u64 << (2 * u32::from(order)))))
}

impl PixelRangeSet {
    /// Decomposes the region into the fewest aligned cells, as
    /// `(order, pixel)` pairs in ascending range order.
    pub fn cells(&self) -> Vec<(u8, u64)> {
        let mut cells = Vec::new();
        for iv in self.ranges.ranges() {
            let (mut a, b) = (iv.start, iv.end);
            while a < b {
                // coarsest cell starting at `a` that still fits below `b`
                let mut order = 0u8;
                loop {
                    let shift = order_shift(order);
                    let size = 1u64 << shift;
                    if a & (size - 1) == 0 && a + size <= b {
                        cells.push((order, a >> shift));
                        a += size;
                        break;
                    }
                    order += 1;
                }
            }
        }
        cells
    }

    /// The region as sorted NUNIQ identifiers.
    pub fn to_uniq(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self
            .cells()
            .into_iter()
            .map(|(order, pix)| uniq_id(order, pix))
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Builds a region from NUNIQ identifiers in any order.
    pub fn from_uniq(ids: &[u64]) -> RegionResult<Self> {
        let mut set = Self::new();
        for &id in ids {
            let (order, pix) = split_uniq_id(id)?;
            set.add_pixel(order, pix)?;
        }
        Ok(set)
    }
}
