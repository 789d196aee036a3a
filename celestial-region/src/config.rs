//! Rasterization settings.
//!
//! Controls how circles and polygons are turned into pixel regions when a
//! predicate or `to_region` call needs one.

use crate::constants::{DEFAULT_ORDER, MAX_ORDER};
use crate::error::{RegionError, RegionResult};

/// Settings for converting shapes into pixel regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RasterConfig {
    /// HEALPix order (0-29) circles and polygons are rasterized at.
    /// Default: 10 (pixels of about 3.4 arcmin)
    pub order: u8,

    /// Extra depth used to refine the inclusive disc coverage before it is
    /// returned at `order`. Higher values drop more pixels that only touch
    /// the bounding box of the cone.
    /// Default: 2
    pub inclusive_delta_depth: u8,

    /// Use the exact polygon coverage (edges as great arcs) instead of the
    /// faster approximate one.
    /// Default: true
    pub exact_polygon: bool,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            inclusive_delta_depth: 2,
            exact_polygon: true,
        }
    }
}

impl RasterConfig {
    /// Default settings at the given order.
    pub fn at_order(order: u8) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn with_order(mut self, order: u8) -> Self {
        self.order = order;
        self
    }

    pub fn with_inclusive_delta_depth(mut self, delta_depth: u8) -> Self {
        self.inclusive_delta_depth = delta_depth;
        self
    }

    pub fn with_exact_polygon(mut self, exact: bool) -> Self {
        self.exact_polygon = exact;
        self
    }

    /// Checks that the order and the refinement depth are at most 29.
    ///
    /// The depth is clamped at use so that `order + depth` never passes 29.
    pub fn validate(&self) -> RegionResult<()> {
        if self.order > MAX_ORDER {
            return Err(RegionError::invalid_argument(
                "RasterConfig",
                &format!("order {} exceeds {}", self.order, MAX_ORDER),
            ));
        }
        if self.inclusive_delta_depth > MAX_ORDER {
            return Err(RegionError::invalid_argument(
                "RasterConfig",
                &format!(
                    "delta depth {} exceeds {}",
                    self.inclusive_delta_depth, MAX_ORDER
                ),
            ));
        }
        Ok(())
    }

    /// Refinement depth clamped so that `order + depth <= 29`.
    pub(crate) fn effective_delta_depth(&self) -> u8 {
        self.inclusive_delta_depth.min(MAX_ORDER - self.order.min(MAX_ORDER))
    }
}
