//! HEALPix range-set algebra and sky geometry predicates.
//!
//! Sky regions are represented as sorted, disjoint ranges of nested HEALPix
//! pixel indices at order 29, the finest resolution. At that order any
//! coarser pixel is one contiguous range, so union, intersection and
//! complement of regions reduce to merging integer intervals.
//!
//! On top of that sits a small geometry algebra: points, circles, polygons
//! and pixel regions, with area, centroid, complement, rasterization and
//! pairwise containment and intersection tests.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`range_set`] | [`RangeSet`] of half-open `u64` intervals with a cost-adaptive merge |
//! | [`pixel_ranges`] | [`PixelRangeSet`]: order-29 pixel regions, degrade, NUNIQ cells |
//! | [`pixel`] | Angle, pixel and vector conversions and inclusive disc / polygon coverage |
//! | [`sphere`] | Spherical caps and loops: area, centroid, point-in-loop, edge crossing |
//! | [`geometry`] | [`Geometry`] sum type and its text form |
//! | [`predicate`] | [`contains`](predicate::contains) and [`intersects`](predicate::intersects) |
//! | [`aggregate`] | [`RegionAccumulator`] union / intersection folds |
//! | [`codec`] | Compact binary form of range boundaries |
//!
//! # Quick Start
//!
//! ```
//! use celestial_region::{predicate, Geometry, RasterConfig};
//!
//! let field = Geometry::circle(83.633, -5.375, 0.5).unwrap();
//! let region = field.to_region(10).unwrap();
//! assert!(region.area() >= field.area());
//!
//! let star = Geometry::point(83.7, -5.4).unwrap();
//! assert!(predicate::contains(&star, &region, &RasterConfig::default()).unwrap());
//! ```
//!
//! # Features
//!
//! - **`serde`**: Serialize range sets, regions, geometries and settings.
//! - **`parallel`**: `aggregate::fold_regions_par` via rayon.
//! - **`tracing`**: Debug and trace events from rasterization and merging.
//! - **`cli`**: The `sky-region` binary.

pub mod aggregate;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod log;
pub mod pixel;
pub mod pixel_ranges;
pub mod predicate;
pub mod range_set;
pub mod sphere;
pub mod vector;

pub use aggregate::{
    AggregateOptions, IntersectionFold, RegionAccumulator, RegionFold, RegionIntersection,
    RegionUnion, UnionFold,
};
pub use config::RasterConfig;
pub use constants::{DEFAULT_ORDER, MAX_ORDER, NPIX_MAX_ORDER, UNIT_PIXEL_AREA};
pub use error::{RegionError, RegionResult};
pub use geometry::{Geometry, GeometryKind, SkyPolygon};
pub use pixel_ranges::PixelRangeSet;
pub use range_set::{MergeStrategy, RangeSet, SetOperation};
pub use vector::Vector3;
