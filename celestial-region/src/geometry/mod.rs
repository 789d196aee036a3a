//! Sky geometries: points, circles, polygons and pixel regions.
//!
//! [`Geometry`] is a closed set of shapes sharing one set of operations:
//!
//! | Operation | Point | Circle | Polygon | Region |
//! |-----------|-------|--------|---------|--------|
//! | [`area`](Geometry::area) | 0 | cap area | loop area | pixel count × unit area |
//! | [`centroid`](Geometry::centroid) | unsupported | center | loop centroid | unsupported |
//! | [`complement`](Geometry::complement) | unsupported | antipodal circle | reversed vertices | remaining pixels |
//! | [`to_region`](Geometry::to_region) | one pixel | inclusive disc | inclusive polygon | itself |
//!
//! Coordinates are degrees; areas are steradians. Pairwise tests live in
//! [`predicate`](crate::predicate).
//!
//! ```
//! use celestial_region::Geometry;
//!
//! let circle = Geometry::circle(10.0, 20.0, 30.0).unwrap();
//! let flipped = circle.complement().unwrap();
//! assert_eq!(flipped, Geometry::circle(190.0, -20.0, 150.0).unwrap());
//! ```

mod parse;
mod polygon;

pub use polygon::SkyPolygon;

use crate::config::RasterConfig;
use crate::constants::{DEG_TO_RAD, MAX_ORDER};
use crate::error::{RegionError, RegionResult};
use crate::log::debug;
use crate::pixel::{self, check_radec, wrap_ra};
use crate::pixel_ranges::PixelRangeSet;
use crate::sphere;
use std::fmt;

/// Discriminant of a [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    Circle,
    Polygon,
    Region,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeometryKind::Point => "point",
            GeometryKind::Circle => "circle",
            GeometryKind::Polygon => "polygon",
            GeometryKind::Region => "region",
        };
        f.write_str(name)
    }
}

/// A shape on the celestial sphere.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A single direction.
    Point { ra: f64, dec: f64 },
    /// All points within `radius` degrees of the center.
    Circle { ra: f64, dec: f64, radius: f64 },
    Polygon(SkyPolygon),
    /// Pixels at order 29.
    Region(PixelRangeSet),
}

impl Geometry {
    pub fn point(ra: f64, dec: f64) -> RegionResult<Self> {
        check_radec("Geometry::point", ra, dec)?;
        Ok(Geometry::Point { ra, dec })
    }

    /// A circle of `radius` degrees. Radii of 180 or more cover the sphere.
    pub fn circle(ra: f64, dec: f64, radius: f64) -> RegionResult<Self> {
        check_radec("Geometry::circle", ra, dec)?;
        if !radius.is_finite() {
            return Err(RegionError::invalid_argument(
                "Geometry::circle",
                &format!("non-finite radius {}", radius),
            ));
        }
        Ok(Geometry::Circle { ra, dec, radius })
    }

    /// A polygon from `(ra, dec)` vertices.
    pub fn polygon(vertices: Vec<(f64, f64)>) -> RegionResult<Self> {
        Ok(Geometry::Polygon(SkyPolygon::new(vertices)?))
    }

    /// A polygon from `[ra0, dec0, ra1, dec1, ...]`.
    pub fn polygon_from_flat(coords: &[f64]) -> RegionResult<Self> {
        Ok(Geometry::Polygon(SkyPolygon::from_flat(coords)?))
    }

    pub fn region(ranges: PixelRangeSet) -> Self {
        Geometry::Region(ranges)
    }

    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point { .. } => GeometryKind::Point,
            Geometry::Circle { .. } => GeometryKind::Circle,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::Region(_) => GeometryKind::Region,
        }
    }

    /// The pixel ranges of a region, `None` for other kinds.
    pub fn as_region(&self) -> Option<&PixelRangeSet> {
        match self {
            Geometry::Region(ranges) => Some(ranges),
            _ => None,
        }
    }

    /// Solid angle in steradians.
    pub fn area(&self) -> f64 {
        match self {
            Geometry::Point { .. } => 0.0,
            Geometry::Circle { radius, .. } => {
                sphere::cap_area(radius.clamp(0.0, 180.0) * DEG_TO_RAD)
            }
            Geometry::Polygon(poly) => poly.area(),
            Geometry::Region(ranges) => ranges.area(),
        }
    }

    /// Center of mass of the shape as `(ra, dec)` in degrees.
    ///
    /// # Errors
    /// [`RegionError::Unsupported`] for points and regions;
    /// [`RegionError::InvalidArgument`] for a polygon whose centroid is
    /// undefined.
    pub fn centroid(&self) -> RegionResult<(f64, f64)> {
        match self {
            Geometry::Circle { ra, dec, .. } => Ok((*ra, *dec)),
            Geometry::Polygon(poly) => sphere::loop_centroid(poly.vectors())
                .map(|c| c.to_radec_deg())
                .ok_or_else(|| {
                    RegionError::invalid_argument(
                        "Geometry::centroid",
                        "polygon has no defined centroid",
                    )
                }),
            Geometry::Point { .. } | Geometry::Region(_) => Err(RegionError::unsupported(
                "centroid",
                &self.kind().to_string(),
            )),
        }
    }

    /// The rest of the sphere.
    ///
    /// # Errors
    /// [`RegionError::Unsupported`] for points; [`RegionError::InvalidArgument`]
    /// for a circle wider than 180 degrees.
    pub fn complement(&self) -> RegionResult<Geometry> {
        match self {
            Geometry::Point { .. } => Err(RegionError::unsupported(
                "complement",
                &self.kind().to_string(),
            )),
            Geometry::Circle { ra, dec, radius } => {
                let flipped = 180.0 - radius;
                if flipped < 0.0 {
                    return Err(RegionError::invalid_argument(
                        "Geometry::complement",
                        &format!("circle radius {} exceeds 180", radius),
                    ));
                }
                Ok(Geometry::Circle {
                    ra: wrap_ra(ra + 180.0),
                    dec: -dec,
                    radius: flipped,
                })
            }
            Geometry::Polygon(poly) => Ok(Geometry::Polygon(poly.reversed())),
            Geometry::Region(ranges) => Ok(Geometry::Region(ranges.complement())),
        }
    }

    /// Rasterizes the shape at `order` with default settings.
    pub fn to_region(&self, order: u8) -> RegionResult<Geometry> {
        self.to_region_with(&RasterConfig::at_order(order))
    }

    /// Rasterizes the shape with explicit settings.
    pub fn to_region_with(&self, config: &RasterConfig) -> RegionResult<Geometry> {
        Ok(Geometry::Region(self.rasterize(config)?))
    }

    /// Pixel ranges covering the shape.
    ///
    /// Circles and polygons get an inclusive coverage: every pixel that
    /// overlaps the shape is present, plus possibly a few that only come
    /// close. Concave polygons are not supported by the coverage and may be
    /// covered incorrectly.
    pub fn rasterize(&self, config: &RasterConfig) -> RegionResult<PixelRangeSet> {
        config.validate()?;
        let order = config.order;
        match self {
            Geometry::Point { ra, dec } => {
                PixelRangeSet::from_pixel(order, pixel::ang2pix(order, *ra, *dec)?)
            }
            Geometry::Circle { ra, dec, radius } => {
                if *radius >= 180.0 {
                    return Ok(PixelRangeSet::full_sky());
                }
                if *radius <= 0.0 {
                    return PixelRangeSet::from_pixel(order, pixel::ang2pix(order, *ra, *dec)?);
                }
                let pixels = pixel::query_disc_inclusive(
                    order,
                    *ra,
                    *dec,
                    *radius,
                    config.effective_delta_depth(),
                )?;
                let ranges = PixelRangeSet::from_order_ranges(order, &pixels)?;
                debug!(order, radius, nranges = ranges.nranges(), "rasterized circle");
                Ok(ranges)
            }
            Geometry::Polygon(poly) => rasterize_polygon(poly, config),
            Geometry::Region(ranges) => Ok(ranges.clone()),
        }
    }

    /// Rasterizes at order 29 for points and at `config.order` otherwise.
    pub(crate) fn rasterize_for_comparison(&self, config: &RasterConfig) -> RegionResult<PixelRangeSet> {
        match self {
            Geometry::Point { .. } => self.rasterize(&config.with_order(MAX_ORDER)),
            _ => self.rasterize(config),
        }
    }
}

fn rasterize_polygon(poly: &SkyPolygon, config: &RasterConfig) -> RegionResult<PixelRangeSet> {
    let order = config.order;
    if !poly.encloses_large_side() {
        let pixels = pixel::query_polygon_inclusive(order, poly.vertices(), config.exact_polygon)?;
        let ranges = PixelRangeSet::from_order_ranges(order, &pixels)?;
        debug!(order, nranges = ranges.nranges(), "rasterized polygon");
        return Ok(ranges);
    }

    // The coverage library always fills the small side. Every pixel not
    // wholly inside that side touches this one.
    let small = poly.reversed();
    let pixels = pixel::query_polygon_interior(order, small.vertices(), config.exact_polygon)?;
    let ranges = PixelRangeSet::from_order_ranges(order, &pixels)?.complement();
    debug!(order, nranges = ranges.nranges(), "rasterized large-side polygon");
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FOUR_PI, TWOPI};
    use crate::range_set::RangeSet;
    use approx::assert_abs_diff_eq;

    fn square() -> Geometry {
        Geometry::polygon_from_flat(&[10.0, 10.0, 20.0, 10.0, 20.0, 20.0, 10.0, 20.0]).unwrap()
    }

    #[test]
    fn test_constructors_validate() {
        assert!(Geometry::point(10.0, 91.0).is_err());
        assert!(Geometry::point(f64::NAN, 0.0).is_err());
        assert!(Geometry::circle(0.0, 0.0, f64::INFINITY).is_err());
        assert!(Geometry::circle(0.0, 0.0, 200.0).is_ok());
        assert!(Geometry::polygon_from_flat(&[0.0, 0.0, 1.0, 1.0]).is_err());
    }

    #[test]
    fn test_kind() {
        assert_eq!(Geometry::point(0.0, 0.0).unwrap().kind(), GeometryKind::Point);
        assert_eq!(square().kind(), GeometryKind::Polygon);
        assert_eq!(GeometryKind::Region.to_string(), "region");
    }

    #[test]
    fn test_area() {
        assert_eq!(Geometry::point(1.0, 2.0).unwrap().area(), 0.0);
        assert_abs_diff_eq!(
            Geometry::circle(0.0, 0.0, 90.0).unwrap().area(),
            TWOPI,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            Geometry::circle(0.0, 0.0, 180.0).unwrap().area(),
            FOUR_PI,
            epsilon = 1e-12
        );
        assert!(square().area() > 0.0);
        assert_abs_diff_eq!(
            Geometry::region(PixelRangeSet::full_sky()).area(),
            FOUR_PI,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_centroid() {
        let (ra, dec) = Geometry::circle(33.0, -5.0, 1.0).unwrap().centroid().unwrap();
        assert_eq!((ra, dec), (33.0, -5.0));

        let (ra, dec) = square().centroid().unwrap();
        assert_abs_diff_eq!(ra, 15.0, epsilon = 0.1);
        assert_abs_diff_eq!(dec, 15.0, epsilon = 0.3);

        assert!(matches!(
            Geometry::point(0.0, 0.0).unwrap().centroid(),
            Err(RegionError::Unsupported { .. })
        ));
        assert!(matches!(
            Geometry::region(PixelRangeSet::full_sky()).centroid(),
            Err(RegionError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_circle_complement() {
        let c = Geometry::circle(10.0, 20.0, 30.0).unwrap();
        assert_eq!(
            c.complement().unwrap(),
            Geometry::circle(190.0, -20.0, 150.0).unwrap()
        );
        assert_eq!(c.complement().unwrap().complement().unwrap(), c);
        assert!(Geometry::circle(0.0, 0.0, 181.0).unwrap().complement().is_err());
        assert_abs_diff_eq!(
            c.area() + c.complement().unwrap().area(),
            FOUR_PI,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_polygon_complement() {
        let poly = square();
        let comp = poly.complement().unwrap();
        let expected =
            Geometry::polygon_from_flat(&[10.0, 20.0, 20.0, 20.0, 20.0, 10.0, 10.0, 10.0]).unwrap();
        assert_eq!(comp, expected);
        assert_abs_diff_eq!(poly.area() + comp.area(), FOUR_PI, epsilon = 1e-9);
    }

    #[test]
    fn test_point_complement_unsupported() {
        let err = Geometry::point(0.0, 0.0).unwrap().complement().unwrap_err();
        assert_eq!(err.to_string(), "complement is not supported for point");
    }

    #[test]
    fn test_region_complement() {
        let r = Geometry::region(PixelRangeSet::from_pixel(2, 7).unwrap());
        let comp = r.complement().unwrap();
        assert_eq!(comp.complement().unwrap(), r);
        assert_abs_diff_eq!(r.area() + comp.area(), FOUR_PI, epsilon = 1e-12);
    }

    #[test]
    fn test_point_to_region() {
        let p = Geometry::point(-4.0, 0.0).unwrap();
        let region = p.to_region(3).unwrap();
        let pix = pixel::ang2pix(3, -4.0, 0.0).unwrap();
        assert_eq!(region, Geometry::region(PixelRangeSet::from_pixel(3, pix).unwrap()));
    }

    #[test]
    fn test_circle_to_region_is_superset() {
        let order = 8;
        let c = Geometry::circle(120.0, -30.0, 3.0).unwrap();
        let ranges = c.rasterize(&RasterConfig::at_order(order)).unwrap();
        assert!(ranges.area() >= c.area());
        for &(ra, dec) in &[(120.0, -30.0), (122.5, -30.0), (120.0, -27.2)] {
            let pix = pixel::ang2pix(order, ra, dec).unwrap();
            assert!(ranges.contains_pixel(order, pix).unwrap());
        }
        let far = pixel::ang2pix(order, 120.0, -40.0).unwrap();
        assert!(!ranges.overlaps_pixel(order, far).unwrap());
    }

    #[test]
    fn test_degenerate_circles() {
        let config = RasterConfig::at_order(5);
        let full = Geometry::circle(0.0, 0.0, 180.0).unwrap().rasterize(&config).unwrap();
        assert_eq!(full, PixelRangeSet::full_sky());
        let dot = Geometry::circle(0.0, 0.0, 0.0).unwrap().rasterize(&config).unwrap();
        assert_eq!(dot, Geometry::point(0.0, 0.0).unwrap().rasterize(&config).unwrap());
    }

    #[test]
    fn test_polygon_to_region() {
        let order = 7;
        let ranges = square().rasterize(&RasterConfig::at_order(order)).unwrap();
        assert!(ranges.area() >= square().area());
        let inside = pixel::ang2pix(order, 15.0, 15.0).unwrap();
        let outside = pixel::ang2pix(order, 40.0, 15.0).unwrap();
        assert!(ranges.contains_pixel(order, inside).unwrap());
        assert!(!ranges.overlaps_pixel(order, outside).unwrap());
    }

    #[test]
    fn test_large_side_polygon_to_region() {
        let order = 6;
        let config = RasterConfig::at_order(order);
        let comp = square().complement().unwrap();
        let ranges = comp.rasterize(&config).unwrap();
        let inside = pixel::ang2pix(order, 15.0, 15.0).unwrap();
        let outside = pixel::ang2pix(order, 200.0, -40.0).unwrap();
        assert!(!ranges.overlaps_pixel(order, inside).unwrap());
        assert!(ranges.contains_pixel(order, outside).unwrap());
        assert!(ranges.area() >= comp.area());
    }

    #[test]
    fn test_large_side_polygon_keeps_edge_pixels() {
        let order = 7;
        let comp = square().complement().unwrap();
        let ranges = comp.rasterize(&RasterConfig::at_order(order)).unwrap();
        let Geometry::Polygon(small) = square() else {
            unreachable!()
        };
        let touched = pixel::query_polygon_inclusive(order, small.vertices(), true).unwrap();
        let interior = pixel::query_polygon_interior(order, small.vertices(), true).unwrap();

        let at_order = ranges.to_order_ranges(order, false).unwrap();
        assert_eq!(at_order.union(&touched), RangeSet::from_range(0, pixel::npix(order)));
        assert_eq!(at_order.intersection(&touched), touched.difference(&interior));

        for (ra, dec) in [(10.0, 15.0), (20.0, 12.0), (10.0, 19.0)] {
            let edge = pixel::ang2pix(order, ra, dec).unwrap();
            assert!(ranges.contains_pixel(order, edge).unwrap(), "({}, {})", ra, dec);
        }
    }

    #[test]
    fn test_region_to_region_is_identity() {
        let r = Geometry::region(PixelRangeSet::from_pixel_range(4, 10, 20).unwrap());
        assert_eq!(r.to_region(2).unwrap(), r);
    }

    #[test]
    fn test_to_region_rejects_bad_order() {
        let p = Geometry::point(0.0, 0.0).unwrap();
        assert!(matches!(p.to_region(30), Err(RegionError::InvalidArgument { .. })));
    }
}
