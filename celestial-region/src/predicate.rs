//! Pairwise containment and intersection tests between geometries.
//!
//! Both predicates dispatch on the pair of [`GeometryKind`](crate::GeometryKind)s:
//!
//! - When either side is a region, both sides are rasterized and the test
//!   runs on the pixel ranges. Points are rasterized at order 29, circles
//!   and polygons at the configured order.
//! - Otherwise the test is done on the sphere with caps and loops.
//!
//! Circle and polygon tests combine a point-in-shape test with the distance
//! from a center to the polygon boundary. Polygon coverage and these
//! composites assume simple (non self-intersecting) polygons.

use crate::config::RasterConfig;
use crate::constants::DEG_TO_RAD;
use crate::error::{RegionError, RegionResult};
use crate::geometry::{Geometry, SkyPolygon};
use crate::log::trace;
use crate::pixel::{angular_separation_deg, wrap_ra};
use crate::sphere;
use crate::vector::Vector3;

/// Returns `true` if `outer` contains all of `inner`.
///
/// # Errors
///
/// [`RegionError::InvalidArgument`] if `outer` is a point, or when
/// rasterizing a region operand fails.
///
/// # Example
///
/// ```
/// use celestial_region::{predicate, Geometry, RasterConfig};
///
/// let star = Geometry::point(10.5, 20.2).unwrap();
/// let field = Geometry::circle(10.0, 20.0, 1.0).unwrap();
/// assert!(predicate::contains(&star, &field, &RasterConfig::default()).unwrap());
/// ```
pub fn contains(inner: &Geometry, outer: &Geometry, config: &RasterConfig) -> RegionResult<bool> {
    let result = match (inner, outer) {
        (_, Geometry::Point { .. }) => {
            return Err(RegionError::invalid_argument(
                "contains",
                &format!("a point cannot contain a {}", inner.kind()),
            ))
        }
        (Geometry::Region(_), _) | (_, Geometry::Region(_)) => {
            let inner_ranges = inner.rasterize_for_comparison(config)?;
            let outer_ranges = outer.rasterize_for_comparison(config)?;
            trace!(
                inner = %inner.kind(),
                outer = %outer.kind(),
                "contains on pixel ranges"
            );
            outer_ranges.contains_all(&inner_ranges)
        }
        (Geometry::Point { ra, dec }, Geometry::Circle { ra: cra, dec: cdec, radius }) => {
            angular_separation_deg(*ra, *dec, *cra, *cdec) <= *radius
        }
        (Geometry::Point { ra, dec }, Geometry::Polygon(poly)) => {
            poly.contains_point(&Vector3::from_radec_deg(*ra, *dec))
        }
        (
            Geometry::Circle { ra, dec, radius },
            Geometry::Circle { ra: ora, dec: odec, radius: oradius },
        ) => *oradius >= 180.0 || angular_separation_deg(*ra, *dec, *ora, *odec) + radius <= *oradius,
        (Geometry::Circle { ra, dec, radius }, Geometry::Polygon(poly)) => {
            polygon_contains_circle(poly, &Vector3::from_radec_deg(*ra, *dec), *radius)
        }
        (Geometry::Polygon(poly), Geometry::Circle { ra, dec, radius }) => {
            circle_contains_polygon(&Vector3::from_radec_deg(*ra, *dec), *radius, poly)
        }
        (Geometry::Polygon(p_in), Geometry::Polygon(p_out)) => polygon_contains_polygon(p_out, p_in),
    };
    Ok(result)
}

/// Returns `true` if `a` and `b` share at least one point.
///
/// The test is symmetric. Two points intersect only when they name the
/// same position: equal declinations and equal RA modulo 360, with RA
/// ignored at the poles.
///
/// # Errors
///
/// Propagates failures from rasterizing a region operand.
pub fn intersects(a: &Geometry, b: &Geometry, config: &RasterConfig) -> RegionResult<bool> {
    let result = match (a, b) {
        (Geometry::Region(_), _) | (_, Geometry::Region(_)) => {
            let a_ranges = a.rasterize_for_comparison(config)?;
            let b_ranges = b.rasterize_for_comparison(config)?;
            trace!(a = %a.kind(), b = %b.kind(), "intersects on pixel ranges");
            a_ranges.overlaps(&b_ranges)
        }
        (Geometry::Point { ra, dec }, Geometry::Point { ra: ra2, dec: dec2 }) => {
            same_position(*ra, *dec, *ra2, *dec2)
        }
        (Geometry::Point { ra, dec }, Geometry::Circle { ra: cra, dec: cdec, radius })
        | (Geometry::Circle { ra: cra, dec: cdec, radius }, Geometry::Point { ra, dec }) => {
            angular_separation_deg(*ra, *dec, *cra, *cdec) <= *radius
        }
        (Geometry::Point { ra, dec }, Geometry::Polygon(poly))
        | (Geometry::Polygon(poly), Geometry::Point { ra, dec }) => {
            poly.contains_point(&Vector3::from_radec_deg(*ra, *dec))
        }
        (
            Geometry::Circle { ra, dec, radius },
            Geometry::Circle { ra: ra2, dec: dec2, radius: radius2 },
        ) => {
            *radius >= 0.0
                && *radius2 >= 0.0
                && angular_separation_deg(*ra, *dec, *ra2, *dec2) <= radius + radius2
        }
        (Geometry::Circle { ra, dec, radius }, Geometry::Polygon(poly))
        | (Geometry::Polygon(poly), Geometry::Circle { ra, dec, radius }) => {
            circle_intersects_polygon(&Vector3::from_radec_deg(*ra, *dec), *radius, poly)
        }
        (Geometry::Polygon(p), Geometry::Polygon(q)) => polygons_intersect(p, q),
    };
    Ok(result)
}

/// Exact coordinate equality with RA taken modulo 360 and ignored at the
/// poles.
fn same_position(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> bool {
    dec1 == dec2 && (dec1.abs() == 90.0 || wrap_ra(ra1) == wrap_ra(ra2))
}

/// The circle lies inside when its center does and no edge comes closer
/// than the radius.
fn polygon_contains_circle(poly: &SkyPolygon, center: &Vector3, radius_deg: f64) -> bool {
    poly.contains_point(center)
        && sphere::distance_to_loop_boundary(poly.vectors(), center) >= radius_deg * DEG_TO_RAD
}

/// The polygon lies inside the cap when it stays clear of the opposite cap
/// around the antipode.
fn circle_contains_polygon(center: &Vector3, radius_deg: f64, poly: &SkyPolygon) -> bool {
    if radius_deg >= 180.0 {
        return true;
    }
    let antipode = -*center;
    let clearance = (180.0 - radius_deg) * DEG_TO_RAD;
    !poly.contains_point(&antipode)
        && sphere::distance_to_loop_boundary(poly.vectors(), &antipode) >= clearance
}

fn circle_intersects_polygon(center: &Vector3, radius_deg: f64, poly: &SkyPolygon) -> bool {
    if radius_deg < 0.0 {
        return false;
    }
    let radius = radius_deg * DEG_TO_RAD;
    poly.contains_point(center)
        || poly
            .vectors()
            .iter()
            .any(|v| sphere::cap_contains(center, radius, v))
        || sphere::distance_to_loop_boundary(poly.vectors(), center) <= radius
}

/// All inner vertices inside, no crossing edges and no outer vertex
/// poking into the inner polygon.
fn polygon_contains_polygon(outer: &SkyPolygon, inner: &SkyPolygon) -> bool {
    inner.vectors().iter().all(|v| outer.contains_point(v))
        && !sphere::loops_cross(outer.vectors(), inner.vectors())
        && !outer.vectors().iter().any(|v| inner.contains_point(v))
}

fn polygons_intersect(p: &SkyPolygon, q: &SkyPolygon) -> bool {
    p.vectors().iter().any(|v| q.contains_point(v))
        || q.vectors().iter().any(|v| p.contains_point(v))
        || sphere::loops_cross(p.vectors(), q.vectors())
}
