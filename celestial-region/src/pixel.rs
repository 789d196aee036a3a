//! HEALPix nested-scheme pixel operations.
//!
//! Conversions between sky coordinates, unit vectors and pixel indices, plus
//! inclusive disc and polygon coverage. The pixelization itself comes from
//! the `cdshealpix` crate; this module validates inputs, converts degrees to
//! radians and turns library panics into [`RegionError::ExternalLibrary`].
//!
//! All angles at this boundary are in degrees. Coverage results are
//! [`RangeSet`]s of pixel indices at the requested order; see
//! [`PixelRangeSet`](crate::PixelRangeSet) for the order-29 form.

use crate::constants::{DEG_TO_RAD, FOUR_PI, MAX_ORDER, RAD_TO_DEG};
use crate::error::{RegionError, RegionResult};
use crate::log::trace;
use crate::range_set::RangeSet;
use crate::vector::Vector3;
use cdshealpix::nested::{self, bmoc::BMOC};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Number of pixels at `order` (`12 · 4^order`).
#[inline]
pub fn npix(order: u8) -> u64 {
    12u64 << (2 * u32::from(order))
}

/// Solid angle of one pixel at `order`, in steradians.
#[inline]
pub fn pixel_area(order: u8) -> f64 {
    FOUR_PI / npix(order) as f64
}

pub(crate) fn check_order(context: &str, order: u8) -> RegionResult<()> {
    if order > MAX_ORDER {
        return Err(RegionError::invalid_argument(
            context,
            &format!("order {} exceeds {}", order, MAX_ORDER),
        ));
    }
    Ok(())
}

pub(crate) fn check_pixel(context: &str, order: u8, pix: u64) -> RegionResult<()> {
    check_order(context, order)?;
    if pix >= npix(order) {
        return Err(RegionError::invalid_argument(
            context,
            &format!("pixel {} out of range at order {}", pix, order),
        ));
    }
    Ok(())
}

pub(crate) fn check_radec(context: &str, ra_deg: f64, dec_deg: f64) -> RegionResult<()> {
    if !ra_deg.is_finite() || !dec_deg.is_finite() {
        return Err(RegionError::invalid_argument(
            context,
            &format!("non-finite coordinate ({}, {})", ra_deg, dec_deg),
        ));
    }
    if !(-90.0..=90.0).contains(&dec_deg) {
        return Err(RegionError::invalid_argument(
            context,
            &format!("declination {} outside [-90, 90]", dec_deg),
        ));
    }
    Ok(())
}

/// Runs a pixel-library call, converting a panic into an error.
fn guarded<T>(function: &str, f: impl FnOnce() -> T) -> RegionResult<T> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "pixel library panicked".to_string());
        RegionError::external_library(function, &message)
    })
}

/// Wraps RA into `[0, 360)`.
pub(crate) fn wrap_ra(ra_deg: f64) -> f64 {
    let ra = ra_deg % 360.0;
    if ra < 0.0 {
        ra + 360.0
    } else {
        ra
    }
}

/// Nested pixel index containing `(ra, dec)` at `order`.
pub fn ang2pix(order: u8, ra_deg: f64, dec_deg: f64) -> RegionResult<u64> {
    check_order("ang2pix", order)?;
    check_radec("ang2pix", ra_deg, dec_deg)?;
    let lon = wrap_ra(ra_deg) * DEG_TO_RAD;
    let lat = dec_deg * DEG_TO_RAD;
    guarded("nested::hash", || nested::hash(order, lon, lat))
}

/// Center of pixel `pix` at `order`, as `(ra, dec)` in degrees.
pub fn pix2ang(order: u8, pix: u64) -> RegionResult<(f64, f64)> {
    check_pixel("pix2ang", order, pix)?;
    let (lon, lat) = guarded("nested::center", || nested::center(order, pix))?;
    Ok((wrap_ra(lon * RAD_TO_DEG), lat * RAD_TO_DEG))
}

/// Unit vector to the center of pixel `pix` at `order`.
pub fn pix2vec(order: u8, pix: u64) -> RegionResult<Vector3> {
    let (ra, dec) = pix2ang(order, pix)?;
    Ok(Vector3::from_radec_deg(ra, dec))
}

/// Pixel containing the direction `v`; `v` need not be normalized.
pub fn vec2pix(order: u8, v: &Vector3) -> RegionResult<u64> {
    if v.magnitude_squared() == 0.0 || !v.magnitude_squared().is_finite() {
        return Err(RegionError::invalid_argument(
            "vec2pix",
            "direction must be finite and non-zero",
        ));
    }
    let (ra, dec) = v.to_radec_deg();
    ang2pix(order, ra, dec.clamp(-90.0, 90.0))
}

/// Pixels at `order` overlapping the disc of `radius_deg` around `(ra, dec)`.
///
/// The coverage is computed at `order + delta_depth` and degraded, which
/// drops most of the pixels that only touch the bounding box of the disc.
/// The result may contain pixels that miss the disc but never misses one
/// that overlaps it.
pub fn query_disc_inclusive(
    order: u8,
    ra_deg: f64,
    dec_deg: f64,
    radius_deg: f64,
    delta_depth: u8,
) -> RegionResult<RangeSet> {
    check_order("query_disc_inclusive", order)?;
    check_radec("query_disc_inclusive", ra_deg, dec_deg)?;
    if !radius_deg.is_finite() || radius_deg <= 0.0 {
        return Err(RegionError::invalid_argument(
            "query_disc_inclusive",
            &format!("radius {} must be positive", radius_deg),
        ));
    }
    let delta_depth = delta_depth.min(MAX_ORDER - order);
    let lon = wrap_ra(ra_deg) * DEG_TO_RAD;
    let lat = dec_deg * DEG_TO_RAD;
    let radius = radius_deg * DEG_TO_RAD;
    let bmoc = guarded("nested::cone_coverage_approx_custom", || {
        nested::cone_coverage_approx_custom(order, delta_depth, lon, lat, radius)
    })?;
    let ranges = coverage_ranges(&bmoc)?;
    trace!(
        order,
        radius_deg,
        nranges = ranges.nranges(),
        "disc coverage"
    );
    Ok(ranges)
}

/// Pixels at `order` overlapping the polygon with the given `(ra, dec)`
/// vertices in degrees.
///
/// With `exact` the edges are treated as great-circle arcs; otherwise the
/// library's faster approximation is used. Concave polygons are passed
/// through unchanged and may be covered incorrectly.
pub fn query_polygon_inclusive(
    order: u8,
    vertices: &[(f64, f64)],
    exact: bool,
) -> RegionResult<RangeSet> {
    let bmoc = polygon_coverage("query_polygon_inclusive", order, vertices, exact)?;
    let ranges = coverage_ranges(&bmoc)?;
    trace!(
        order,
        nvertices = vertices.len(),
        nranges = ranges.nranges(),
        "polygon coverage"
    );
    Ok(ranges)
}

/// Pixels at `order` lying entirely inside the polygon.
///
/// This is the inclusive coverage minus every pixel an edge passes through.
pub fn query_polygon_interior(
    order: u8,
    vertices: &[(f64, f64)],
    exact: bool,
) -> RegionResult<RangeSet> {
    let bmoc = polygon_coverage("query_polygon_interior", order, vertices, exact)?;
    let depth_max = bmoc.get_depth_max();
    let mut ranges = RangeSet::new();
    for cell in &bmoc {
        if !cell.is_full {
            continue;
        }
        let shift = 2 * u32::from(depth_max - cell.depth);
        ranges.append(cell.hash << shift, (cell.hash + 1) << shift)?;
    }
    trace!(
        order,
        nvertices = vertices.len(),
        nranges = ranges.nranges(),
        "polygon interior"
    );
    Ok(ranges)
}

fn polygon_coverage(
    context: &str,
    order: u8,
    vertices: &[(f64, f64)],
    exact: bool,
) -> RegionResult<BMOC> {
    check_order(context, order)?;
    if vertices.len() < 3 {
        return Err(RegionError::invalid_argument(
            context,
            &format!("polygon needs 3 vertices, got {}", vertices.len()),
        ));
    }
    let mut radians = Vec::with_capacity(vertices.len());
    for &(ra, dec) in vertices {
        check_radec(context, ra, dec)?;
        radians.push((wrap_ra(ra) * DEG_TO_RAD, dec * DEG_TO_RAD));
    }
    guarded("nested::polygon_coverage", || {
        nested::polygon_coverage(order, &radians, exact)
    })
}

/// Coverage cells as ranges at the coverage's own deepest order.
fn coverage_ranges(bmoc: &BMOC) -> RegionResult<RangeSet> {
    let cells = bmoc.to_ranges();
    let mut ranges = RangeSet::with_capacity(cells.len());
    for cell in cells.iter() {
        ranges.append(cell.start, cell.end)?;
    }
    Ok(ranges)
}

/// Angular distance between two points in degrees (Vincenty formula).
///
/// Accurate at all angular separations.
pub fn angular_separation_deg(ra1_deg: f64, dec1_deg: f64, ra2_deg: f64, dec2_deg: f64) -> f64 {
    let (d1_sin, d1_cos) = libm::sincos(dec1_deg * DEG_TO_RAD);
    let (d2_sin, d2_cos) = libm::sincos(dec2_deg * DEG_TO_RAD);
    let delta_lon = (ra2_deg - ra1_deg) * DEG_TO_RAD;
    let (sin_dl, cos_dl) = libm::sincos(delta_lon);

    let num = libm::sqrt(
        (d2_cos * sin_dl).powi(2) + (d1_cos * d2_sin - d1_sin * d2_cos * cos_dl).powi(2),
    );
    let den = d1_sin * d2_sin + d1_cos * d2_cos * cos_dl;
    libm::atan2(num, den) * RAD_TO_DEG
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_npix_and_area() {
        assert_eq!(npix(0), 12);
        assert_eq!(npix(1), 48);
        assert_eq!(npix(29), crate::constants::NPIX_MAX_ORDER);
        assert_abs_diff_eq!(pixel_area(0) * 12.0, FOUR_PI, epsilon = 1e-12);
    }

    #[test]
    fn test_base_pixel_centers() {
        let (ra, dec) = pix2ang(0, 4).unwrap();
        assert_abs_diff_eq!(ra, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(dec, 0.0, epsilon = 1e-9);

        let (ra, dec) = pix2ang(0, 0).unwrap();
        assert_abs_diff_eq!(ra, 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(dec, libm::asin(2.0 / 3.0) * RAD_TO_DEG, epsilon = 1e-9);

        assert_eq!(ang2pix(0, 0.0, 0.0).unwrap(), 4);
    }

    #[test]
    fn test_center_round_trip() {
        for order in [0u8, 3, 8, 15, 29] {
            let n = npix(order);
            for pix in [0, 1, n / 3, n / 2 + 7, n - 1] {
                let (ra, dec) = pix2ang(order, pix).unwrap();
                assert_eq!(ang2pix(order, ra, dec).unwrap(), pix, "order {}", order);
                let v = pix2vec(order, pix).unwrap();
                assert_eq!(vec2pix(order, &v).unwrap(), pix, "order {}", order);
            }
        }
    }

    #[test]
    fn test_negative_and_large_ra_wrap() {
        assert_eq!(
            ang2pix(8, -10.0, 5.0).unwrap(),
            ang2pix(8, 350.0, 5.0).unwrap()
        );
        assert_eq!(
            ang2pix(8, 370.0, 5.0).unwrap(),
            ang2pix(8, 10.0, 5.0).unwrap()
        );
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            ang2pix(30, 0.0, 0.0),
            Err(RegionError::InvalidArgument { .. })
        ));
        assert!(ang2pix(5, 0.0, 91.0).is_err());
        assert!(ang2pix(5, f64::NAN, 0.0).is_err());
        assert!(pix2ang(0, 12).is_err());
        assert!(vec2pix(3, &Vector3::zeros()).is_err());
    }

    #[test]
    fn test_query_disc_contains_center_and_nearby_centers() {
        let (ra, dec, radius) = (10.0, 20.0, 2.0);
        let order = 7;
        let pixels = query_disc_inclusive(order, ra, dec, radius, 2).unwrap();
        assert!(pixels.contains(ang2pix(order, ra, dec).unwrap()));

        for pix in 0..npix(order) {
            let (pra, pdec) = pix2ang(order, pix).unwrap();
            if angular_separation_deg(ra, dec, pra, pdec) < radius {
                assert!(pixels.contains(pix), "pixel {} missing", pix);
            }
        }
        assert!(pixels.nval() < npix(order) / 100);
    }

    #[test]
    fn test_library_panic_becomes_recoverable_error() {
        let err = guarded("nested::hash", || -> u64 { panic!("depth out of range") }).unwrap_err();
        assert!(matches!(err, RegionError::ExternalLibrary { .. }));
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("depth out of range"));

        let depth = 31;
        let err = guarded("nested::center", || -> (f64, f64) {
            panic!("bad depth {}", depth)
        })
        .unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("bad depth 31"));

        let err = guarded("nested::polygon_coverage", || -> u64 {
            std::panic::panic_any(7u32)
        })
        .unwrap_err();
        assert!(err.to_string().contains("pixel library panicked"));

        assert_eq!(guarded("nested::hash", || 5u64).unwrap(), 5);
    }

    #[test]
    fn test_coverage_ranges_match_flat_cells() {
        let bmoc = nested::cone_coverage_approx_custom(8, 2, 0.3, 0.4, 0.05);
        let mut flat = RangeSet::new();
        for pix in bmoc.flat_iter() {
            flat.add_single(pix);
        }
        assert_eq!(coverage_ranges(&bmoc).unwrap(), flat);
    }

    #[test]
    fn test_wide_disc_at_fine_order() {
        let (order, radius) = (16u8, 30.0);
        let pixels = query_disc_inclusive(order, 10.0, 20.0, radius, 2).unwrap();
        let cap = crate::sphere::cap_area(radius * DEG_TO_RAD);
        let covered = pixels.nval() as f64 * pixel_area(order);
        assert!(covered >= cap);
        assert!(covered < cap * 1.01);
        assert!((pixels.nranges() as u64) < pixels.nval() / 1000);
    }

    #[test]
    fn test_query_disc_rejects_bad_radius() {
        assert!(query_disc_inclusive(5, 0.0, 0.0, 0.0, 2).is_err());
        assert!(query_disc_inclusive(5, 0.0, 0.0, f64::INFINITY, 2).is_err());
    }

    #[test]
    fn test_query_polygon() {
        let square = [(10.0, -5.0), (20.0, -5.0), (20.0, 5.0), (10.0, 5.0)];
        let order = 6;
        let pixels = query_polygon_inclusive(order, &square, true).unwrap();
        assert!(pixels.contains(ang2pix(order, 15.0, 0.0).unwrap()));
        assert!(!pixels.contains(ang2pix(order, 40.0, 0.0).unwrap()));
        assert!(query_polygon_inclusive(order, &square[..2], true).is_err());
    }

    #[test]
    fn test_polygon_interior_excludes_edge_pixels() {
        let square = [(10.0, -5.0), (20.0, -5.0), (20.0, 5.0), (10.0, 5.0)];
        let order = 6;
        let touched = query_polygon_inclusive(order, &square, true).unwrap();
        let interior = query_polygon_interior(order, &square, true).unwrap();
        assert!(touched.contains_all(&interior));
        assert!(interior.contains(ang2pix(order, 15.0, 0.0).unwrap()));
        assert!(!interior.contains(ang2pix(order, 10.0, 0.0).unwrap()));
        assert!(!interior.contains(ang2pix(order, 20.0, 4.9).unwrap()));
        assert!(interior.nval() < touched.nval());
    }

    #[test]
    fn test_angular_separation_deg() {
        assert_abs_diff_eq!(angular_separation_deg(0.0, 0.0, 0.0, 0.0), 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(angular_separation_deg(0.0, 0.0, 90.0, 0.0), 90.0, epsilon = 1e-10);
        assert_abs_diff_eq!(angular_separation_deg(0.0, 90.0, 0.0, -90.0), 180.0, epsilon = 1e-10);
        let dist = angular_separation_deg(0.0, 0.0, 0.1, 0.1);
        assert!(dist > 0.14 && dist < 0.15);
    }

    #[test]
    fn test_wrap_ra() {
        assert_eq!(wrap_ra(0.0), 0.0);
        assert_eq!(wrap_ra(-90.0), 270.0);
        assert_eq!(wrap_ra(720.0), 0.0);
        assert_eq!(wrap_ra(359.5), 359.5);
    }
}
