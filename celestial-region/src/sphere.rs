//! Spherical caps and loops on the unit sphere.
//!
//! A loop is a closed chain of unit vectors joined by minor great-circle
//! arcs. Its interior is the region on the left of every edge, so a small
//! counter-clockwise loop encloses a small area and the same vertices in
//! reverse order enclose the rest of the sphere.
//!
//! All angles here are in radians.

use crate::constants::{FOUR_PI, PI, TWOPI};
use crate::vector::Vector3;

/// Distance of the interior reference point from the first edge.
const REFERENCE_OFFSET: f64 = 1e-9;

/// Solid angle of a cap of angular radius `radius`.
#[inline]
pub fn cap_area(radius: f64) -> f64 {
    TWOPI * (1.0 - libm::cos(radius))
}

/// Returns `true` if `p` lies within `radius` of `center`.
#[inline]
pub fn cap_contains(center: &Vector3, radius: f64, p: &Vector3) -> bool {
    center.angle_to(p) <= radius
}

/// Sign of the orientation of three points: positive when `a, b, c` turn
/// counter-clockwise, zero when they lie on one great circle.
#[inline]
fn sign(a: &Vector3, b: &Vector3, c: &Vector3) -> i8 {
    let det = a.triple(b, c);
    if det > 0.0 {
        1
    } else if det < 0.0 {
        -1
    } else {
        0
    }
}

/// Returns `true` if edges `ab` and `cd` cross at a point interior to both.
///
/// Edges that merely share a vertex or touch do not count.
pub fn edges_cross(a: &Vector3, b: &Vector3, c: &Vector3, d: &Vector3) -> bool {
    let acb = -sign(a, b, c);
    if acb == 0 {
        return false;
    }
    sign(a, b, d) == acb && -sign(c, d, b) == acb && sign(c, d, a) == acb
}

/// Angular distance from `p` to the arc `ab`.
pub fn distance_to_arc(p: &Vector3, a: &Vector3, b: &Vector3) -> f64 {
    let n = a.cross(b);
    let endpoints = p.angle_to(a).min(p.angle_to(b));
    if n.magnitude_squared() < 1e-30 {
        return endpoints;
    }
    let n = n.normalize();
    let off_plane = p.dot(&n);
    let projected = *p - n * off_plane;
    if a.triple(&projected, &n) > 0.0 && projected.triple(b, &n) > 0.0 {
        libm::atan2(libm::fabs(off_plane), projected.magnitude())
    } else {
        endpoints
    }
}

/// Iterates over the edges `(v[i], v[i+1])` of a closed loop.
fn edges(vertices: &[Vector3]) -> impl Iterator<Item = (&Vector3, &Vector3)> {
    let n = vertices.len();
    (0..n).map(move |i| (&vertices[i], &vertices[(i + 1) % n]))
}

/// Signed area of the triangle `abc`, positive when counter-clockwise.
fn signed_triangle_area(a: &Vector3, b: &Vector3, c: &Vector3) -> f64 {
    let num = a.triple(b, c);
    let den = 1.0 + a.dot(b) + b.dot(c) + c.dot(a);
    2.0 * libm::atan2(num, den)
}

/// Area of the region on the left of every edge, in `[0, 4π)`.
pub fn loop_area(vertices: &[Vector3]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let mut origin = Vector3::zeros();
    for v in vertices {
        origin += *v;
    }
    let origin = if origin.magnitude_squared() > 1e-20 {
        origin.normalize()
    } else {
        vertices[0]
    };

    let sum: f64 = edges(vertices)
        .map(|(a, b)| signed_triangle_area(&origin, a, b))
        .sum();
    if sum < 0.0 {
        sum + FOUR_PI
    } else {
        sum.min(FOUR_PI)
    }
}

/// Direction of the area-weighted centroid of the loop interior.
///
/// Returns `None` when the first moment vanishes, as for a loop splitting
/// the sphere into two mirror-image halves.
pub fn loop_centroid(vertices: &[Vector3]) -> Option<Vector3> {
    let mut moment = Vector3::zeros();
    for (a, b) in edges(vertices) {
        let n = a.cross(b);
        if n.magnitude_squared() == 0.0 {
            continue;
        }
        moment += n.normalize() * (0.5 * a.angle_to(b));
    }
    if moment.magnitude() < 1e-15 {
        None
    } else {
        Some(moment.normalize())
    }
}

/// A point just inside the loop, next to the midpoint of its first edge.
fn reference_point(vertices: &[Vector3]) -> Vector3 {
    let (a, b) = (&vertices[0], &vertices[1]);
    let mid = (*a + *b).normalize();
    let left = a.cross(b).normalize();
    let offset = REFERENCE_OFFSET.min(a.angle_to(b) * 1e-3);
    (mid + left * offset).normalize()
}

fn count_crossings(vertices: &[Vector3], from: &Vector3, to: &Vector3) -> usize {
    edges(vertices)
        .filter(|(a, b)| edges_cross(from, to, a, b))
        .count()
}

/// Returns `true` if `p` lies inside the loop.
///
/// Counts boundary crossings on the way from an interior reference point.
/// Points within about a nanoradian of an edge may fall on either side.
pub fn loop_contains(vertices: &[Vector3], p: &Vector3) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let origin = reference_point(vertices);
    // nearly antipodal endpoints leave the connecting arc undefined
    let crossings = if origin.dot(p) < -0.99 {
        let via = origin.cross(p);
        let via = if via.magnitude_squared() < 1e-30 {
            origin.orthogonal()
        } else {
            via.normalize()
        };
        count_crossings(vertices, &origin, &via) + count_crossings(vertices, &via, p)
    } else {
        count_crossings(vertices, &origin, p)
    };
    crossings % 2 == 0
}

/// Returns `true` if any edge of `a` crosses any edge of `b`.
pub fn loops_cross(a: &[Vector3], b: &[Vector3]) -> bool {
    edges(a).any(|(a0, a1)| edges(b).any(|(b0, b1)| edges_cross(a0, a1, b0, b1)))
}

/// Smallest distance from `p` to any edge of the loop.
pub fn distance_to_loop_boundary(vertices: &[Vector3], p: &Vector3) -> f64 {
    edges(vertices)
        .map(|(a, b)| distance_to_arc(p, a, b))
        .fold(PI, f64::min)
}
