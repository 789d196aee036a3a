use crate::error::{RegionError, RegionResult};
use crate::pixel::check_radec;
use crate::sphere;
use crate::vector::Vector3;

/// A spherical polygon whose interior lies on the left of every edge.
///
/// Vertices are `(ra, dec)` pairs in degrees, joined by minor great-circle
/// arcs and implicitly closed. Listing them counter-clockwise (as seen from
/// outside the sphere) encloses the small side.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyPolygon {
    vertices: Vec<(f64, f64)>,
    vectors: Vec<Vector3>,
}

impl SkyPolygon {
    /// Builds a polygon from at least three `(ra, dec)` vertices.
    pub fn new(vertices: Vec<(f64, f64)>) -> RegionResult<Self> {
        if vertices.len() < 3 {
            return Err(RegionError::invalid_argument(
                "SkyPolygon::new",
                &format!("polygon needs at least 3 vertices, got {}", vertices.len()),
            ));
        }
        for &(ra, dec) in &vertices {
            check_radec("SkyPolygon::new", ra, dec)?;
        }
        let vectors = vertices
            .iter()
            .map(|&(ra, dec)| Vector3::from_radec_deg(ra, dec))
            .collect();
        Ok(Self { vertices, vectors })
    }

    /// Builds a polygon from `[ra0, dec0, ra1, dec1, ...]`.
    pub fn from_flat(coords: &[f64]) -> RegionResult<Self> {
        if coords.len() % 2 != 0 || coords.len() < 6 {
            return Err(RegionError::invalid_argument(
                "SkyPolygon::from_flat",
                &format!(
                    "expected an even number of at least 6 values, got {}",
                    coords.len()
                ),
            ));
        }
        Self::new(coords.chunks_exact(2).map(|c| (c[0], c[1])).collect())
    }

    #[inline]
    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// Vertices as unit vectors.
    #[inline]
    pub fn vectors(&self) -> &[Vector3] {
        &self.vectors
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Flat `[ra0, dec0, ...]` form.
    pub fn to_flat(&self) -> Vec<f64> {
        self.vertices.iter().flat_map(|&(ra, dec)| [ra, dec]).collect()
    }

    /// The same boundary traversed backwards, enclosing the other side.
    pub fn reversed(&self) -> Self {
        let mut vertices = self.vertices.clone();
        let mut vectors = self.vectors.clone();
        vertices.reverse();
        vectors.reverse();
        Self { vertices, vectors }
    }

    /// Interior area in steradians.
    pub fn area(&self) -> f64 {
        sphere::loop_area(&self.vectors)
    }

    /// Returns `true` if the interior is the larger side of the boundary.
    pub(crate) fn encloses_large_side(&self) -> bool {
        self.area() > crate::constants::TWOPI
    }

    pub fn contains_point(&self, p: &Vector3) -> bool {
        sphere::loop_contains(&self.vectors, p)
    }
}
