//! 3D unit vectors for directions on the celestial sphere.
//!
//! Every spherical test in this crate works in Cartesian form: a sky position
//! `(ra, dec)` becomes a unit vector, and separations, edge orientations and
//! crossings reduce to dot, cross and triple products.
//!
//! ```
//! use celestial_region::Vector3;
//!
//! let a = Vector3::from_radec_deg(0.0, 0.0);
//! let b = Vector3::from_radec_deg(90.0, 0.0);
//! assert!((a.angle_to(&b).to_degrees() - 90.0).abs() < 1e-12);
//! ```
//!
//! The convention matches equatorial coordinates: `+X` toward RA 0 on the
//! equator, `+Y` toward RA 90°, `+Z` toward the north celestial pole.

use crate::constants::{DEG_TO_RAD, RAD_TO_DEG};
use std::fmt;

/// A 3D Cartesian vector, usually of unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// Creates a new vector from x, y, z components.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns the zero vector.
    #[inline]
    pub fn zeros() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Unit vector from right ascension and declination in radians.
    pub fn from_spherical(ra: f64, dec: f64) -> Self {
        let (sin_ra, cos_ra) = libm::sincos(ra);
        let (sin_dec, cos_dec) = libm::sincos(dec);
        Self::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec)
    }

    /// Unit vector from right ascension and declination in degrees.
    #[inline]
    pub fn from_radec_deg(ra_deg: f64, dec_deg: f64) -> Self {
        Self::from_spherical(ra_deg * DEG_TO_RAD, dec_deg * DEG_TO_RAD)
    }

    /// Converts to `(ra, dec)` in radians, with `ra` in `(-π, π]`.
    ///
    /// The vector need not be normalized. The zero vector maps to `(0, 0)`.
    pub fn to_spherical(&self) -> (f64, f64) {
        let d2 = self.x * self.x + self.y * self.y;
        let ra = if d2 == 0.0 {
            0.0
        } else {
            libm::atan2(self.y, self.x)
        };
        let dec = if self.z == 0.0 {
            0.0
        } else {
            libm::atan2(self.z, libm::sqrt(d2))
        };
        (ra, dec)
    }

    /// Converts to `(ra, dec)` in degrees, with `ra` in `[0, 360)`.
    pub fn to_radec_deg(&self) -> (f64, f64) {
        let (ra, dec) = self.to_spherical();
        let mut ra_deg = ra * RAD_TO_DEG;
        if ra_deg < 0.0 {
            ra_deg += 360.0;
        }
        if ra_deg >= 360.0 {
            ra_deg -= 360.0;
        }
        (ra_deg, dec * RAD_TO_DEG)
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        libm::sqrt(self.magnitude_squared())
    }

    #[inline]
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns a unit vector in the same direction; the zero vector is returned unchanged.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            *self
        } else {
            Self::new(self.x / mag, self.y / mag, self.z / mag)
        }
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Scalar triple product `self · (b × c)`.
    ///
    /// Positive when `self, b, c` wind counter-clockwise seen from outside
    /// the sphere.
    #[inline]
    pub fn triple(&self, b: &Self, c: &Self) -> f64 {
        self.dot(&b.cross(c))
    }

    /// Angle between two directions in radians, in `[0, π]`.
    ///
    /// Uses `atan2(|a × b|, a · b)`, which stays accurate for both tiny and
    /// near-antipodal separations. Neither vector needs to be normalized.
    pub fn angle_to(&self, other: &Self) -> f64 {
        libm::atan2(self.cross(other).magnitude(), self.dot(other))
    }

    /// Returns some unit vector perpendicular to `self`.
    pub fn orthogonal(&self) -> Self {
        let ax = libm::fabs(self.x);
        let ay = libm::fabs(self.y);
        let az = libm::fabs(self.z);
        let axis = if ax <= ay && ax <= az {
            Self::new(1.0, 0.0, 0.0)
        } else if ay <= az {
            Self::new(0.0, 1.0, 0.0)
        } else {
            Self::new(0.0, 0.0, 1.0)
        };
        self.cross(&axis).normalize()
    }
}

impl std::ops::Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl std::ops::Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl std::ops::Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector3({:.9}, {:.9}, {:.9})", self.x, self.y, self.z)
    }
}
