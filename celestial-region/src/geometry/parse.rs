//! Text form of [`Geometry`].
//!
//! ```text
//! POINT(ra dec)
//! CIRCLE(ra dec radius)
//! POLYGON(ra dec, ra dec, ra dec, ...)
//! REGION(<base64 compressed ranges>)
//! ```
//!
//! Keywords are case-insensitive and whitespace around tokens is ignored.
//! Numbers print in their shortest exact form, so `to_string` followed by
//! `parse` gives back an equal geometry.

use super::{Geometry, SkyPolygon};
use crate::codec::{decode_text, encode_text};
use crate::error::{RegionError, RegionResult};
use crate::pixel_ranges::PixelRangeSet;
use crate::range_set::RangeSet;
use std::fmt;
use std::str::FromStr;

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Point { ra, dec } => write!(f, "POINT({} {})", ra, dec),
            Geometry::Circle { ra, dec, radius } => {
                write!(f, "CIRCLE({} {} {})", ra, dec, radius)
            }
            Geometry::Polygon(poly) => {
                f.write_str("POLYGON(")?;
                for (i, (ra, dec)) in poly.vertices().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} {}", ra, dec)?;
                }
                f.write_str(")")
            }
            Geometry::Region(ranges) => {
                write!(f, "REGION({})", encode_text(ranges.as_range_set().as_slice()))
            }
        }
    }
}

fn parse_error(message: &str) -> RegionError {
    RegionError::invalid_argument("Geometry::from_str", message)
}

fn parse_numbers(text: &str) -> RegionResult<Vec<f64>> {
    text.split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| parse_error(&format!("invalid number '{}'", token)))
        })
        .collect()
}

fn parse_exact<const N: usize>(keyword: &str, body: &str) -> RegionResult<[f64; N]> {
    let values = parse_numbers(body)?;
    <[f64; N]>::try_from(values.as_slice()).map_err(|_| {
        parse_error(&format!(
            "{} takes {} numbers, got {}",
            keyword,
            N,
            values.len()
        ))
    })
}

impl FromStr for Geometry {
    type Err = RegionError;

    fn from_str(s: &str) -> RegionResult<Self> {
        let s = s.trim();
        let open = s
            .find('(')
            .ok_or_else(|| parse_error(&format!("missing '(' in '{}'", s)))?;
        let body = s[open + 1..]
            .strip_suffix(')')
            .ok_or_else(|| parse_error(&format!("missing closing ')' in '{}'", s)))?;
        let keyword = s[..open].trim().to_ascii_uppercase();

        match keyword.as_str() {
            "POINT" => {
                let [ra, dec] = parse_exact::<2>("POINT", body)?;
                Geometry::point(ra, dec)
            }
            "CIRCLE" => {
                let [ra, dec, radius] = parse_exact::<3>("CIRCLE", body)?;
                Geometry::circle(ra, dec, radius)
            }
            "POLYGON" => {
                let vertices = body
                    .split(',')
                    .map(|pair| {
                        let [ra, dec] = parse_exact::<2>("POLYGON vertex", pair)?;
                        Ok((ra, dec))
                    })
                    .collect::<RegionResult<Vec<_>>>()?;
                Ok(Geometry::Polygon(SkyPolygon::new(vertices)?))
            }
            "REGION" => {
                let ranges = RangeSet::from_boundaries(decode_text(body)?)?;
                Ok(Geometry::Region(PixelRangeSet::from_range_set(ranges)?))
            }
            other => Err(parse_error(&format!("unknown geometry kind '{}'", other))),
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::Geometry;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Geometry {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Geometry {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let text = String::deserialize(deserializer)?;
            text.parse().map_err(D::Error::custom)
        }
    }
}
