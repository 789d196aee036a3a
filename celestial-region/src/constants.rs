//! Numeric constants shared by the pixel, sphere and region modules.
//!
//! All region arithmetic happens in one integer space: HEALPix nested pixel
//! indices at [`MAX_ORDER`]. A pixel at a coarser order `o` covers
//! `4^(MAX_ORDER - o)` consecutive indices of that space.

/// Finest HEALPix order; the common coordinate space for every region.
pub const MAX_ORDER: u8 = 29;

/// Order used when a caller rasterizes without choosing one.
pub const DEFAULT_ORDER: u8 = 10;

/// Number of pixels at [`MAX_ORDER`] (`12 · 4^29`).
pub const NPIX_MAX_ORDER: u64 = 12 << (2 * MAX_ORDER as u32);

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const PI: f64 = 3.141592653589793238462643;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const HALF_PI: f64 = 1.5707963267948966192313216;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const TWOPI: f64 = 6.283185307179586476925287;

/// Solid angle of the whole sphere, in steradians.
pub const FOUR_PI: f64 = 2.0 * TWOPI;

#[allow(clippy::excessive_precision)]
pub const DEG_TO_RAD: f64 = 1.745329251994329576923691e-2;

#[allow(clippy::excessive_precision)]
pub const RAD_TO_DEG: f64 = 57.29577951308232087679815;

/// Solid angle of one pixel at [`MAX_ORDER`], in steradians.
pub const UNIT_PIXEL_AREA: f64 = FOUR_PI / NPIX_MAX_ORDER as f64;
