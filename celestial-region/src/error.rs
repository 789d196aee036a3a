//! Error types for region and geometry operations.
//!
//! [`RegionError`] covers every failure the crate reports: broken range-set
//! invariants, operations a geometry kind does not support, bad arguments,
//! failures inside the pixel library, and malformed compressed input.
//!
//! # Error Categories
//!
//! | Variant | Use Case | Recoverable? |
//! |---------|----------|--------------|
//! | [`InvariantViolation`](RegionError::InvariantViolation) | Malformed boundary arrays, out-of-order appends | No |
//! | [`Unsupported`](RegionError::Unsupported) | Centroid of a region, complement of a point | No |
//! | [`InvalidArgument`](RegionError::InvalidArgument) | Bad coordinates, orders, pixels, operand kinds | No |
//! | [`ExternalLibrary`](RegionError::ExternalLibrary) | A pixel-library call failed | Yes |
//! | [`Codec`](RegionError::Codec) | Truncated or corrupt compressed ranges | No |
//!
//! # Usage
//!
//! Most functions return [`RegionResult<T>`], which is `Result<T, RegionError>`.
//! Use the constructor methods for consistent error creation:
//!
//! ```
//! use celestial_region::RegionError;
//!
//! fn check_order(order: u8) -> Result<u8, RegionError> {
//!     if order > 29 {
//!         return Err(RegionError::invalid_argument(
//!             "check_order",
//!             &format!("order {} exceeds 29", order),
//!         ));
//!     }
//!     Ok(order)
//! }
//! ```

use thiserror::Error;

/// Unified error type for range-set, pixel and geometry operations.
#[derive(Error, Debug)]
pub enum RegionError {
    /// A range set would break its ordering invariant.
    #[error("Invariant violation in {context}: {message}")]
    InvariantViolation { context: String, message: String },

    /// The operation is not defined for this geometry kind.
    #[error("{operation} is not supported for {kind}")]
    Unsupported { operation: String, kind: String },

    /// An argument is out of range or of the wrong kind.
    #[error("Invalid argument to {context}: {message}")]
    InvalidArgument { context: String, message: String },

    /// The pixel library failed while rasterizing or converting.
    ///
    /// This is the only recoverable variant; the input may succeed at a
    /// different order or after widening.
    #[error("External library error in {function}: {message}")]
    ExternalLibrary { function: String, message: String },

    /// Compressed range data could not be decoded.
    #[error("Codec error ({operation}): {message}")]
    Codec { operation: String, message: String },
}

/// Convenience alias for `Result<T, RegionError>`.
pub type RegionResult<T> = Result<T, RegionError>;

impl RegionError {
    /// Creates an [`InvariantViolation`](Self::InvariantViolation) error.
    pub fn invariant(context: &str, reason: &str) -> Self {
        Self::InvariantViolation {
            context: context.to_string(),
            message: reason.to_string(),
        }
    }

    /// Creates an [`Unsupported`](Self::Unsupported) error.
    pub fn unsupported(operation: &str, kind: &str) -> Self {
        Self::Unsupported {
            operation: operation.to_string(),
            kind: kind.to_string(),
        }
    }

    /// Creates an [`InvalidArgument`](Self::InvalidArgument) error.
    pub fn invalid_argument(context: &str, reason: &str) -> Self {
        Self::InvalidArgument {
            context: context.to_string(),
            message: reason.to_string(),
        }
    }

    /// Creates an [`ExternalLibrary`](Self::ExternalLibrary) error.
    pub fn external_library(function: &str, message: &str) -> Self {
        Self::ExternalLibrary {
            function: function.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates a [`Codec`](Self::Codec) error.
    pub fn codec(operation: &str, reason: &str) -> Self {
        Self::Codec {
            operation: operation.to_string(),
            message: reason.to_string(),
        }
    }

    /// Returns `true` if retrying with different parameters might succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ExternalLibrary { .. })
    }
}
