//! Floating-point tolerance handling.
//!
//! Every "is this entry zero?" decision made during elimination goes through
//! [`Tolerance::is_near_zero`]. Using one tolerance for pivot selection, zero
//! row detection and the echelon predicates keeps the output of the row
//! reduction engine consistent with its own checks.
//!
//! # Examples
//!
//! ```
//! use la_calc::approx::{is_near_zero, nearly_equal, Tolerance};
//!
//! assert!(is_near_zero(1e-13));
//! assert!(!is_near_zero(1e-9));
//! assert!(nearly_equal(1.0, 1.0 + 1e-11, 1e-12, 1e-10));
//!
//! let loose = Tolerance::new(1e-6, 0.0).unwrap();
//! assert!(loose.is_near_zero(1e-9));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{LinalgError, Result};

/// Default absolute tolerance.
pub const DEFAULT_ABS_TOL: f64 = 1e-12;

/// Default relative tolerance.
pub const DEFAULT_REL_TOL: f64 = 1e-10;

/// Combined absolute + relative comparison:
/// `|a - b| <= abs_tol + rel_tol · max(|a|, |b|)`.
#[inline]
pub fn nearly_equal(a: f64, b: f64, abs_tol: f64, rel_tol: f64) -> bool {
    (a - b).abs() <= abs_tol + rel_tol * a.abs().max(b.abs())
}

/// Returns true iff `|x| <= DEFAULT_ABS_TOL`.
#[inline]
pub fn is_near_zero(x: f64) -> bool {
    Tolerance::default().is_near_zero(x)
}

/// Absolute and relative tolerance pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Absolute tolerance, also the zero threshold.
    pub abs: f64,
    /// Relative tolerance used by [`Tolerance::nearly_equal`].
    pub rel: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            abs: DEFAULT_ABS_TOL,
            rel: DEFAULT_REL_TOL,
        }
    }
}

impl Tolerance {
    /// Creates a tolerance pair.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if either value is negative, NaN or infinite.
    pub fn new(abs: f64, rel: f64) -> Result<Self> {
        let tol = Self { abs, rel };
        tol.validate()?;
        Ok(tol)
    }

    /// Checks that both values are finite and non-negative.
    ///
    /// # Errors
    /// Returns `InvalidArgument` otherwise.
    pub fn validate(&self) -> Result<()> {
        if !self.abs.is_finite() || self.abs < 0.0 {
            return Err(LinalgError::InvalidArgument {
                reason: "absolute tolerance must be finite and non-negative",
            });
        }
        if !self.rel.is_finite() || self.rel < 0.0 {
            return Err(LinalgError::InvalidArgument {
                reason: "relative tolerance must be finite and non-negative",
            });
        }
        Ok(())
    }

    /// `|x| <= abs`.
    #[inline]
    pub fn is_near_zero(&self, x: f64) -> bool {
        x.abs() <= self.abs
    }

    /// Combined comparison using this pair, see [`nearly_equal`].
    #[inline]
    pub fn nearly_equal(&self, a: f64, b: f64) -> bool {
        nearly_equal(a, b, self.abs, self.rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let tol = Tolerance::default();
        assert_eq!(tol.abs, 1e-12);
        assert_eq!(tol.rel, 1e-10);
    }

    #[test]
    fn test_is_near_zero_boundary() {
        assert!(is_near_zero(0.0));
        assert!(is_near_zero(-0.0));
        assert!(is_near_zero(1e-12));
        assert!(is_near_zero(-1e-12));
        assert!(!is_near_zero(2e-12));
        assert!(!is_near_zero(-1.0));
    }

    #[test]
    fn test_nearly_equal_absolute_and_relative() {
        assert!(nearly_equal(0.0, 5e-13, 1e-12, 0.0));
        assert!(!nearly_equal(0.0, 5e-12, 1e-12, 0.0));
        // relative part dominates for large magnitudes
        assert!(nearly_equal(1e6, 1e6 + 1e-5, 1e-12, 1e-10));
        assert!(!nearly_equal(1e6, 1e6 + 1.0, 1e-12, 1e-10));
    }

    #[test]
    fn test_custom_tolerance() {
        let tol = Tolerance::new(1e-3, 0.0).unwrap();
        assert!(tol.is_near_zero(5e-4));
        assert!(!tol.is_near_zero(5e-3));
        assert!(tol.nearly_equal(1.0, 1.0005));
    }

    #[test]
    fn test_invalid_tolerance() {
        assert!(Tolerance::new(-1.0, 0.0).is_err());
        assert!(Tolerance::new(1e-12, f64::NAN).is_err());
        assert!(Tolerance::new(f64::INFINITY, 0.0).is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let tol: Tolerance = serde_json::from_str(r#"{"abs": 1e-9}"#).unwrap();
        assert_eq!(tol.abs, 1e-9);
        assert_eq!(tol.rel, DEFAULT_REL_TOL);
    }
}
