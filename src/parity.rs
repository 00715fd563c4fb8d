//! Parity bits and modular check digits (UPC-A, ISBN-10).
//!
//! # Examples
//!
//! ```
//! use la_calc::parity::{isbn10_check_digit, upc_check_digit};
//!
//! assert_eq!(upc_check_digit(&[0, 5, 9, 4, 6, 4, 7, 0, 0, 2, 7]).unwrap(), 8);
//! assert_eq!(isbn10_check_digit(&[0, 3, 9, 4, 7, 5, 6, 8, 2]).unwrap(), 7);
//! ```

use crate::error::{LinalgError, Result};

/// True if `bits` has an odd number of one bits.
pub fn has_parity_error(bits: u64) -> bool {
    bits.count_ones() % 2 != 0
}

/// The bit that makes the number of one bits in `bits` even.
pub fn parity_bit(bits: u64) -> bool {
    bits.count_ones() % 2 != 0
}

/// The value `x` in `[0, m)` with `(sum + x) ≡ 0 (mod m)`.
///
/// # Errors
/// Returns `InvalidArgument` if `m <= 0`.
pub fn modular_additive_inverse(sum: i64, m: i64) -> Result<i64> {
    if m <= 0 {
        return Err(LinalgError::InvalidArgument {
            reason: "modulus must be positive",
        });
    }
    Ok((m - sum.rem_euclid(m)) % m)
}

/// Check digit making the plain digit sum divisible by `m`.
///
/// # Errors
/// Returns `InvalidArgument` if `m <= 0`.
pub fn check_digit(digits: &[i64], m: i64) -> Result<i64> {
    modular_additive_inverse(digits.iter().sum(), m)
}

fn check_len(digits: &[i64], len: usize, op: &'static str) -> Result<()> {
    if digits.len() != len {
        return Err(LinalgError::DimensionMismatch {
            op,
            expected: vec![len],
            got: vec![digits.len()],
        });
    }
    Ok(())
}

/// Weights 3, 1, 3, 1, ... from the left.
fn upc_weighted_sum(digits: &[i64]) -> i64 {
    digits
        .iter()
        .enumerate()
        .map(|(i, &d)| if i % 2 == 0 { 3 * d } else { d })
        .sum()
}

/// Weights 10, 9, 8, ... from the left.
fn isbn10_weighted_sum(digits: &[i64]) -> i64 {
    digits
        .iter()
        .zip((1..=10).rev())
        .map(|(&d, w)| w * d)
        .sum()
}

/// Check digit of an 11-digit UPC-A code.
///
/// # Errors
/// Returns `DimensionMismatch` unless exactly 11 digits are given.
pub fn upc_check_digit(digits: &[i64]) -> Result<i64> {
    check_len(digits, 11, "upc_check_digit")?;
    modular_additive_inverse(upc_weighted_sum(digits), 10)
}

/// True if a full 12-digit UPC-A code fails its check.
///
/// # Errors
/// Returns `DimensionMismatch` unless exactly 12 digits are given.
pub fn upc_has_error(digits: &[i64]) -> Result<bool> {
    check_len(digits, 12, "upc_has_error")?;
    Ok(upc_weighted_sum(digits) % 10 != 0)
}

/// Check digit of a 9-digit ISBN-10 prefix. A result of `10` is written `X`.
///
/// # Errors
/// Returns `DimensionMismatch` unless exactly 9 digits are given.
pub fn isbn10_check_digit(digits: &[i64]) -> Result<i64> {
    check_len(digits, 9, "isbn10_check_digit")?;
    modular_additive_inverse(isbn10_weighted_sum(digits), 11)
}

/// True if a full 10-digit ISBN-10 fails its check.
///
/// # Errors
/// Returns `DimensionMismatch` unless exactly 10 digits are given.
pub fn isbn10_has_error(digits: &[i64]) -> Result<bool> {
    check_len(digits, 10, "isbn10_has_error")?;
    Ok(isbn10_weighted_sum(digits) % 11 != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parity() {
        assert!(!has_parity_error(0b0000));
        assert!(has_parity_error(0b0100));
        assert!(!has_parity_error(0b1100_0110));
        assert!(parity_bit(0b1011));
        assert!(!parity_bit(0b1001));
        // appending the parity bit always yields an even count
        let bits = 0b1101_0010_u64;
        let with_parity = (bits << 1) | u64::from(parity_bit(bits));
        assert!(!has_parity_error(with_parity));
    }

    #[test]
    fn test_modular_additive_inverse() {
        assert_eq!(modular_additive_inverse(3, 5).unwrap(), 2);
        assert_eq!(modular_additive_inverse(5, 5).unwrap(), 0);
        assert_eq!(modular_additive_inverse(-1, 5).unwrap(), 1);
        assert_eq!(modular_additive_inverse(23, 10).unwrap(), 7);
        assert_eq!(modular_additive_inverse(7, 1).unwrap(), 0);
    }

    #[test]
    fn test_modular_additive_inverse_bad_modulus() {
        for m in [0, -3] {
            let err = modular_additive_inverse(1, m).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
    }

    #[test]
    fn test_check_digit() {
        assert_eq!(check_digit(&[1, 2, 2, 2], 3).unwrap(), 2);
        assert_eq!(check_digit(&[3, 4, 2, 3], 5).unwrap(), 3);
        assert_eq!(check_digit(&[1, 5, 6, 4, 5], 7).unwrap(), 0);
        assert_eq!(check_digit(&[3, 0, 7, 5, 6, 8], 9).unwrap(), 7);
        assert_eq!(check_digit(&[3, 0, 7], 1).unwrap(), 0);
        assert_eq!(check_digit(&[], 4).unwrap(), 0);
    }

    #[test]
    fn test_check_digit_bad_modulus() {
        assert_eq!(
            check_digit(&[1, 2], 0).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert!(check_digit(&[1, 2], -3).is_err());
    }

    #[test]
    fn test_upc() {
        assert_eq!(upc_check_digit(&[0, 5, 9, 4, 6, 4, 7, 0, 0, 2, 7]).unwrap(), 8);
        assert_eq!(upc_check_digit(&[0, 1, 4, 0, 1, 4, 1, 8, 4, 1, 2]).unwrap(), 0);
        assert!(!upc_has_error(&[0, 5, 9, 4, 6, 4, 7, 0, 0, 2, 7, 8]).unwrap());
        assert!(upc_has_error(&[0, 5, 9, 4, 6, 4, 7, 0, 0, 2, 7, 9]).unwrap());
    }

    #[test]
    fn test_upc_wrong_length() {
        assert!(upc_check_digit(&[0, 5, 9]).is_err());
        assert!(upc_has_error(&[0, 5, 9, 4, 6, 4, 7, 0, 0, 2, 7]).is_err());
    }

    #[test]
    fn test_isbn10() {
        assert_eq!(isbn10_check_digit(&[0, 3, 9, 4, 7, 5, 6, 8, 2]).unwrap(), 7);
        assert_eq!(isbn10_check_digit(&[0, 3, 8, 7, 9, 7, 9, 9, 3]).unwrap(), 10);
        assert!(!isbn10_has_error(&[0, 3, 9, 4, 7, 5, 6, 8, 2, 7]).unwrap());
        assert!(isbn10_has_error(&[0, 4, 4, 9, 5, 0, 8, 3, 5, 6]).unwrap());
    }

    #[test]
    fn test_isbn10_wrong_length() {
        assert!(isbn10_check_digit(&[1; 10]).is_err());
        assert!(isbn10_has_error(&[1; 9]).is_err());
    }
}
