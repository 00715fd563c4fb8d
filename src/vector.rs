//! Dense vectors.
//!
//! A fixed-length, heap-allocated vector of `f64` with checked and unchecked
//! element access, slicing helpers and the usual Euclidean operations.
//!
//! # Examples
//!
//! ```
//! use la_calc::vector::Vector;
//!
//! let u = Vector::from(vec![1.0, 2.0, 3.0]);
//! let v = Vector::from(vec![4.0, 5.0, 6.0]);
//! assert_eq!(u.dot(&v).unwrap(), 32.0);
//! assert_eq!(u.add(&v).unwrap(), Vector::from(vec![5.0, 7.0, 9.0]));
//! assert!(u.at(3).is_err());
//! ```

use std::ops::{Index, IndexMut};

use crate::approx::Tolerance;
use crate::error::{LinalgError, Result};

/// A dense vector of `f64`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    /// Creates a zero vector of length `n`.
    pub fn zeros(n: usize) -> Self {
        Self { data: vec![0.0; n] }
    }

    /// Creates a vector by copying a slice.
    pub fn from_slice(data: &[f64]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true for the zero-length vector.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Iterates over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.data.iter()
    }

    /// Consumes the vector and returns its storage.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Checked element access.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if `i >= len()`.
    pub fn at(&self, i: usize) -> Result<f64> {
        self.data
            .get(i)
            .copied()
            .ok_or(LinalgError::IndexOutOfRange {
                what: "vector",
                index: i,
                len: self.data.len(),
            })
    }

    /// Checked element assignment.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if `i >= len()`.
    pub fn set(&mut self, i: usize, value: f64) -> Result<()> {
        let len = self.data.len();
        let slot = self.data.get_mut(i).ok_or(LinalgError::IndexOutOfRange {
            what: "vector",
            index: i,
            len,
        })?;
        *slot = value;
        Ok(())
    }

    // ========================================================================
    // Slicing
    // ========================================================================

    /// Elements `[start, start + length)`.
    ///
    /// An empty slice at the very end (`start == len()`, `length == 0`) is
    /// allowed.
    ///
    /// # Errors
    /// Returns `RangeOutOfBounds` if the range does not fit.
    pub fn subvector(&self, start: usize, length: usize) -> Result<Self> {
        let n = self.data.len();
        if start > n || length > n - start {
            return Err(LinalgError::RangeOutOfBounds {
                what: "vector",
                start,
                end: start.saturating_add(length),
                len: n,
            });
        }
        Ok(Self::from_slice(&self.data[start..start + length]))
    }

    /// The first `n` elements, or the whole vector if it is shorter.
    pub fn head(&self, n: usize) -> Self {
        let n = n.min(self.data.len());
        Self::from_slice(&self.data[..n])
    }

    /// Elements from `start` to the end, empty if `start` is past the end.
    pub fn tail(&self, start: usize) -> Self {
        if start > self.data.len() {
            return Self::default();
        }
        Self::from_slice(&self.data[start..])
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    fn check_same_len(&self, other: &Self, op: &'static str) -> Result<()> {
        if self.len() != other.len() {
            return Err(LinalgError::DimensionMismatch {
                op,
                expected: vec![self.len()],
                got: vec![other.len()],
            });
        }
        Ok(())
    }

    /// Element-wise sum.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the lengths differ.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_same_len(other, "vector addition")?;
        Ok(self.data.iter().zip(&other.data).map(|(a, b)| a + b).collect())
    }

    /// Element-wise difference.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the lengths differ.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.check_same_len(other, "vector subtraction")?;
        Ok(self.data.iter().zip(&other.data).map(|(a, b)| a - b).collect())
    }

    /// Scalar multiplication: c · v.
    pub fn scale(&self, c: f64) -> Self {
        self.data.iter().map(|x| c * x).collect()
    }

    /// Dot product.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the lengths differ.
    pub fn dot(&self, other: &Self) -> Result<f64> {
        self.check_same_len(other, "dot product")?;
        Ok(self.data.iter().zip(&other.data).map(|(a, b)| a * b).sum())
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Euclidean distance `‖u - v‖`.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the lengths differ.
    pub fn distance(&self, other: &Self) -> Result<f64> {
        Ok(self.sub(other)?.norm())
    }

    /// Angle between two vectors in radians, in `[0, π]`.
    ///
    /// The cosine is clamped to `[-1, 1]` so that rounding cannot push it out
    /// of the domain of `acos`.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the lengths differ, or `Domain` if
    /// either vector has length at most `tol.abs`.
    pub fn angle(&self, other: &Self, tol: Tolerance) -> Result<f64> {
        let uv = self.dot(other)?;
        let uu = self.dot(self)?;
        let vv = other.dot(other)?;
        // compare squared norms against the squared tolerance
        let tol2 = tol.abs * tol.abs;
        if uu <= tol2 || vv <= tol2 {
            return Err(LinalgError::Domain {
                reason: "angle is undefined for a zero-length vector",
            });
        }
        let cos_theta = (uv / (uu * vv).sqrt()).clamp(-1.0, 1.0);
        Ok(cos_theta.acos())
    }

    /// Projection of `v` onto `self`: `(self·v / self·self) · self`.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the lengths differ, or `Domain` when
    /// projecting onto a zero vector.
    pub fn proj_onto(&self, v: &Self) -> Result<Self> {
        let denom = self.dot(self)?;
        if denom == 0.0 {
            return Err(LinalgError::Domain {
                reason: "cannot project onto a zero vector",
            });
        }
        Ok(self.scale(self.dot(v)? / denom))
    }

    // ========================================================================
    // Predicates
    // ========================================================================

    /// True if every element is near zero.
    pub fn is_zero(&self, tol: Tolerance) -> bool {
        self.data.iter().all(|&x| tol.is_near_zero(x))
    }

    /// Index of the first element that is not near zero.
    pub fn first_non_zero(&self, tol: Tolerance) -> Option<usize> {
        self.data.iter().position(|&x| !tol.is_near_zero(x))
    }

    /// The first element that is not near zero.
    pub fn leading_element(&self, tol: Tolerance) -> Option<f64> {
        self.first_non_zero(tol).map(|i| self.data[i])
    }

    /// True if the leading element is nearly 1.
    pub fn has_leading_one(&self, tol: Tolerance) -> bool {
        self.leading_element(tol)
            .is_some_and(|x| tol.nearly_equal(x, 1.0))
    }

    /// True if exactly one element is `1.0` and all others are near zero.
    pub fn is_standard_basis(&self, tol: Tolerance) -> bool {
        let mut one_found = false;
        for &x in &self.data {
            if tol.is_near_zero(x) {
                continue;
            }
            if x != 1.0 || one_found {
                return false;
            }
            one_found = true;
        }
        one_found
    }

    /// Element-wise comparison with [`Tolerance::nearly_equal`].
    pub fn approx_eq(&self, other: &Self, tol: Tolerance) -> bool {
        self.len() == other.len()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&a, &b)| tol.nearly_equal(a, b))
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Self { data }
    }
}

impl From<&[f64]> for Vector {
    fn from(data: &[f64]) -> Self {
        Self::from_slice(data)
    }
}

impl FromIterator<f64> for Vector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Vector {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    #[inline]
    fn index(&self, i: usize) -> &f64 {
        &self.data[i]
    }
}

impl IndexMut<usize> for Vector {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.data[i]
    }
}

impl std::fmt::Display for Vector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, x) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            match f.precision() {
                Some(p) => write!(f, " {x:.p$}")?,
                None => write!(f, " {x}")?,
            }
        }
        write!(f, " ]")
    }
}
