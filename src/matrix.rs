//! Dense matrix operations.
//!
//! A minimal, row-major dense matrix type with the operations the row
//! reduction engine and the linear-system solver build on: checked and
//! unchecked access, row/column extraction and replacement, slicing,
//! arithmetic, augmentation and a small-size determinant.
//!
//! # Design
//!
//! - **Row-major storage**: `data[i * cols + j] = A[i, j]`
//! - **Value semantics**: `clone()` is a deep copy; transforms never alias
//! - **Explicit error handling**: checked operations return
//!   `Result<T, LinalgError>`
//!
//! # Examples
//!
//! ```
//! use la_calc::matrix::Matrix;
//!
//! let a = Matrix::from_rows(&[
//!     &[1.0, 2.0],
//!     &[3.0, 4.0],
//! ]);
//! let b = a.transpose();
//! let c = a.mul_mat(&b).unwrap();
//! assert_eq!(c.rows(), 2);
//! assert_eq!(c.cols(), 2);
//! assert_eq!(a.determinant().unwrap(), -2.0);
//! ```

use std::ops::{Index, IndexMut};

use crate::approx::Tolerance;
use crate::error::{LinalgError, Result};
use crate::vector::Vector;

/// A dense matrix stored in row-major order.
///
/// # Storage
///
/// Elements are stored contiguously: `data[i * cols + j]` holds `A[i, j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Creates a matrix from raw data in row-major order.
    ///
    /// # Errors
    /// Returns `Err` if `data.len() != rows * cols`.
    ///
    /// # Examples
    /// ```
    /// use la_calc::matrix::Matrix;
    /// let m = Matrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    /// assert_eq!(m.get(0, 2), 3.0);
    /// assert_eq!(m.get(1, 0), 4.0);
    /// ```
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(LinalgError::InvalidData {
                expected: rows * cols,
                got: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Creates a matrix from row slices.
    ///
    /// An empty slice yields the 0×0 matrix.
    ///
    /// # Panics
    /// Panics if rows have inconsistent lengths.
    ///
    /// # Examples
    /// ```
    /// use la_calc::matrix::Matrix;
    /// let m = Matrix::from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]);
    /// assert_eq!(m.get(1, 1), 4.0);
    /// ```
    pub fn from_rows(rows: &[&[f64]]) -> Self {
        let ncols = rows.first().map_or(0, |r| r.len());
        let nrows = rows.len();
        let mut data = Vec::with_capacity(nrows * ncols);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(
                row.len(),
                ncols,
                "row {i} has {} columns, expected {ncols}",
                row.len()
            );
            data.extend_from_slice(row);
        }
        Self {
            data,
            rows: nrows,
            cols: ncols,
        }
    }

    /// Creates a matrix from owned rows.
    ///
    /// # Errors
    /// Returns `InvalidData` if the rows have different lengths.
    pub fn try_from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let ncols = rows.first().map_or(0, Vec::len);
        let nrows = rows.len();
        let mut data = Vec::with_capacity(nrows * ncols);
        for row in rows {
            if row.len() != ncols {
                return Err(LinalgError::InvalidData {
                    expected: ncols,
                    got: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self {
            data,
            rows: nrows,
            cols: ncols,
        })
    }

    /// Creates a matrix whose columns are the given vectors.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for an empty slice and `DimensionMismatch`
    /// if the vectors have different lengths.
    ///
    /// # Examples
    /// ```
    /// use la_calc::matrix::Matrix;
    /// use la_calc::vector::Vector;
    /// let m = Matrix::from_cols(&[
    ///     Vector::from(vec![1.0, 2.0]),
    ///     Vector::from(vec![3.0, 4.0]),
    /// ]).unwrap();
    /// assert_eq!(m.get(0, 1), 3.0);
    /// assert_eq!(m.get(1, 0), 2.0);
    /// ```
    pub fn from_cols(cols: &[Vector]) -> Result<Self> {
        let first = cols.first().ok_or(LinalgError::InvalidArgument {
            reason: "at least one column vector is required",
        })?;
        let nrows = first.len();
        let mut m = Self::zeros(nrows, cols.len());
        for (j, col) in cols.iter().enumerate() {
            m.set_col(j, col)?;
        }
        Ok(m)
    }

    /// Creates a zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    /// Creates a matrix with every entry set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Creates an identity matrix.
    ///
    /// # Examples
    /// ```
    /// use la_calc::matrix::Matrix;
    /// let eye = Matrix::identity(3);
    /// assert_eq!(eye.get(0, 0), 1.0);
    /// assert_eq!(eye.get(0, 1), 0.0);
    /// assert_eq!(eye.get(2, 2), 1.0);
    /// ```
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns true if both matrices have the same shape.
    pub fn has_same_dimensions(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    /// Returns the element at (row, col).
    ///
    /// # Panics
    /// Panics if indices are out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Sets the element at (row, col).
    ///
    /// # Panics
    /// Panics if indices are out of bounds.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.rows {
            return Err(LinalgError::IndexOutOfRange {
                what: "row",
                index: row,
                len: self.rows,
            });
        }
        Ok(())
    }

    fn check_col(&self, col: usize) -> Result<()> {
        if col >= self.cols {
            return Err(LinalgError::IndexOutOfRange {
                what: "column",
                index: col,
                len: self.cols,
            });
        }
        Ok(())
    }

    /// Checked element access.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if either index is out of bounds.
    pub fn at(&self, row: usize, col: usize) -> Result<f64> {
        self.check_row(row)?;
        self.check_col(col)?;
        Ok(self.get(row, col))
    }

    /// Returns the raw data as a slice.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Returns a row as a slice.
    ///
    /// # Panics
    /// Panics if `row >= rows()`.
    #[inline]
    pub fn row_slice(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Returns a copy of row `row`.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if `row >= rows()`.
    pub fn row(&self, row: usize) -> Result<Vector> {
        self.check_row(row)?;
        Ok(Vector::from_slice(self.row_slice(row)))
    }

    /// Returns a copy of column `col`.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if `col >= cols()`.
    pub fn column(&self, col: usize) -> Result<Vector> {
        self.check_col(col)?;
        Ok((0..self.rows).map(|i| self.get(i, col)).collect())
    }

    /// Replaces row `row` with `v`.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` for a bad index and `DimensionMismatch` if
    /// `v.len() != cols()`.
    pub fn set_row(&mut self, row: usize, v: &Vector) -> Result<()> {
        self.check_row(row)?;
        if v.len() != self.cols {
            return Err(LinalgError::DimensionMismatch {
                op: "set_row",
                expected: vec![self.cols],
                got: vec![v.len()],
            });
        }
        let start = row * self.cols;
        self.data[start..start + self.cols].copy_from_slice(v.as_slice());
        Ok(())
    }

    /// Replaces column `col` with `v`.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` for a bad index and `DimensionMismatch` if
    /// `v.len() != rows()`.
    pub fn set_col(&mut self, col: usize, v: &Vector) -> Result<()> {
        self.check_col(col)?;
        if v.len() != self.rows {
            return Err(LinalgError::DimensionMismatch {
                op: "set_col",
                expected: vec![self.rows],
                got: vec![v.len()],
            });
        }
        for (i, &x) in v.iter().enumerate() {
            self.set(i, col, x);
        }
        Ok(())
    }

    /// New matrix with rows `[lower, upper)`.
    ///
    /// # Errors
    /// Returns `RangeOutOfBounds` if `lower > upper` or `upper > rows()`.
    pub fn row_range(&self, lower: usize, upper: usize) -> Result<Self> {
        if lower > upper || upper > self.rows {
            return Err(LinalgError::RangeOutOfBounds {
                what: "row",
                start: lower,
                end: upper,
                len: self.rows,
            });
        }
        Ok(Self {
            data: self.data[lower * self.cols..upper * self.cols].to_vec(),
            rows: upper - lower,
            cols: self.cols,
        })
    }

    /// New matrix with columns `[lower, upper)`.
    ///
    /// # Errors
    /// Returns `RangeOutOfBounds` if `lower > upper` or `upper > cols()`.
    pub fn col_range(&self, lower: usize, upper: usize) -> Result<Self> {
        if lower > upper || upper > self.cols {
            return Err(LinalgError::RangeOutOfBounds {
                what: "column",
                start: lower,
                end: upper,
                len: self.cols,
            });
        }
        let width = upper - lower;
        let mut data = Vec::with_capacity(self.rows * width);
        for i in 0..self.rows {
            data.extend_from_slice(&self.row_slice(i)[lower..upper]);
        }
        Ok(Self {
            data,
            rows: self.rows,
            cols: width,
        })
    }

    /// Returns true if the matrix is square.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Exchanges rows `a` and `b` in place.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let cols = self.cols;
        for j in 0..cols {
            self.data.swap(a * cols + j, b * cols + j);
        }
    }

    /// Replaces every near-zero entry with an exact `0.0`.
    pub fn flush_near_zero(&mut self, tol: Tolerance) {
        for x in &mut self.data {
            if tol.is_near_zero(*x) {
                *x = 0.0;
            }
        }
    }

    // ========================================================================
    // Basic Operations
    // ========================================================================

    /// Transpose: returns Aᵀ.
    ///
    /// # Examples
    /// ```
    /// use la_calc::matrix::Matrix;
    /// let m = Matrix::from_rows(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
    /// let t = m.transpose();
    /// assert_eq!(t.rows(), 3);
    /// assert_eq!(t.cols(), 2);
    /// assert_eq!(t.get(0, 1), 4.0);
    /// ```
    pub fn transpose(&self) -> Self {
        let mut result = Self::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                result.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        result
    }

    fn check_same_shape(&self, other: &Self, op: &'static str) -> Result<()> {
        if !self.has_same_dimensions(other) {
            return Err(LinalgError::DimensionMismatch {
                op,
                expected: vec![self.rows, self.cols],
                got: vec![other.rows, other.cols],
            });
        }
        Ok(())
    }

    /// Matrix addition: A + B.
    ///
    /// # Errors
    /// Returns `Err` if dimensions do not match.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other, "matrix addition")?;
        let data: Vec<f64> = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a + b)
            .collect();
        Ok(Self {
            data,
            rows: self.rows,
            cols: self.cols,
        })
    }

    /// Matrix subtraction: A - B.
    ///
    /// # Errors
    /// Returns `Err` if dimensions do not match.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other, "matrix subtraction")?;
        let data: Vec<f64> = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a - b)
            .collect();
        Ok(Self {
            data,
            rows: self.rows,
            cols: self.cols,
        })
    }

    /// Scalar multiplication: c · A.
    pub fn scale(&self, c: f64) -> Self {
        self.map(|x| c * x)
    }

    /// Applies `f` to every entry.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            data: self.data.iter().map(|&x| f(x)).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Matrix multiplication: A · B.
    ///
    /// Uses i-k-j loop order for better cache locality on row-major storage.
    ///
    /// # Errors
    /// Returns `Err` if `self.cols != other.rows`.
    ///
    /// # Complexity
    /// O(n·m·p) where self is n×m and other is m×p.
    pub fn mul_mat(&self, other: &Self) -> Result<Self> {
        if self.cols != other.rows {
            return Err(LinalgError::DimensionMismatch {
                op: "matrix multiplication",
                expected: vec![self.cols, other.cols],
                got: vec![other.rows, other.cols],
            });
        }
        let mut result = Self::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a_ik = self.data[i * self.cols + k];
                let row_start = i * other.cols;
                let other_row_start = k * other.cols;
                for j in 0..other.cols {
                    result.data[row_start + j] += a_ik * other.data[other_row_start + j];
                }
            }
        }
        Ok(result)
    }

    /// Matrix-vector multiplication: A · v.
    ///
    /// # Errors
    /// Returns `Err` if `self.cols != v.len()`.
    pub fn mul_vec(&self, v: &Vector) -> Result<Vector> {
        if self.cols != v.len() {
            return Err(LinalgError::DimensionMismatch {
                op: "matrix-vector multiplication",
                expected: vec![self.cols],
                got: vec![v.len()],
            });
        }
        Ok((0..self.rows)
            .map(|i| {
                self.row_slice(i)
                    .iter()
                    .zip(v.iter())
                    .map(|(&a, &b)| a * b)
                    .sum()
            })
            .collect())
    }

    /// Checks whether the matrix is symmetric within tolerance.
    pub fn is_symmetric(&self, tol: Tolerance) -> bool {
        if self.rows != self.cols {
            return false;
        }
        for i in 0..self.rows {
            for j in (i + 1)..self.cols {
                if !tol.nearly_equal(self.get(i, j), self.get(j, i)) {
                    return false;
                }
            }
        }
        true
    }

    /// Element-wise comparison with [`Tolerance::nearly_equal`].
    pub fn approx_eq(&self, other: &Self, tol: Tolerance) -> bool {
        self.has_same_dimensions(other)
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&a, &b)| tol.nearly_equal(a, b))
    }

    /// Appends `b` as an extra column: `(A | b)`.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if `b.len() != rows()`.
    ///
    /// # Examples
    /// ```
    /// use la_calc::matrix::Matrix;
    /// use la_calc::vector::Vector;
    /// let a = Matrix::from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]);
    /// let ab = a.augment(&Vector::from(vec![5.0, 6.0])).unwrap();
    /// assert_eq!(ab, Matrix::from_rows(&[&[1.0, 2.0, 5.0], &[3.0, 4.0, 6.0]]));
    /// ```
    pub fn augment(&self, b: &Vector) -> Result<Self> {
        if b.len() != self.rows {
            return Err(LinalgError::DimensionMismatch {
                op: "augment",
                expected: vec![self.rows],
                got: vec![b.len()],
            });
        }
        let cols = self.cols + 1;
        let mut data = Vec::with_capacity(self.rows * cols);
        for i in 0..self.rows {
            data.extend_from_slice(self.row_slice(i));
            data.push(b[i]);
        }
        Ok(Self {
            data,
            rows: self.rows,
            cols,
        })
    }

    /// Determinant of a 1×1, 2×2 or 3×3 matrix.
    ///
    /// The 3×3 case uses the rule of Sarrus.
    ///
    /// # Errors
    /// Returns `Domain` if the matrix is not square, or is empty or larger
    /// than 3×3.
    ///
    /// # Examples
    /// ```
    /// use la_calc::matrix::Matrix;
    /// let m = Matrix::from_rows(&[&[2.0, 3.0], &[1.0, 4.0]]);
    /// assert_eq!(m.determinant().unwrap(), 5.0);
    /// assert!(Matrix::identity(4).determinant().is_err());
    /// ```
    pub fn determinant(&self) -> Result<f64> {
        if !self.is_square() {
            return Err(LinalgError::Domain {
                reason: "determinant is defined only for square matrices",
            });
        }
        let a = |i: usize, j: usize| self.get(i, j);
        match self.rows {
            1 => Ok(a(0, 0)),
            2 => Ok(a(0, 0) * a(1, 1) - a(0, 1) * a(1, 0)),
            3 => Ok(a(0, 0) * a(1, 1) * a(2, 2)
                + a(0, 1) * a(1, 2) * a(2, 0)
                + a(0, 2) * a(1, 0) * a(2, 1)
                - a(2, 0) * a(1, 1) * a(0, 2)
                - a(2, 1) * a(1, 2) * a(0, 0)
                - a(2, 2) * a(1, 0) * a(0, 1)),
            _ => Err(LinalgError::Domain {
                reason: "determinant is implemented only for 1x1 to 3x3 matrices",
            }),
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row * self.cols + col]
    }
}

// ============================================================================
// Display
// ============================================================================

impl std::fmt::Display for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.rows {
            write!(f, "[")?;
            for j in 0..self.cols {
                if j > 0 {
                    write!(f, ",")?;
                }
                let x = self.get(i, j);
                match f.precision() {
                    Some(p) => write!(f, " {x:.p$}")?,
                    None => write!(f, " {x}")?,
                }
            }
            writeln!(f, " ]")?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
