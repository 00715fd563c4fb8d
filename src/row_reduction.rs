//! Gaussian and Gauss-Jordan elimination.
//!
//! Row reduction uses partial pivoting: the pivot is taken from the leftmost
//! column that still has a non-negligible entry, choosing the row with the
//! largest magnitude in that column. Every zero test goes through the
//! [`Tolerance`] owned by the [`RowReducer`].
//!
//! # Conventions
//!
//! - [`RowReducer::row_echelon`] does **not** normalize pivots.
//! - [`RowReducer::reduced_row_echelon`] scales every pivot to exactly `1.0`
//!   and clears the rest of each pivot column.
//! - Both transforms copy their input and return entries that are either
//!   exactly `0.0` or larger than the zero threshold.
//!
//! # Examples
//!
//! ```
//! use la_calc::matrix::Matrix;
//! use la_calc::row_reduction::{is_rref, rank, reduced_row_echelon};
//!
//! let a = Matrix::from_rows(&[&[1.0, 2.0], &[2.0, 4.0]]);
//! let r = reduced_row_echelon(&a);
//! assert_eq!(r, Matrix::from_rows(&[&[1.0, 2.0], &[0.0, 0.0]]));
//! assert!(is_rref(&r));
//! assert_eq!(rank(&a), 1);
//! ```

use tracing::{debug, trace};

use crate::approx::Tolerance;
use crate::matrix::Matrix;

/// A selected pivot entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    /// Row holding the pivot before it is swapped into place.
    pub row: usize,
    /// Pivot column.
    pub col: usize,
    /// Value of the pivot entry.
    pub value: f64,
}

/// Row reduction engine parameterized by a zero tolerance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RowReducer {
    tol: Tolerance,
}

impl RowReducer {
    /// Creates a reducer that uses `tol` for every zero test.
    pub fn new(tol: Tolerance) -> Self {
        Self { tol }
    }

    /// The tolerance used by this reducer.
    pub fn tolerance(&self) -> Tolerance {
        self.tol
    }

    // ========================================================================
    // Pivot Search
    // ========================================================================

    /// Finds the pivot for the submatrix starting at `start_row`.
    ///
    /// Scans columns left to right and returns, for the first column with a
    /// non-negligible entry in rows `start_row..`, the row with the largest
    /// absolute value (the first one on ties). Returns `None` when the
    /// remaining submatrix is entirely near-zero.
    ///
    /// # Examples
    /// ```
    /// use la_calc::matrix::Matrix;
    /// use la_calc::row_reduction::RowReducer;
    ///
    /// let a = Matrix::from_rows(&[&[0.0, 1.0], &[0.0, -3.0], &[0.0, 2.0]]);
    /// let p = RowReducer::default().find_leftmost_pivot(&a, 0).unwrap();
    /// assert_eq!((p.row, p.col, p.value), (1, 1, -3.0));
    /// ```
    pub fn find_leftmost_pivot(&self, a: &Matrix, start_row: usize) -> Option<Pivot> {
        for col in 0..a.cols() {
            let mut best: Option<Pivot> = None;
            for row in start_row..a.rows() {
                let value = a.get(row, col);
                if self.tol.is_near_zero(value) {
                    continue;
                }
                if best.map_or(true, |b| value.abs() > b.value.abs()) {
                    best = Some(Pivot { row, col, value });
                }
            }
            if best.is_some() {
                return best;
            }
        }
        None
    }

    // ========================================================================
    // Elimination Primitives
    // ========================================================================

    /// Subtracts a multiple of `lead_row` from `row` so that
    /// `a[row][lead_col]` becomes exactly zero.
    ///
    /// Only columns `lead_col..` are touched. Does nothing when the target
    /// entry is already near-zero.
    ///
    /// # Panics
    /// Panics if the pivot `a[lead_row][lead_col]` is near-zero or an index
    /// is out of bounds.
    pub fn row_replace(&self, a: &mut Matrix, row: usize, lead_col: usize, lead_row: usize) {
        assert!(
            row < a.rows() && lead_row < a.rows() && lead_col < a.cols(),
            "row_replace: indices ({row}, {lead_row}, {lead_col}) out of bounds for {}x{}",
            a.rows(),
            a.cols()
        );
        let target = a.get(row, lead_col);
        if self.tol.is_near_zero(target) {
            return;
        }
        let pivot = a.get(lead_row, lead_col);
        assert!(
            !self.tol.is_near_zero(pivot),
            "row_replace: near-zero pivot {pivot} at ({lead_row}, {lead_col})"
        );
        let factor = target / pivot;
        for j in (lead_col + 1)..a.cols() {
            let v = a.get(row, j) - factor * a.get(lead_row, j);
            a.set(row, j, v);
        }
        a.set(row, lead_col, 0.0);
    }

    /// Divides every entry of `row` by `pivot_value`.
    ///
    /// Does nothing when `pivot_value` is near-zero.
    pub fn normalize_row(&self, a: &mut Matrix, row: usize, pivot_value: f64) {
        if self.tol.is_near_zero(pivot_value) {
            return;
        }
        for j in 0..a.cols() {
            let v = a.get(row, j) / pivot_value;
            a.set(row, j, v);
        }
    }

    /// Clears column `lead_col` in every row below `lead_row`.
    pub fn eliminate_below(&self, a: &mut Matrix, lead_row: usize, lead_col: usize) {
        for row in (lead_row + 1)..a.rows() {
            self.row_replace(a, row, lead_col, lead_row);
        }
    }

    /// Clears column `lead_col` in every row above `lead_row`.
    pub fn eliminate_above(&self, a: &mut Matrix, lead_row: usize, lead_col: usize) {
        for row in 0..lead_row {
            self.row_replace(a, row, lead_col, lead_row);
        }
    }

    // ========================================================================
    // Echelon Forms
    // ========================================================================

    /// Row-echelon form of `a` by Gaussian elimination with partial pivoting.
    ///
    /// Pivots keep their computed values. The input is not modified.
    ///
    /// # Complexity
    /// O(rows² · cols).
    pub fn row_echelon(&self, a: &Matrix) -> Matrix {
        let mut r = a.clone();
        for lead_row in 0..r.rows() {
            let Some(pivot) = self.find_leftmost_pivot(&r, lead_row) else {
                break;
            };
            trace!(
                lead_row,
                pivot_row = pivot.row,
                pivot_col = pivot.col,
                value = pivot.value,
                "selected pivot"
            );
            r.swap_rows(lead_row, pivot.row);
            self.eliminate_below(&mut r, lead_row, pivot.col);
        }
        r.flush_near_zero(self.tol);
        debug!(rows = r.rows(), cols = r.cols(), "computed row echelon form");
        r
    }

    /// Reduced row-echelon form of `a` by Gauss-Jordan elimination.
    ///
    /// Every pivot is exactly `1.0` and is the only non-zero entry of its
    /// column. The input is not modified.
    ///
    /// # Examples
    /// ```
    /// use la_calc::matrix::Matrix;
    /// use la_calc::row_reduction::RowReducer;
    ///
    /// let a = Matrix::from_rows(&[
    ///     &[2.0, 1.0, -1.0],
    ///     &[-3.0, -1.0, 2.0],
    ///     &[-2.0, 1.0, 2.0],
    /// ]);
    /// assert_eq!(RowReducer::default().reduced_row_echelon(&a), Matrix::identity(3));
    /// ```
    ///
    /// # Complexity
    /// O(rows² · cols).
    pub fn reduced_row_echelon(&self, a: &Matrix) -> Matrix {
        let mut r = self.row_echelon(a);
        for lead_row in 0..r.rows() {
            let Some(col) = self.leading_col(r.row_slice(lead_row)) else {
                break;
            };
            let pivot = r.get(lead_row, col);
            self.normalize_row(&mut r, lead_row, pivot);
            r.set(lead_row, col, 1.0);
            self.eliminate_above(&mut r, lead_row, col);
        }
        r.flush_near_zero(self.tol);
        debug!(
            rows = r.rows(),
            cols = r.cols(),
            "computed reduced row echelon form"
        );
        r
    }

    fn leading_col(&self, row: &[f64]) -> Option<usize> {
        row.iter().position(|&x| !self.tol.is_near_zero(x))
    }

    // ========================================================================
    // Predicates
    // ========================================================================

    /// Checks the row-echelon shape: zero rows are at the bottom and the
    /// column of the leading entry strictly increases from row to row.
    ///
    /// Leading entries may have any non-negligible value.
    pub fn is_ref(&self, a: &Matrix) -> bool {
        let mut prev: Option<usize> = None;
        let mut seen_zero_row = false;
        for i in 0..a.rows() {
            match self.leading_col(a.row_slice(i)) {
                None => seen_zero_row = true,
                Some(col) => {
                    if seen_zero_row || prev.is_some_and(|p| col <= p) {
                        return false;
                    }
                    prev = Some(col);
                }
            }
        }
        true
    }

    /// Checks the reduced row-echelon shape: [`is_ref`](Self::is_ref), every
    /// leading entry is exactly `1.0` and every pivot column is a standard
    /// basis vector.
    pub fn is_rref(&self, a: &Matrix) -> bool {
        if !self.is_ref(a) {
            return false;
        }
        for i in 0..a.rows() {
            let Some(col) = self.leading_col(a.row_slice(i)) else {
                break;
            };
            if a.get(i, col) != 1.0 {
                return false;
            }
            let clear = (0..a.rows())
                .filter(|&k| k != i)
                .all(|k| self.tol.is_near_zero(a.get(k, col)));
            if !clear {
                return false;
            }
        }
        true
    }

    // ========================================================================
    // Rank
    // ========================================================================

    /// Rank of `a`: the number of non-zero rows of its row-echelon form.
    pub fn rank(&self, a: &Matrix) -> usize {
        self.rank_from_ref(&self.row_echelon(a))
    }

    /// Number of rows of `r` that are not entirely near-zero.
    ///
    /// `r` is expected to be in row-echelon form already.
    pub fn rank_from_ref(&self, r: &Matrix) -> usize {
        (0..r.rows())
            .filter(|&i| self.leading_col(r.row_slice(i)).is_some())
            .count()
    }
}

// ============================================================================
// Default-tolerance shortcuts
// ============================================================================

/// [`RowReducer::row_echelon`] with the default tolerance.
pub fn row_echelon(a: &Matrix) -> Matrix {
    RowReducer::default().row_echelon(a)
}

/// [`RowReducer::reduced_row_echelon`] with the default tolerance.
pub fn reduced_row_echelon(a: &Matrix) -> Matrix {
    RowReducer::default().reduced_row_echelon(a)
}

/// [`RowReducer::is_ref`] with the default tolerance.
pub fn is_ref(a: &Matrix) -> bool {
    RowReducer::default().is_ref(a)
}

/// [`RowReducer::is_rref`] with the default tolerance.
pub fn is_rref(a: &Matrix) -> bool {
    RowReducer::default().is_rref(a)
}

/// [`RowReducer::rank`] with the default tolerance.
pub fn rank(a: &Matrix) -> usize {
    RowReducer::default().rank(a)
}

/// [`RowReducer::rank_from_ref`] with the default tolerance.
pub fn rank_from_ref(r: &Matrix) -> usize {
    RowReducer::default().rank_from_ref(r)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn reducer() -> RowReducer {
        RowReducer::default()
    }

    // --- Pivot search ---

    #[test]
    fn test_pivot_largest_in_leftmost_column() {
        let a = Matrix::from_rows(&[&[1.0, 5.0], &[-4.0, 0.0], &[4.0, 1.0]]);
        let p = reducer().find_leftmost_pivot(&a, 0).unwrap();
        // ties keep the first row
        assert_eq!((p.row, p.col, p.value), (1, 0, -4.0));
    }

    #[test]
    fn test_pivot_skips_zero_columns() {
        let a = Matrix::from_rows(&[&[0.0, 1e-14, 2.0], &[0.0, 0.0, 3.0]]);
        let p = reducer().find_leftmost_pivot(&a, 0).unwrap();
        assert_eq!((p.row, p.col), (1, 2));
    }

    #[test]
    fn test_pivot_respects_start_row() {
        let a = Matrix::from_rows(&[&[9.0, 0.0], &[0.0, 0.0], &[0.0, 2.0]]);
        let p = reducer().find_leftmost_pivot(&a, 1).unwrap();
        assert_eq!((p.row, p.col), (2, 1));
    }

    #[test]
    fn test_no_pivot() {
        let a = Matrix::zeros(3, 3);
        assert!(reducer().find_leftmost_pivot(&a, 0).is_none());
        let b = Matrix::identity(2);
        assert!(reducer().find_leftmost_pivot(&b, 2).is_none());
        assert!(reducer().find_leftmost_pivot(&Matrix::zeros(0, 0), 0).is_none());
    }

    // --- Primitives ---

    #[test]
    fn test_row_replace() {
        let mut a = Matrix::from_rows(&[&[2.0, 4.0, 6.0], &[1.0, 3.0, 2.0]]);
        reducer().row_replace(&mut a, 1, 0, 0);
        assert_eq!(a, Matrix::from_rows(&[&[2.0, 4.0, 6.0], &[0.0, 1.0, -1.0]]));
    }

    #[test]
    fn test_row_replace_noop_on_zero_target() {
        let mut a = Matrix::from_rows(&[&[2.0, 4.0], &[1e-15, 3.0]]);
        let before = a.clone();
        reducer().row_replace(&mut a, 1, 0, 0);
        assert_eq!(a, before);
    }

    #[test]
    #[should_panic(expected = "near-zero pivot")]
    fn test_row_replace_zero_pivot_panics() {
        let mut a = Matrix::from_rows(&[&[0.0, 1.0], &[1.0, 3.0]]);
        reducer().row_replace(&mut a, 1, 0, 0);
    }

    #[test]
    fn test_normalize_row() {
        let mut a = Matrix::from_rows(&[&[0.0, 4.0, 2.0]]);
        reducer().normalize_row(&mut a, 0, 4.0);
        assert_eq!(a, Matrix::from_rows(&[&[0.0, 1.0, 0.5]]));
        reducer().normalize_row(&mut a, 0, 0.0);
        assert_eq!(a, Matrix::from_rows(&[&[0.0, 1.0, 0.5]]));
    }

    #[test]
    fn test_eliminate_below_and_above() {
        let mut a = Matrix::from_rows(&[&[1.0, 2.0], &[2.0, 1.0], &[-1.0, 0.0]]);
        reducer().eliminate_below(&mut a, 0, 0);
        assert_eq!(a.column(0).unwrap().as_slice(), &[1.0, 0.0, 0.0]);
        assert_eq!(a.row(1).unwrap().as_slice(), &[0.0, -3.0]);
        reducer().eliminate_above(&mut a, 1, 1);
        assert_eq!(a.row(0).unwrap().as_slice(), &[1.0, 0.0]);
    }

    // --- Row echelon ---

    #[test]
    fn test_ref_swaps_largest_pivot_up() {
        let a = Matrix::from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let r = row_echelon(&a);
        assert!(is_ref(&r));
        assert_eq!(r.row(0).unwrap().as_slice(), &[3.0, 4.0]);
        assert_eq!(r.get(1, 0), 0.0);
        assert!((r.get(1, 1) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_ref_does_not_modify_input() {
        let a = Matrix::from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let copy = a.clone();
        let _ = row_echelon(&a);
        let _ = reduced_row_echelon(&a);
        assert_eq!(a, copy);
    }

    #[test]
    fn test_ref_zero_column_first() {
        let a = Matrix::from_rows(&[&[0.0, 0.0, 1.0], &[0.0, 2.0, 1.0], &[0.0, 4.0, 0.0]]);
        let r = row_echelon(&a);
        assert!(is_ref(&r));
        assert_eq!(r.get(0, 1), 4.0);
        assert_eq!(rank_from_ref(&r), 2);
    }

    #[test]
    fn test_ref_wide_and_tall() {
        let wide = Matrix::from_rows(&[&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 9.0]]);
        let r = row_echelon(&wide);
        assert!(is_ref(&r));
        assert_eq!(rank_from_ref(&r), 2);

        let tall = Matrix::from_rows(&[&[1.0], &[2.0], &[-7.0]]);
        let r = row_echelon(&tall);
        assert_eq!(r, Matrix::from_rows(&[&[-7.0], &[0.0], &[0.0]]));
    }

    // --- Reduced row echelon ---

    #[test]
    fn test_rref_invertible_is_identity() {
        let a = Matrix::from_rows(&[&[2.0, 1.0, -1.0], &[-3.0, -1.0, 2.0], &[-2.0, 1.0, 2.0]]);
        let r = reduced_row_echelon(&a);
        assert_eq!(r, Matrix::identity(3));
        assert!(is_rref(&r));
    }

    #[test]
    fn test_rref_singular() {
        let a = Matrix::from_rows(&[&[1.0, 2.0], &[2.0, 4.0]]);
        let r = reduced_row_echelon(&a);
        assert_eq!(r, Matrix::from_rows(&[&[1.0, 2.0], &[0.0, 0.0]]));
    }

    #[test]
    fn test_rref_with_free_columns() {
        let a = Matrix::from_rows(&[
            &[1.0, -1.0, -1.0, 2.0, 1.0],
            &[2.0, -2.0, -1.0, 3.0, 3.0],
            &[-1.0, 1.0, -1.0, 0.0, -3.0],
        ]);
        let r = reduced_row_echelon(&a);
        assert!(is_rref(&r));
        let expected = Matrix::from_rows(&[
            &[1.0, -1.0, 0.0, 1.0, 2.0],
            &[0.0, 0.0, 1.0, -1.0, 1.0],
            &[0.0, 0.0, 0.0, 0.0, 0.0],
        ]);
        assert!(r.approx_eq(&expected, Tolerance::default()), "got\n{r}");
    }

    #[test]
    fn test_rref_idempotent() {
        let a = Matrix::from_rows(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
        let r = reduced_row_echelon(&a);
        assert_eq!(reduced_row_echelon(&r), r);
    }

    // --- Predicates ---

    #[test]
    fn test_is_ref_shapes() {
        assert!(is_ref(&Matrix::from_rows(&[&[2.0, 3.0], &[0.0, 5.0]])));
        assert!(is_ref(&Matrix::from_rows(&[&[0.0, 3.0], &[0.0, 0.0]])));
        // zero row above a non-zero row
        assert!(!is_ref(&Matrix::from_rows(&[&[0.0, 0.0], &[0.0, 5.0]])));
        // leading entries in the same column
        assert!(!is_ref(&Matrix::from_rows(&[&[1.0, 3.0], &[2.0, 5.0]])));
        assert!(!is_ref(&Matrix::from_rows(&[&[0.0, 1.0], &[1.0, 0.0]])));
    }

    #[test]
    fn test_is_rref_example() {
        let m = Matrix::new(
            5,
            7,
            vec![
                1.0, 2.0, 0.0, 0.0, -3.0, 1.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, 4.0, -1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0, 3.0, -2.0, 0.0, //
                0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, //
                0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            ],
        )
        .unwrap();
        assert!(is_ref(&m));
        assert!(is_rref(&m));
    }

    #[test]
    fn test_is_rref_rejects() {
        // leading entry not 1
        assert!(!is_rref(&Matrix::from_rows(&[&[2.0, 0.0], &[0.0, 1.0]])));
        // pivot column not cleared above
        assert!(!is_rref(&Matrix::from_rows(&[&[1.0, 3.0], &[0.0, 1.0]])));
        // REF shape violated
        assert!(!is_rref(&Matrix::from_rows(&[&[0.0, 1.0], &[1.0, 0.0]])));
    }

    #[test]
    fn test_rref_boundaries() {
        assert!(is_rref(&Matrix::zeros(0, 0)));
        assert!(is_rref(&Matrix::zeros(3, 4)));
        assert!(is_rref(&Matrix::filled(1, 1, 0.0)));
        assert!(is_rref(&Matrix::filled(1, 1, 1.0)));
        assert!(!is_rref(&Matrix::filled(1, 1, 2.0)));
        assert!(!is_rref(&Matrix::filled(1, 1, -1.0)));
        assert!(is_rref(&Matrix::identity(4)));
    }

    #[test]
    fn test_custom_tolerance() {
        let loose = RowReducer::new(Tolerance::new(1e-3, 0.0).unwrap());
        let a = Matrix::from_rows(&[&[1.0, 0.0], &[0.0, 1e-4]]);
        assert_eq!(loose.rank(&a), 1);
        assert_eq!(rank(&a), 2);
        assert_eq!(loose.tolerance().abs, 1e-3);
    }

    // --- Rank ---

    #[test]
    fn test_rank() {
        assert_eq!(rank(&Matrix::identity(3)), 3);
        assert_eq!(rank(&Matrix::zeros(2, 3)), 0);
        assert_eq!(rank(&Matrix::zeros(0, 0)), 0);
        assert_eq!(rank(&Matrix::from_rows(&[&[1.0, 2.0], &[2.0, 4.0]])), 1);
        let a = Matrix::from_rows(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
        assert_eq!(rank(&a), 2);
        let b = Matrix::from_rows(&[&[1.0, 0.0, 2.0, 0.0], &[0.0, 1.0, 1.0, 0.0]]);
        assert_eq!(rank(&b), 2);
        assert_eq!(rank(&b.transpose()), 2);
    }
}
