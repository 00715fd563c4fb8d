//! Linear systems `A · x = b`.
//!
//! The system is reduced once to the row-echelon form of the augmented matrix
//! `(A | b)`. From there the solver classifies it as having no solution, a
//! unique solution or infinitely many, and describes the solution set as
//! `particular + Σ tᵢ · directionᵢ`.
//!
//! # Examples
//!
//! ```
//! use la_calc::linear_system::{solve, SolutionKind};
//! use la_calc::matrix::Matrix;
//! use la_calc::vector::Vector;
//!
//! let a = Matrix::from_rows(&[&[1.0, 1.0], &[1.0, -1.0]]);
//! let b = Vector::from(vec![3.0, 1.0]);
//! let sol = solve(&a, &b).unwrap();
//! assert_eq!(sol.kind(), SolutionKind::Unique);
//! assert_eq!(sol.particular().unwrap().as_slice(), &[2.0, 1.0]);
//! ```

use std::fmt;

use tracing::debug;

use crate::error::{LinalgError, Result};
use crate::matrix::Matrix;
use crate::row_reduction::RowReducer;
use crate::vector::Vector;

/// Pivot and free coefficient columns of an echelon-form augmented matrix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PivotInfo {
    /// Pivot column of each pivot row, top to bottom (strictly increasing).
    pub pivot_cols: Vec<usize>,
    /// Remaining coefficient columns, increasing.
    pub free_cols: Vec<usize>,
}

impl PivotInfo {
    /// Rank of the coefficient matrix.
    pub fn rank(&self) -> usize {
        self.pivot_cols.len()
    }

    /// Number of free variables.
    pub fn nullity(&self) -> usize {
        self.free_cols.len()
    }
}

/// Result of eliminating an augmented system.
#[derive(Debug, Clone, PartialEq)]
pub struct EliminatedSystem {
    /// Row-echelon form of `(A | b)`.
    pub r: Matrix,
    /// Pivot structure of the coefficient part of `r`.
    pub pivots: PivotInfo,
    /// Some zero coefficient row has a non-zero right-hand side.
    pub inconsistent: bool,
}

/// Number of solutions of a linear system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionKind {
    None,
    Unique,
    Infinite,
}

impl fmt::Display for SolutionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "no solution",
            Self::Unique => "unique solution",
            Self::Infinite => "infinitely many solutions",
        };
        f.write_str(s)
    }
}

/// Solution set of a linear system.
///
/// For [`LinearSystemSolution::Infinite`] every solution is
/// `particular + Σ tᵢ · directions[i]`, one direction per free variable.
#[derive(Debug, Clone, PartialEq)]
pub enum LinearSystemSolution {
    /// The system is inconsistent.
    None,
    /// Exactly one solution.
    Unique(Vector),
    /// A particular solution (free variables set to zero) and a basis of the
    /// null space.
    Infinite {
        particular: Vector,
        directions: Vec<Vector>,
    },
}

impl LinearSystemSolution {
    /// Classification of this solution set.
    pub fn kind(&self) -> SolutionKind {
        match self {
            Self::None => SolutionKind::None,
            Self::Unique(_) => SolutionKind::Unique,
            Self::Infinite { .. } => SolutionKind::Infinite,
        }
    }

    /// The unique or particular solution, if any.
    pub fn particular(&self) -> Option<&Vector> {
        match self {
            Self::None => None,
            Self::Unique(x) => Some(x),
            Self::Infinite { particular, .. } => Some(particular),
        }
    }

    /// Null-space directions; empty unless the solution set is infinite.
    pub fn directions(&self) -> &[Vector] {
        match self {
            Self::Infinite { directions, .. } => directions,
            _ => &[],
        }
    }

    pub fn has_solution(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn is_unique(&self) -> bool {
        matches!(self, Self::Unique(_))
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinite { .. })
    }
}

impl RowReducer {
    /// Splits the coefficient columns of an echelon-form augmented matrix
    /// into pivot and free columns.
    ///
    /// The last column of `r` is the right-hand side and is never classified.
    pub fn find_pivots_and_free_cols(&self, r: &Matrix) -> PivotInfo {
        let mut info = PivotInfo::default();
        let Some(n) = r.cols().checked_sub(1) else {
            return info;
        };
        let rank = self.rank_from_ref(r);
        let tol = self.tolerance();
        let mut pivot_row = 0;
        for col in 0..n {
            if pivot_row < rank && !tol.is_near_zero(r.get(pivot_row, col)) {
                info.pivot_cols.push(col);
                pivot_row += 1;
            } else {
                info.free_cols.push(col);
            }
        }
        info
    }

    /// Reduces `(A | b)` to row-echelon form and records its pivot structure
    /// and consistency.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if `b.len() != a.rows()`.
    pub fn eliminate_system(&self, a: &Matrix, b: &Vector) -> Result<EliminatedSystem> {
        let r = self.row_echelon(&a.augment(b)?);
        let pivots = self.find_pivots_and_free_cols(&r);
        let rhs = r.cols() - 1;
        let tol = self.tolerance();
        let inconsistent =
            (pivots.rank()..r.rows()).any(|i| !tol.is_near_zero(r.get(i, rhs)));
        debug!(
            rank = pivots.rank(),
            nullity = pivots.nullity(),
            inconsistent,
            "eliminated linear system"
        );
        Ok(EliminatedSystem {
            r,
            pivots,
            inconsistent,
        })
    }

    /// Classifies `A · x = b` without building the solution.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if `b.len() != a.rows()`.
    pub fn n_solutions(&self, a: &Matrix, b: &Vector) -> Result<SolutionKind> {
        let sys = self.eliminate_system(a, b)?;
        Ok(if sys.inconsistent {
            SolutionKind::None
        } else if sys.pivots.free_cols.is_empty() {
            SolutionKind::Unique
        } else {
            SolutionKind::Infinite
        })
    }

    /// Solves `A · x = b`.
    ///
    /// Pivot variables are resolved by back-substitution from the bottom
    /// pivot row upwards, once for the particular solution (free variables
    /// zero) and once per free variable for the homogeneous directions.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if `b.len() != a.rows()`.
    ///
    /// # Panics
    /// Panics if a pivot of the reduced system is near-zero, which the
    /// elimination never produces.
    ///
    /// # Examples
    /// ```
    /// use la_calc::linear_system::SolutionKind;
    /// use la_calc::matrix::Matrix;
    /// use la_calc::row_reduction::RowReducer;
    /// use la_calc::vector::Vector;
    ///
    /// let a = Matrix::from_rows(&[&[1.0, 2.0], &[2.0, 4.0]]);
    /// let sol = RowReducer::default().solve(&a, &Vector::from(vec![3.0, 6.0])).unwrap();
    /// assert_eq!(sol.kind(), SolutionKind::Infinite);
    /// assert_eq!(sol.directions().len(), 1);
    /// ```
    pub fn solve(&self, a: &Matrix, b: &Vector) -> Result<LinearSystemSolution> {
        let sys = self.eliminate_system(a, b)?;
        if sys.inconsistent {
            return Ok(LinearSystemSolution::None);
        }
        let (particular, directions) = self.back_substitute(&sys.r, &sys.pivots);
        Ok(if directions.is_empty() {
            LinearSystemSolution::Unique(particular)
        } else {
            LinearSystemSolution::Infinite {
                particular,
                directions,
            }
        })
    }

    fn back_substitute(&self, r: &Matrix, pivots: &PivotInfo) -> (Vector, Vec<Vector>) {
        let n = r.cols() - 1;
        let mut particular = Vector::zeros(n);
        let mut directions: Vec<Vector> = pivots
            .free_cols
            .iter()
            .map(|&f| {
                let mut d = Vector::zeros(n);
                d[f] = 1.0;
                d
            })
            .collect();

        for (i, &p) in pivots.pivot_cols.iter().enumerate().rev() {
            let row = r.row_slice(i);
            let pivot = row[p];
            assert!(
                !self.tolerance().is_near_zero(pivot),
                "back substitution: near-zero pivot {pivot} at ({i}, {p})"
            );
            let coeffs = &row[p + 1..n];
            let x = (row[n] - tail_dot(coeffs, &particular, p + 1)) / pivot;
            particular[p] = x;
            for d in &mut directions {
                let x = -tail_dot(coeffs, d, p + 1) / pivot;
                d[p] = x;
            }
        }
        (particular, directions)
    }

    /// Checks whether `b` is a linear combination of `vectors`.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for an empty `vectors` slice and
    /// `DimensionMismatch` if the vectors or `b` differ in length.
    pub fn is_in_span(&self, vectors: &[Vector], b: &Vector) -> Result<bool> {
        let a = Matrix::from_cols(vectors)?;
        if b.len() != a.rows() {
            return Err(LinalgError::DimensionMismatch {
                op: "is_in_span",
                expected: vec![a.rows()],
                got: vec![b.len()],
            });
        }
        let ab = a.augment(b)?;
        Ok(self.rank(&a) == self.rank(&ab))
    }
}

/// `Σ coeffs[k] · x[offset + k]`.
fn tail_dot(coeffs: &[f64], x: &Vector, offset: usize) -> f64 {
    coeffs
        .iter()
        .zip(&x.as_slice()[offset..])
        .map(|(c, v)| c * v)
        .sum()
}

// ============================================================================
// Default-tolerance shortcuts
// ============================================================================

/// The augmented matrix `(A | b)`, see [`Matrix::augment`].
///
/// # Errors
/// Returns `DimensionMismatch` if `b.len() != a.rows()`.
pub fn augment(a: &Matrix, b: &Vector) -> Result<Matrix> {
    a.augment(b)
}

/// [`RowReducer::find_pivots_and_free_cols`] with the default tolerance.
pub fn find_pivots_and_free_cols(r: &Matrix) -> PivotInfo {
    RowReducer::default().find_pivots_and_free_cols(r)
}

/// [`RowReducer::eliminate_system`] with the default tolerance.
pub fn eliminate_system(a: &Matrix, b: &Vector) -> Result<EliminatedSystem> {
    RowReducer::default().eliminate_system(a, b)
}

/// [`RowReducer::n_solutions`] with the default tolerance.
pub fn n_solutions(a: &Matrix, b: &Vector) -> Result<SolutionKind> {
    RowReducer::default().n_solutions(a, b)
}

/// [`RowReducer::solve`] with the default tolerance.
pub fn solve(a: &Matrix, b: &Vector) -> Result<LinearSystemSolution> {
    RowReducer::default().solve(a, b)
}

/// [`RowReducer::is_in_span`] with the default tolerance.
pub fn is_in_span(vectors: &[Vector], b: &Vector) -> Result<bool> {
    RowReducer::default().is_in_span(vectors, b)
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn ints(len: usize) -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(-5i32..=5, len)
            .prop_map(|v| v.into_iter().map(f64::from).collect())
    }

    /// A small integer system. Half the time `b` is built as `A · x` so that
    /// consistent systems are well represented.
    fn system() -> impl Strategy<Value = (Matrix, Vector)> {
        (1usize..=4, 1usize..=4).prop_flat_map(|(rows, cols)| {
            (ints(rows * cols), ints(cols), ints(rows), any::<bool>()).prop_map(
                move |(data, x, b, consistent)| {
                    let a = Matrix::new(rows, cols, data).expect("valid dimensions");
                    let b = if consistent {
                        a.mul_vec(&Vector::from(x)).expect("matching dimensions")
                    } else {
                        Vector::from(b)
                    };
                    (a, b)
                },
            )
        })
    }

    fn residual(a: &Matrix, x: &Vector, b: &Vector) -> f64 {
        let ax = a.mul_vec(x).unwrap();
        ax.sub(b).unwrap().iter().fold(0.0_f64, |m, r| m.max(r.abs()))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn classification_agrees((a, b) in system()) {
            let kind = n_solutions(&a, &b).unwrap();
            let sol = solve(&a, &b).unwrap();
            prop_assert_eq!(kind, sol.kind());
        }

        #[test]
        fn solutions_satisfy_system((a, b) in system()) {
            let sol = solve(&a, &b).unwrap();
            if let Some(x) = sol.particular() {
                let r = residual(&a, x, &b);
                prop_assert!(r < 1e-8, "A·x - b residual {r}, x = {x}");
            }
            let zero = Vector::zeros(a.rows());
            for d in sol.directions() {
                let r = residual(&a, d, &zero);
                prop_assert!(r < 1e-8, "A·d residual {r}, d = {d}");
            }
        }

        #[test]
        fn nullity_matches_rank((a, b) in system()) {
            let sol = solve(&a, &b).unwrap();
            if sol.has_solution() {
                let k = RowReducer::default().rank(&a);
                prop_assert_eq!(sol.directions().len(), a.cols() - k);
            }
        }

        #[test]
        fn consistent_by_construction_is_solvable((a, _b) in system(), x in ints(4)) {
            let x = Vector::from(x[..a.cols()].to_vec());
            let b = a.mul_vec(&x).unwrap();
            prop_assert!(solve(&a, &b).unwrap().has_solution());
        }

        #[test]
        fn span_consistency((a, b) in system()) {
            let cols: Vec<Vector> = (0..a.cols()).map(|j| a.column(j).unwrap()).collect();
            let in_span = is_in_span(&cols, &b).unwrap();
            let solvable = solve(&a, &b).unwrap().kind() != SolutionKind::None;
            prop_assert_eq!(in_span, solvable);
        }
    }
}
