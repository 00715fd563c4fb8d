//! # la-calc
//!
//! Dense linear algebra with row reduction at its core.
//!
//! ## Modules
//!
//! - [`vector`], [`matrix`]: dense `f64` containers
//! - [`row_reduction`]: pivot search, REF/RREF, rank
//! - [`linear_system`]: solution classification, parametric solutions, span
//!   membership
//! - [`geometry`]: 2D/3D vectors and planes
//! - [`parity`]: parity bits and check digits
//! - [`calc`]: the line-oriented calculator behind the `la-calc` binary
//!
//! ## Quick Start
//!
//! ```
//! use la_calc::prelude::*;
//!
//! let a = Matrix::from_rows(&[
//!     &[1.0, -1.0, -1.0, 2.0],
//!     &[2.0, -2.0, -1.0, 3.0],
//!     &[-1.0, 1.0, -1.0, 0.0],
//! ]);
//! let b = Vector::from(vec![1.0, 3.0, -3.0]);
//!
//! let sol = solve(&a, &b)?;
//! assert_eq!(sol.kind(), SolutionKind::Infinite);
//! assert_eq!(sol.directions().len(), 2);
//! assert_eq!(rank(&a), 2);
//! # Ok::<(), LinalgError>(())
//! ```

pub mod approx;
pub mod calc;
pub mod config;
pub mod error;
pub mod geometry;
pub mod linear_system;
pub mod matrix;
pub mod parity;
pub mod row_reduction;
pub mod vector;

pub use approx::Tolerance;
pub use error::{ErrorKind, LinalgError, Result};
pub use linear_system::{EliminatedSystem, LinearSystemSolution, PivotInfo, SolutionKind};
pub use matrix::Matrix;
pub use row_reduction::{Pivot, RowReducer};
pub use vector::Vector;

/// Common imports.
pub mod prelude {
    pub use crate::approx::{is_near_zero, nearly_equal, Tolerance};
    pub use crate::error::{ErrorKind, LinalgError};
    pub use crate::linear_system::{
        augment, eliminate_system, find_pivots_and_free_cols, is_in_span, n_solutions, solve,
        LinearSystemSolution, PivotInfo, SolutionKind,
    };
    pub use crate::matrix::Matrix;
    pub use crate::row_reduction::{
        is_ref, is_rref, rank, rank_from_ref, reduced_row_echelon, row_echelon, RowReducer,
    };
    pub use crate::vector::Vector;
}
