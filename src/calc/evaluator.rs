//! Command evaluation for the calculator.
//!
//! A [`Session`] holds the named values defined so far and the
//! [`RowReducer`] used by the elimination commands. Each input line is one
//! command; see [`HELP`] for the list.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};

use thiserror::Error;
use tracing::debug;

use crate::approx::Tolerance;
use crate::calc::parser::{ParseError, Parser};
use crate::error::LinalgError;
use crate::linear_system::LinearSystemSolution;
use crate::matrix::Matrix;
use crate::row_reduction::RowReducer;
use crate::vector::Vector;

/// Text printed by the `help` command.
pub const HELP: &str = "\
Commands:
  vec <name> = [1, 2, 3]
  mat <name> = [[1,2],[3,4]]
  dot <vecA> <vecB>
  det <mat>
  ref <mat>
  rref <mat>
  rank <mat>
  solve <mat> <vec>
  in_span <b> <x1> <x2> ... <xn>
  print <name>
  help
  quit | exit
";

/// Errors reported for a single command. None of them ends the session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("{command} expects a {expected}, but {name} is a {found}")]
    TypeMismatch {
        command: &'static str,
        expected: &'static str,
        name: String,
        found: &'static str,
    },

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

/// A named value in the symbol table.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Vector(Vector),
    Matrix(Matrix),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Vector(_) => "vector",
            Self::Matrix(_) => "matrix",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vector(v) => writeln!(f, "{v}"),
            Self::Matrix(m) => write!(f, "{m}"),
        }
    }
}

/// Outcome of a successfully evaluated line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Nothing to print.
    Silent,
    /// Text to print, newline-terminated.
    Output(String),
    /// The user asked to leave.
    Quit,
}

/// Symbol table plus evaluation settings.
#[derive(Debug, Clone, Default)]
pub struct Session {
    symbols: HashMap<String, Value>,
    reducer: RowReducer,
}

impl Session {
    pub fn new(reducer: RowReducer) -> Self {
        Self {
            symbols: HashMap::new(),
            reducer,
        }
    }

    pub fn with_tolerance(tol: Tolerance) -> Self {
        Self::new(RowReducer::new(tol))
    }

    /// Looks up a defined value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.symbols.get(name)
    }

    /// Binds `name` to `value`, replacing any previous binding.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.symbols.insert(name.into(), value);
    }

    /// Runs one line, writing results to `out` and diagnostics to `err`.
    ///
    /// Command errors are reported as `error: <message>` and do not stop the
    /// session. Returns `Ok(false)` once the user quits.
    ///
    /// # Errors
    /// Only I/O errors from `out` or `err` are returned.
    pub fn execute_line<W: Write, E: Write>(
        &mut self,
        line: &str,
        out: &mut W,
        err: &mut E,
    ) -> io::Result<bool> {
        match self.evaluate(line) {
            Ok(Reply::Quit) => Ok(false),
            Ok(Reply::Silent) => Ok(true),
            Ok(Reply::Output(text)) => {
                out.write_all(text.as_bytes())?;
                Ok(true)
            }
            Err(e) => {
                debug!(error = %e, "command failed");
                writeln!(err, "error: {e}")?;
                Ok(true)
            }
        }
    }

    /// Parses and runs one line.
    ///
    /// Blank lines and lines starting with `#` are ignored.
    ///
    /// # Errors
    /// Returns [`CalcError`] for malformed input, unknown names, wrongly
    /// typed arguments and failing operations.
    pub fn evaluate(&mut self, line: &str) -> Result<Reply, CalcError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Reply::Silent);
        }
        let mut p = Parser::new(line);
        let command = p.parse_identifier()?;
        debug!(command, "evaluating");
        match command {
            "quit" | "exit" => {
                p.expect_end()?;
                Ok(Reply::Quit)
            }
            "help" => {
                p.expect_end()?;
                Ok(Reply::Output(HELP.to_string()))
            }
            "vec" => self.define_vector(&mut p),
            "mat" => self.define_matrix(&mut p),
            "dot" => self.dot(&mut p),
            "det" => self.det(&mut p),
            "ref" => {
                let m = self.single_matrix(&mut p, "ref")?;
                Ok(Reply::Output(self.render_matrix(&self.reducer.row_echelon(m))))
            }
            "rref" => {
                let m = self.single_matrix(&mut p, "rref")?;
                let r = self.reducer.reduced_row_echelon(m);
                Ok(Reply::Output(self.render_matrix(&r)))
            }
            "rank" => {
                let m = self.single_matrix(&mut p, "rank")?;
                Ok(Reply::Output(format!("{}\n", self.reducer.rank(m))))
            }
            "solve" => self.solve(&mut p),
            "in_span" => self.in_span(&mut p),
            "print" => {
                let name = p.parse_identifier()?;
                p.expect_end()?;
                let text = match self.lookup(name)? {
                    Value::Vector(v) => format!("{}\n", self.render_vector(v)),
                    Value::Matrix(m) => self.render_matrix(m),
                };
                Ok(Reply::Output(text))
            }
            other => Err(CalcError::UnknownCommand(other.to_string())),
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    fn define_vector(&mut self, p: &mut Parser<'_>) -> Result<Reply, CalcError> {
        let name = p.parse_identifier()?;
        p.expect('=', "expected '=' after vector name")?;
        let values = p.parse_vector_literal()?;
        p.expect_end()?;
        self.define(name, Value::Vector(Vector::from(values)));
        Ok(Reply::Silent)
    }

    fn define_matrix(&mut self, p: &mut Parser<'_>) -> Result<Reply, CalcError> {
        let name = p.parse_identifier()?;
        p.expect('=', "expected '=' after matrix name")?;
        let rows = p.parse_matrix_literal()?;
        p.expect_end()?;
        self.define(name, Value::Matrix(Matrix::try_from_rows(rows)?));
        Ok(Reply::Silent)
    }

    fn dot(&self, p: &mut Parser<'_>) -> Result<Reply, CalcError> {
        let a = p.parse_identifier()?;
        let b = p.parse_identifier()?;
        p.expect_end()?;
        let x = self.vector(a, "dot")?.dot(self.vector(b, "dot")?)?;
        Ok(Reply::Output(format!("{}\n", self.render_scalar(x))))
    }

    fn det(&self, p: &mut Parser<'_>) -> Result<Reply, CalcError> {
        let m = self.single_matrix(p, "det")?;
        let d = m.determinant()?;
        Ok(Reply::Output(format!("{}\n", self.render_scalar(d))))
    }

    fn solve(&self, p: &mut Parser<'_>) -> Result<Reply, CalcError> {
        let a = p.parse_identifier()?;
        let b = p.parse_identifier()?;
        p.expect_end()?;
        let sol = self
            .reducer
            .solve(self.matrix(a, "solve")?, self.vector(b, "solve")?)?;
        let mut text = format!("{}\n", sol.kind());
        match &sol {
            LinearSystemSolution::None => {}
            LinearSystemSolution::Unique(x) => {
                text += &format!("x = {}\n", self.render_vector(x));
            }
            LinearSystemSolution::Infinite {
                particular,
                directions,
            } => {
                text += &format!("particular = {}\n", self.render_vector(particular));
                for (i, d) in directions.iter().enumerate() {
                    text += &format!("direction {} = {}\n", i + 1, self.render_vector(d));
                }
            }
        }
        Ok(Reply::Output(text))
    }

    fn in_span(&self, p: &mut Parser<'_>) -> Result<Reply, CalcError> {
        let b_name = p.parse_identifier()?;
        let mut names = Vec::new();
        while !p.is_empty() {
            names.push(p.parse_identifier()?);
        }
        if names.is_empty() {
            return Err(CalcError::Usage("in_span <b> <x1> <x2> ... <xn>"));
        }
        let b = self.vector(b_name, "in_span")?;
        let spanning = names
            .into_iter()
            .map(|name| self.vector(name, "in_span").cloned())
            .collect::<Result<Vec<_>, _>>()?;
        let result = self.reducer.is_in_span(&spanning, b)?;
        Ok(Reply::Output(format!("{result}\n")))
    }

    // ========================================================================
    // Symbol lookup
    // ========================================================================

    fn lookup(&self, name: &str) -> Result<&Value, CalcError> {
        self.symbols
            .get(name)
            .ok_or_else(|| CalcError::UnknownSymbol(name.to_string()))
    }

    fn vector(&self, name: &str, command: &'static str) -> Result<&Vector, CalcError> {
        match self.lookup(name)? {
            Value::Vector(v) => Ok(v),
            other => Err(CalcError::TypeMismatch {
                command,
                expected: "vector",
                name: name.to_string(),
                found: other.type_name(),
            }),
        }
    }

    fn matrix(&self, name: &str, command: &'static str) -> Result<&Matrix, CalcError> {
        match self.lookup(name)? {
            Value::Matrix(m) => Ok(m),
            other => Err(CalcError::TypeMismatch {
                command,
                expected: "matrix",
                name: name.to_string(),
                found: other.type_name(),
            }),
        }
    }

    /// Parses `<name>` followed by end of input and resolves it to a matrix.
    fn single_matrix(
        &self,
        p: &mut Parser<'_>,
        command: &'static str,
    ) -> Result<&Matrix, CalcError> {
        let name = p.parse_identifier()?;
        p.expect_end()?;
        self.matrix(name, command)
    }

    // ========================================================================
    // Output formatting
    // ========================================================================

    /// Six significant digits; near-zero values print as `0`.
    fn round(&self, x: f64) -> f64 {
        if !x.is_finite() {
            return x;
        }
        if self.reducer.tolerance().is_near_zero(x) {
            return 0.0;
        }
        // nearest f64 to the six-digit decimal
        let r = format!("{x:.5e}").parse::<f64>().unwrap_or(x);
        if r == 0.0 {
            0.0
        } else {
            r
        }
    }

    fn render_scalar(&self, x: f64) -> String {
        self.round(x).to_string()
    }

    fn render_vector(&self, v: &Vector) -> String {
        v.iter().map(|&x| self.round(x)).collect::<Vector>().to_string()
    }

    fn render_matrix(&self, m: &Matrix) -> String {
        m.map(|x| self.round(x)).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Run {
        out: String,
        err: String,
        keep_going: bool,
    }

    fn run_line(session: &mut Session, line: &str) -> Run {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let keep_going = session.execute_line(line, &mut out, &mut err).unwrap();
        Run {
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
            keep_going,
        }
    }

    fn run_ok(session: &mut Session, line: &str) -> String {
        let r = run_line(session, line);
        assert!(r.err.is_empty(), "{line:?} failed: {}", r.err);
        r.out
    }

    #[test]
    fn test_dot_product() {
        let mut s = Session::default();
        assert_eq!(run_ok(&mut s, "vec a = [1, 2, 3]"), "");
        run_ok(&mut s, "vec b = [4, 5, 6]");
        assert_eq!(run_ok(&mut s, "dot a b"), "32\n");
    }

    #[test]
    fn test_determinant() {
        let mut s = Session::default();
        run_ok(&mut s, "mat M = [[1,2],[3,4]]");
        assert_eq!(run_ok(&mut s, "det M"), "-2\n");
    }

    #[test]
    fn test_unknown_symbol() {
        let mut s = Session::default();
        let r = run_line(&mut s, "dot a b");
        assert!(r.out.is_empty());
        assert!(r.err.contains("unknown symbol"), "{}", r.err);
        assert!(r.keep_going);
    }

    #[test]
    fn test_unknown_command() {
        let mut s = Session::default();
        let r = run_line(&mut s, "frobnicate x");
        assert_eq!(r.err, "error: unknown command: frobnicate\n");
    }

    #[test]
    fn test_type_mismatch() {
        let mut s = Session::default();
        run_ok(&mut s, "vec v = [1, 2]");
        let r = run_line(&mut s, "det v");
        assert_eq!(r.err, "error: det expects a matrix, but v is a vector\n");
    }

    #[test]
    fn test_parse_error_reported() {
        let mut s = Session::default();
        let r = run_line(&mut s, "vec a = [1, 2");
        assert!(r.err.starts_with("error: expected ']'"), "{}", r.err);
        assert!(s.get("a").is_none());
    }

    #[test]
    fn test_library_error_reported() {
        let mut s = Session::default();
        run_ok(&mut s, "vec a = [1, 2]");
        run_ok(&mut s, "vec b = [1, 2, 3]");
        let r = run_line(&mut s, "dot a b");
        assert!(r.err.contains("dimension mismatch"), "{}", r.err);
        run_ok(&mut s, "mat big = [[1,0,0,0],[0,1,0,0],[0,0,1,0],[0,0,0,1]]");
        let r = run_line(&mut s, "det big");
        assert!(r.err.contains("domain error"), "{}", r.err);
    }

    #[test]
    fn test_ref_and_rref() {
        let mut s = Session::default();
        run_ok(&mut s, "mat A = [[1,2],[3,4]]");
        assert_eq!(run_ok(&mut s, "ref A"), "[ 3, 4 ]\n[ 0, 0.666667 ]\n");
        assert_eq!(run_ok(&mut s, "rref A"), "[ 1, 0 ]\n[ 0, 1 ]\n");
        run_ok(&mut s, "mat S = [[1,2],[2,4]]");
        assert_eq!(run_ok(&mut s, "rref S"), "[ 1, 2 ]\n[ 0, 0 ]\n");
        assert_eq!(run_ok(&mut s, "rank S"), "1\n");
    }

    #[test]
    fn test_solve() {
        let mut s = Session::default();
        run_ok(&mut s, "mat A = [[0,2,3],[2,3,1],[1,-1,-2]]");
        run_ok(&mut s, "vec b = [8, 5, -5]");
        assert_eq!(run_ok(&mut s, "solve A b"), "unique solution\nx = [ 0, 1, 2 ]\n");

        run_ok(&mut s, "mat B = [[1,-1,-1,2],[2,-2,-1,3],[-1,1,-1,0]]");
        run_ok(&mut s, "vec c = [1, 3, -3]");
        assert_eq!(
            run_ok(&mut s, "solve B c"),
            "infinitely many solutions\n\
             particular = [ 2, 0, 1, 0 ]\n\
             direction 1 = [ 1, 1, 0, 0 ]\n\
             direction 2 = [ -1, 0, 1, 1 ]\n"
        );

        run_ok(&mut s, "mat C = [[1,-1,2],[1,2,-1],[0,2,-2]]");
        run_ok(&mut s, "vec d = [3, -3, 1]");
        assert_eq!(run_ok(&mut s, "solve C d"), "no solution\n");
    }

    #[test]
    fn test_in_span() {
        let mut s = Session::default();
        run_ok(&mut s, "vec x1 = [1, 0, 3]");
        run_ok(&mut s, "vec x2 = [-1, 1, -3]");
        run_ok(&mut s, "vec b = [1, 2, 3]");
        run_ok(&mut s, "vec c = [2, 3, 4]");
        assert_eq!(run_ok(&mut s, "in_span b x1 x2"), "true\n");
        assert_eq!(run_ok(&mut s, "in_span c x1 x2"), "false\n");
        let r = run_line(&mut s, "in_span b");
        assert!(r.err.contains("usage"), "{}", r.err);
        let r = run_line(&mut s, "in_span b x1 nope");
        assert!(r.err.contains("unknown symbol: nope"), "{}", r.err);
    }

    #[test]
    fn test_print_and_redefine() {
        let mut s = Session::default();
        run_ok(&mut s, "vec v = [1.5, -2]");
        assert_eq!(run_ok(&mut s, "print v"), "[ 1.5, -2 ]\n");
        run_ok(&mut s, "mat v = [[1],[2]]");
        assert_eq!(run_ok(&mut s, "print v"), "[ 1 ]\n[ 2 ]\n");
        assert_eq!(s.get("v").map(Value::type_name), Some("matrix"));
    }

    #[test]
    fn test_blank_comment_help_quit() {
        let mut s = Session::default();
        let r = run_line(&mut s, "   ");
        assert!(r.keep_going && r.out.is_empty() && r.err.is_empty());
        let r = run_line(&mut s, "# vec a = [1]");
        assert!(r.keep_going && r.out.is_empty());
        assert_eq!(run_ok(&mut s, "help"), HELP);
        assert!(!run_line(&mut s, "quit").keep_going);
        assert!(!run_line(&mut s, "  exit ").keep_going);
        // trailing input after quit is an error, not an exit
        assert!(run_line(&mut s, "quit now").keep_going);
    }

    #[test]
    fn test_scalar_rounding() {
        let mut s = Session::default();
        run_ok(&mut s, "vec a = [0.1, 0.2]");
        run_ok(&mut s, "vec b = [1, 1]");
        assert_eq!(run_ok(&mut s, "dot a b"), "0.3\n");
    }

    #[test]
    fn test_scalar_significant_digits() {
        let mut s = Session::default();
        run_ok(&mut s, "vec one = [1]");
        for (value, printed) in [
            ("123456789", "123457000"),
            ("0.6666666666", "0.666667"),
            ("-1234.5678", "-1234.57"),
            ("1.23456789e-7", "0.000000123457"),
            ("2.5", "2.5"),
            ("-1e-13", "0"),
        ] {
            run_ok(&mut s, &format!("vec x = [{value}]"));
            assert_eq!(run_ok(&mut s, "dot x one"), format!("{printed}\n"), "{value}");
        }
    }

    #[test]
    fn test_value_display() {
        let v = Value::Vector(Vector::from(vec![1.0, 2.0]));
        assert_eq!(v.to_string(), "[ 1, 2 ]\n");
        let m = Value::Matrix(Matrix::identity(2));
        assert_eq!(m.to_string(), "[ 1, 0 ]\n[ 0, 1 ]\n");
    }
}
