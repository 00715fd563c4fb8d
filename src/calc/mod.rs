//! Line-oriented calculator on top of the library.
//!
//! ```
//! use la_calc::calc::Session;
//!
//! let mut session = Session::default();
//! let mut out = Vec::new();
//! let mut err = Vec::new();
//! for line in ["mat M = [[1,2],[3,4]]", "det M"] {
//!     session.execute_line(line, &mut out, &mut err).unwrap();
//! }
//! assert_eq!(String::from_utf8(out).unwrap(), "-2\n");
//! assert!(err.is_empty());
//! ```

use std::io::{self, BufRead, Write};

pub mod evaluator;
pub mod parser;

pub use evaluator::{CalcError, Reply, Session, Value, HELP};
pub use parser::{ParseError, Parser};

/// Feeds every line of `input` to `session` until end of input or `quit`.
///
/// When `prompt` is set it is written to `out` before each line is read.
///
/// # Errors
/// Returns I/O errors from reading `input` or writing `out`/`err`.
pub fn run<R: BufRead, W: Write, E: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
    err: &mut E,
    prompt: Option<&str>,
) -> io::Result<()> {
    let mut lines = input.lines();
    loop {
        if let Some(p) = prompt {
            out.write_all(p.as_bytes())?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        if !session.execute_line(&line?, out, err)? {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_script() {
        let script = "\
# define and query
vec a = [1, 2, 3]
vec b = [4, 5, 6]
dot a b
bogus
quit
dot a a
";
        let mut session = Session::default();
        let mut out = Vec::new();
        let mut err = Vec::new();
        run(&mut session, script.as_bytes(), &mut out, &mut err, None).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "32\n");
        assert_eq!(String::from_utf8(err).unwrap(), "error: unknown command: bogus\n");
    }

    #[test]
    fn test_run_with_prompt() {
        let mut session = Session::default();
        let mut out = Vec::new();
        let mut err = Vec::new();
        run(&mut session, "vec a = [2]\ndot a a\n".as_bytes(), &mut out, &mut err, Some("> "))
            .unwrap();
        // one prompt per line read plus one at end of input
        assert_eq!(String::from_utf8(out).unwrap(), "> > 4\n> ");
    }
}
