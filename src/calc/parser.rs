//! Recursive-descent parser for one line of the calculator language.
//!
//! Tokens are separated by optional ASCII whitespace. Literals:
//!
//! - identifier: `[A-Za-z_][A-Za-z0-9_]*`
//! - number: optional sign, digits with an optional fraction, optional
//!   exponent (`-1.5e3`)
//! - vector: `[1, 2, 3]` (may be empty)
//! - matrix: `[[1, 2], [3, 4]]` (at least one row, rows non-empty and of
//!   equal length)

use thiserror::Error;

/// A syntax error and the byte offset where it was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (at column {})", .offset + 1)]
pub struct ParseError {
    pub message: &'static str,
    pub offset: usize,
}

/// Cursor over a single input line.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn error(&self, message: &'static str) -> ParseError {
        ParseError {
            message,
            offset: self.pos,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn digits_from(&self, from: usize) -> usize {
        self.input
            .as_bytes()
            .get(from..)
            .map_or(0, |rest| rest.iter().take_while(|c| c.is_ascii_digit()).count())
    }

    pub fn parse_identifier(&mut self) -> Result<&'a str, ParseError> {
        self.skip_ws();
        if !self
            .peek()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == b'_')
        {
            return Err(self.error("expected identifier"));
        }
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.pos += 1;
        }
        Ok(&self.input[start..self.pos])
    }

    pub fn parse_number(&mut self) -> Result<f64, ParseError> {
        self.skip_ws();
        let bytes = self.input.as_bytes();
        let start = self.pos;
        let mut end = start;
        if matches!(bytes.get(end), Some(b'+' | b'-')) {
            end += 1;
        }
        let int_digits = self.digits_from(end);
        end += int_digits;
        let mut frac_digits = 0;
        if bytes.get(end) == Some(&b'.') {
            frac_digits = self.digits_from(end + 1);
            if int_digits + frac_digits > 0 {
                end += 1 + frac_digits;
            }
        }
        if int_digits + frac_digits == 0 {
            return Err(self.error("expected number"));
        }
        // exponent only counts when digits follow
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(bytes.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            let exp_digits = self.digits_from(exp);
            if exp_digits > 0 {
                end = exp + exp_digits;
            }
        }
        let value = self.input[start..end]
            .parse::<f64>()
            .map_err(|_| self.error("expected number"))?;
        self.pos = end;
        Ok(value)
    }

    pub fn parse_vector_literal(&mut self) -> Result<Vec<f64>, ParseError> {
        self.expect('[', "expected '[' to start vector literal")?;
        let mut values = Vec::new();
        if self.consume(']') {
            return Ok(values);
        }
        values.push(self.parse_number()?);
        while self.consume(',') {
            values.push(self.parse_number()?);
        }
        self.expect(']', "expected ']' to end vector literal")?;
        Ok(values)
    }

    pub fn parse_matrix_literal(&mut self) -> Result<Vec<Vec<f64>>, ParseError> {
        self.expect('[', "expected '[' to start matrix literal")?;
        if self.consume(']') {
            return Err(self.error("matrix literal must contain rows"));
        }
        let mut rows = Vec::new();
        loop {
            let row = self.parse_vector_literal()?;
            if row.is_empty() {
                return Err(self.error("matrix rows must not be empty"));
            }
            if rows.first().is_some_and(|first: &Vec<f64>| first.len() != row.len()) {
                return Err(self.error("all matrix rows must be the same length"));
            }
            rows.push(row);
            if !self.consume(',') {
                break;
            }
        }
        self.expect(']', "expected ']' to end matrix literal")?;
        Ok(rows)
    }

    /// Skips whitespace and consumes `c` if it comes next.
    pub fn consume(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.input[self.pos..].starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Like [`consume`](Self::consume), failing with `message` if `c` is
    /// missing.
    pub fn expect(&mut self, c: char, message: &'static str) -> Result<(), ParseError> {
        if self.consume(c) {
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    pub fn expect_end(&mut self) -> Result<(), ParseError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.error("unexpected trailing input"))
        }
    }

    /// True when only whitespace remains.
    pub fn is_empty(&mut self) -> bool {
        self.skip_ws();
        self.pos >= self.input.len()
    }
}
