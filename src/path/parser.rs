//! Structural path parser
//!
//! Grammar:
//! ```text
//! path   = "/" | step+ [offset]
//! step   = "/" number
//! offset = ":" number
//! ```

use thiserror::Error;

use super::types::NodePath;

/// Path parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathParseError {
    #[error("empty path string")]
    Empty,

    #[error("expected '/' at position {0}")]
    ExpectedStep(usize),

    #[error("expected number at position {0}")]
    ExpectedNumber(usize),

    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn parse_number(&mut self) -> Result<usize, PathParseError> {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(PathParseError::ExpectedNumber(start));
        }
        self.input[start..self.pos]
            .parse()
            .map_err(|_| PathParseError::ExpectedNumber(start))
    }

    fn parse_path(&mut self) -> Result<NodePath, PathParseError> {
        if !self.skip_if('/') {
            return Err(PathParseError::ExpectedStep(self.pos));
        }

        let mut steps = Vec::new();
        if matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            steps.push(self.parse_number()?);
            while self.skip_if('/') {
                steps.push(self.parse_number()?);
            }
        }

        let path = if self.skip_if(':') {
            NodePath::with_offset(steps, self.parse_number()?)
        } else {
            NodePath::new(steps)
        };

        if !self.at_end() {
            return Err(PathParseError::UnexpectedChar(
                self.peek().unwrap_or('\0'),
                self.pos,
            ));
        }

        Ok(path)
    }
}

/// Parse a path string into a [`NodePath`].
pub fn parse(input: &str) -> Result<NodePath, PathParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(PathParseError::Empty);
    }
    Parser::new(input).parse_path()
}
