//! Parse JSON text into [`arbor_core::Value`] trees.
//!
//! The recognizer is strict RFC 8259: no trailing commas, no leading zeros
//! or `+` signs on numbers, no `NaN`/`Infinity`, raw control bytes end a
//! string with an error. Duplicate object keys are legal and preserved in
//! order. `\uXXXX` escapes decode to UTF-8 without surrogate-pair
//! recombination; an unpaired surrogate decodes to U+FFFD.
//!
//! ## Example
//!
//! ```
//! use arbor_parser::Parser;
//!
//! let doc = Parser::new(r#"{"a":1,"b":[true,null,"x"]}"#).parse().unwrap();
//! assert_eq!(doc.size(), 2);
//! assert_eq!(doc.to_string(), r#"{"a":1,"b":[true,null,"x"]}"#);
//! ```
//!
//! Failures carry a 1-based `{line, column}` location of the first byte
//! the parser could not consume:
//!
//! ```
//! let error = arbor_parser::parse("[1,]").unwrap_err();
//! assert_eq!((error.line, error.column), (1, 4));
//! ```

mod cursor;
mod grammar;
mod limit;
mod location;

pub use limit::LimitTracker;

use arbor_core::Value;
use std::path::Path;

const DEFAULT_RECURSION_LIMIT: usize = 1024;

/// A syntax error, located at the first byte that could not be consumed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at line {line}, column {column}")]
pub struct ParseError {
    /// 1-based line, counted by `\n`.
    pub line: usize,
    /// 1-based column, counted in code points.
    pub column: usize,
    pub(crate) message: String,
}

impl ParseError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure of [`parse_file`]: either the read itself (no document location
/// exists) or the parse of what was read.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Configurable parser for one input.
///
/// ```
/// use arbor_parser::Parser;
///
/// let deep = "[".repeat(40) + &"]".repeat(40);
/// assert!(Parser::new(&deep).parse().is_ok());
/// assert!(Parser::new(&deep).recursion_limit(10).parse().is_err());
/// ```
#[derive(Debug)]
pub struct Parser<'input> {
    input: &'input str,
    recursion_limit: LimitTracker,
}

impl<'input> Parser<'input> {
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            recursion_limit: LimitTracker::new(DEFAULT_RECURSION_LIMIT),
        }
    }

    /// Configure the nesting depth limit. The default is 1024.
    pub fn recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = LimitTracker::new(limit);
        self
    }

    pub fn parse(self) -> Result<Value, ParseError> {
        grammar::document(self.input, self.recursion_limit).map_err(|raw| {
            let (line, column) = location::locate(self.input, raw.offset);
            ParseError {
                line,
                column,
                message: raw.message.to_owned(),
            }
        })
    }
}

/// Parse with the default configuration.
pub fn parse(input: &str) -> Result<Value, ParseError> {
    Parser::new(input).parse()
}

/// Read a file and parse its contents.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Value, FileError> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse(&text)?)
}
