//! Argument reordering in the style of GNU `getopt(1)`.
//!
//! A tokenizer turns the raw argument vector into a normalized stream where
//! every recognized option (and its value, as a separate token) comes first,
//! followed by a `--` separator and then the positional arguments.

mod getopt;
mod posix;

pub use getopt::{GetoptCommand, GetoptFlavor, unquote_shell_words};
pub use posix::PosixTokenizer;

use crate::error::ParseResult;
use crate::optspec::OptionSpec;

/// Token separating options from positional arguments.
pub const SEPARATOR: &str = "--";

pub trait Tokenizer {
    /// Reorder `argv` according to `spec`.
    ///
    /// Fails with [`ParseError::Tokenizer`](crate::ParseError::Tokenizer) on
    /// unknown options or options missing a required value.
    fn tokenize(&self, spec: &OptionSpec, argv: &[String]) -> ParseResult<Vec<String>>;
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn tokenize(&self, spec: &OptionSpec, argv: &[String]) -> ParseResult<Vec<String>> {
        (**self).tokenize(spec, argv)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn tokenize(&self, spec: &OptionSpec, argv: &[String]) -> ParseResult<Vec<String>> {
        (**self).tokenize(spec, argv)
    }
}
