use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::symbol::Symbol;

/// Failures while loading an input file from disk. These are fatal and never retried.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Nothing exists at the given path.
    #[error("file not found: {}", .path.display())]
    NotFound {
        /// The path that was requested.
        path: PathBuf,
    },
    /// The path names a directory where a file was expected.
    #[error("expected a file, got a directory: {}", .path.display())]
    IsADirectory {
        /// The path that was requested.
        path: PathBuf,
    },
    /// Any other I/O failure, e.g. missing permissions.
    #[error("could not read {}", .path.display())]
    Io {
        /// The path that was requested.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

/// Reasons an alphabet file or symbol list is malformed.
#[derive(Debug, Error)]
pub enum AlphabetError {
    /// The input held no symbols at all.
    #[error("alphabet is empty or only blank lines")]
    Empty,
    /// A non-blank line held more than one symbol.
    #[error("line {line}: expected exactly one symbol, got {content:?}")]
    MultiSymbolLine {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },
    /// The same symbol was listed twice. Positions are 1-based line numbers when parsed from text.
    #[error("symbol {symbol:?} appears at both {first_line} and {line}")]
    DuplicateSymbol {
        /// The repeated symbol.
        symbol: Symbol,
        /// Where it was first seen.
        first_line: usize,
        /// Where it was seen again.
        line: usize,
    },
    /// Alphabet files must be strict UTF-8.
    #[error("alphabet file is not valid UTF-8")]
    NotUtf8,
    /// The file could not be read.
    #[error(transparent)]
    Read(#[from] ReadError),
}

/// Reasons a substitution table cannot be built.
#[derive(Debug, Error)]
pub enum MapperError {
    /// A line did not have the `source<TAB>destination` shape.
    #[error("line {line}: expected `source<TAB>destination`")]
    MissingTab {
        /// 1-based line number.
        line: usize,
    },
    /// The source column held zero or several symbols.
    #[error("line {line}: source {source_text:?} must be exactly one symbol")]
    MultiSymbolSource {
        /// 1-based line number.
        line: usize,
        /// The offending source column.
        source_text: String,
    },
    /// A source symbol was mapped twice.
    #[error("line {line}: symbol {symbol:?} is already mapped")]
    DuplicateSource {
        /// 1-based line number, or position when built from an order.
        line: usize,
        /// The repeated symbol.
        symbol: Symbol,
    },
    /// An inferred order and a target alphabet of different sizes cannot be paired.
    #[error("cannot pair {inferred} inferred symbols with {target} target symbols")]
    LengthMismatch {
        /// Length of the inferred order.
        inferred: usize,
        /// Length of the target alphabet.
        target: usize,
    },
    /// Table files must be strict UTF-8.
    #[error("substitution table is not valid UTF-8")]
    NotUtf8,
    /// The file could not be read.
    #[error(transparent)]
    Read(#[from] ReadError),
}
