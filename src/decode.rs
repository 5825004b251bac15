//! Best-effort decoding of word-list files.
//!
//! Input files come from anywhere, so the reader tries a fixed ladder of strict decodings and only
//! degrades to lossy UTF-8 when every rung fails. Lines are split on every terminator Unicode
//! recognizes and blank lines are dropped; everything else, including surrounding whitespace, is
//! kept as part of the word.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::Path;

use itertools::Itertools;
use tracing::{debug, warn};

use crate::error::ReadError;
use crate::symbol::Symbol;

pub(crate) const BOM: char = '\u{feff}';

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Text encodings the reader knows about, named as they appear in reports.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, strum::Display, strum::EnumString, strum::VariantArray)]
pub enum Encoding {
    /// UTF-8 with an optional byte-order mark.
    #[strum(serialize = "utf-8-sig")]
    Utf8Sig,
    /// Plain UTF-8.
    #[strum(serialize = "utf-8")]
    Utf8,
    /// UTF-16 honoring a byte-order mark, little endian without one.
    #[strum(serialize = "utf-16")]
    Utf16,
    /// UTF-16, little endian.
    #[strum(serialize = "utf-16-le")]
    Utf16Le,
    /// UTF-16, big endian.
    #[strum(serialize = "utf-16-be")]
    Utf16Be,
    /// UTF-32 honoring a byte-order mark, little endian without one.
    #[strum(serialize = "utf-32")]
    Utf32,
    /// UTF-32, little endian.
    #[strum(serialize = "utf-32-le")]
    Utf32Le,
    /// UTF-32, big endian.
    #[strum(serialize = "utf-32-be")]
    Utf32Be,
    /// ISO-8859-1; maps every byte, so it never fails.
    #[strum(serialize = "latin-1")]
    Latin1,
    /// UTF-8 with undecodable sequences replaced by U+FFFD.
    #[strum(serialize = "utf-8(replace)")]
    Utf8Lossy,
}

impl Encoding {
    /// Strict candidates, in the order they are attempted.
    pub const CANDIDATES: &'static [Encoding] = &[
        Self::Utf8Sig,
        Self::Utf8,
        Self::Utf16,
        Self::Utf16Le,
        Self::Utf16Be,
        Self::Utf32,
        Self::Utf32Le,
        Self::Utf32Be,
        Self::Latin1,
    ];

    /// Decode `bytes`, returning `None` if they are not valid in this encoding.
    /// [`Utf8Lossy`](Self::Utf8Lossy) always succeeds.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8Sig => std::str::from_utf8(bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes))
                .ok()
                .map(str::to_owned),
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Self::Utf16 => match bytes {
                [0xFF, 0xFE, rest @ ..] => utf16(rest, u16::from_le_bytes),
                [0xFE, 0xFF, rest @ ..] => utf16(rest, u16::from_be_bytes),
                _ => utf16(bytes, u16::from_le_bytes),
            },
            Self::Utf16Le => utf16(bytes, u16::from_le_bytes),
            Self::Utf16Be => utf16(bytes, u16::from_be_bytes),
            Self::Utf32 => match bytes {
                [0xFF, 0xFE, 0x00, 0x00, rest @ ..] => utf32(rest, u32::from_le_bytes),
                [0x00, 0x00, 0xFE, 0xFF, rest @ ..] => utf32(rest, u32::from_be_bytes),
                _ => utf32(bytes, u32::from_le_bytes),
            },
            Self::Utf32Le => utf32(bytes, u32::from_le_bytes),
            Self::Utf32Be => utf32(bytes, u32::from_be_bytes),
            Self::Latin1 => Some(bytes.iter().map(|byte| char::from(*byte)).collect()),
            Self::Utf8Lossy => Some(String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

fn utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }

    char::decode_utf16(bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]])))
        .collect::<Result<String, _>>()
        .ok()
}

fn utf32(bytes: &[u8], unit: fn([u8; 4]) -> u32) -> Option<String> {
    if bytes.len() % 4 != 0 {
        return None;
    }

    bytes
        .chunks_exact(4)
        .map(|quad| char::from_u32(unit([quad[0], quad[1], quad[2], quad[3]])))
        .collect()
}

/// Decode `bytes` with the first strict candidate that accepts them, falling back to lossy UTF-8.
pub fn decode(bytes: &[u8]) -> (String, Encoding) {
    for encoding in Encoding::CANDIDATES {
        if let Some(text) = encoding.decode(bytes) {
            debug!(%encoding, bytes = bytes.len(), "decoded input");
            return (text, *encoding);
        }
    }

    let encoding = Encoding::Utf8Lossy;
    warn!(%encoding, "no strict decoding accepted the input, substituting undecodable bytes");
    (String::from_utf8_lossy(bytes).into_owned(), encoding)
}

/// Whether `c` ends a line: the ASCII terminators plus the separators Unicode defines.
pub fn is_line_terminator(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Iterator over the lines of a text with their terminators removed. See [`split_lines`].
#[derive(Clone, Debug)]
pub struct Lines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        match self.rest.char_indices().find(|(_, c)| is_line_terminator(*c)) {
            None => {
                let line = self.rest;
                self.rest = "";
                Some(line)
            }
            Some((at, terminator)) => {
                let line = &self.rest[..at];
                let mut end = at + terminator.len_utf8();
                // \r\n is one terminator
                if terminator == '\r' && self.rest[end..].starts_with('\n') {
                    end += 1;
                }
                self.rest = &self.rest[end..];
                Some(line)
            }
        }
    }
}

/// Split `text` on every [line terminator](is_line_terminator). A terminator at the very end does
/// not produce a trailing empty line.
pub fn split_lines(text: &str) -> Lines<'_> {
    Lines { rest: text }
}

/// What the reader saw while loading a word list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadStats {
    /// The encoding that produced the text.
    pub encoding: Encoding,
    /// Lines in the decoded text, blank ones included.
    pub total_lines: usize,
    /// Lines kept as words.
    pub kept_lines: usize,
    /// Empty or whitespace-only lines that were dropped.
    pub skipped_blank: usize,
    /// Every distinct symbol in the kept words.
    pub unique_symbols: BTreeSet<Symbol>,
}

impl Display for ReadStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "# Encoding of the file: {}", self.encoding)?;
        writeln!(f, "# Total number of lines: {}", self.total_lines)?;
        writeln!(f, "# Number of lines used: {}", self.kept_lines)?;
        writeln!(f, "# Number of lines cleaned out: {}", self.skipped_blank)?;
        writeln!(f, "# Set of unique symbols (non-ordered): {{{}}}", self.unique_symbols.iter().join(", "))
    }
}

/// Decode a word list held in memory: one word per line, in the order to be treated as sorted.
pub fn decode_words(bytes: &[u8]) -> (Vec<String>, ReadStats) {
    let (text, encoding) = decode(bytes);

    let mut words = Vec::new();
    let mut unique_symbols = BTreeSet::new();
    let mut total_lines = 0;
    let mut skipped_blank = 0;

    for line in split_lines(&text) {
        total_lines += 1;
        let line = line.strip_prefix(BOM).unwrap_or(line);
        if line.chars().all(char::is_whitespace) {
            skipped_blank += 1;
            continue;
        }

        unique_symbols.extend(line.chars());
        words.push(line.to_owned());
    }

    let stats = ReadStats {
        encoding,
        total_lines,
        kept_lines: words.len(),
        skipped_blank,
        unique_symbols,
    };
    (words, stats)
}

/// Read a word-list file with [`decode_words`].
pub fn read_words(path: impl AsRef<Path>) -> Result<(Vec<String>, ReadStats), ReadError> {
    let bytes = read_bytes(path.as_ref())?;
    Ok(decode_words(&bytes))
}

pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>, ReadError> {
    let io_error = |source: io::Error| match source.kind() {
        io::ErrorKind::NotFound => ReadError::NotFound { path: path.to_path_buf() },
        _ => ReadError::Io { path: path.to_path_buf(), source },
    };

    if fs::metadata(path).map_err(io_error)?.is_dir() {
        return Err(ReadError::IsADirectory { path: path.to_path_buf() });
    }

    fs::read(path).map_err(io_error)
}
