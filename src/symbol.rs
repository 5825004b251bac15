use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;
use std::path::Path;

use itertools::Itertools;

use crate::decode::{is_line_terminator, read_bytes, split_lines, BOM};
use crate::error::AlphabetError;

/// An atomic unit of comparison: a single Unicode scalar value.
///
/// Symbols are only ever compared for equality. Any order between them comes from a
/// [`ConstraintGraph`](crate::ConstraintGraph) or an [`Alphabet`].
pub type Symbol = char;

/// An ordered list of distinct symbols. The position of a symbol is its rank in the target order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<Symbol>,
    ranks: HashMap<Symbol, usize>,
}

impl Alphabet {
    /// Build an alphabet from symbols listed in their intended order.
    ///
    /// Fails with [`AlphabetError::DuplicateSymbol`] (positions 1-based) if any symbol repeats.
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Result<Self, AlphabetError> {
        let symbols = symbols.into_iter().collect_vec();
        let mut ranks = HashMap::with_capacity(symbols.len());
        for (rank, symbol) in symbols.iter().enumerate() {
            if let Some(first) = ranks.insert(*symbol, rank) {
                return Err(AlphabetError::DuplicateSymbol {
                    symbol: *symbol,
                    first_line: first + 1,
                    line: rank + 1,
                });
            }
        }

        Ok(Self { symbols, ranks })
    }

    /// Parse the line-oriented alphabet format: one symbol per line, blank lines ignored.
    pub fn parse(text: &str) -> Result<Self, AlphabetError> {
        let text = text.strip_prefix(BOM).unwrap_or(text);
        let mut seen: HashMap<Symbol, usize> = HashMap::new();
        let mut symbols = Vec::new();

        for (index, line) in split_lines(text).enumerate() {
            let line_no = index + 1;
            let mut chars = line.chars();
            let Some(symbol) = chars.next() else {
                continue;
            };
            if chars.next().is_some() {
                return Err(AlphabetError::MultiSymbolLine { line: line_no, content: line.to_owned() });
            }
            if let Some(first_line) = seen.get(&symbol) {
                return Err(AlphabetError::DuplicateSymbol { symbol, first_line: *first_line, line: line_no });
            }
            seen.insert(symbol, line_no);
            symbols.push(symbol);
        }

        if symbols.is_empty() {
            return Err(AlphabetError::Empty);
        }

        Self::new(symbols)
    }

    /// Read and [`parse`](Self::parse) an alphabet file. The file must be UTF-8.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, AlphabetError> {
        let bytes = read_bytes(path.as_ref())?;
        let text = String::from_utf8(bytes).map_err(|_| AlphabetError::NotUtf8)?;
        Self::parse(&text)
    }

    /// Every valid scalar value in `range`, in code point order.
    ///
    /// Line terminators and U+FEFF are left out so the result survives being written with
    /// [`Display`] and read back with [`parse`](Self::parse).
    pub fn from_code_points(range: RangeInclusive<u32>) -> Self {
        let symbols = range
            .filter_map(char::from_u32)
            .filter(|c| !is_line_terminator(*c) && *c != BOM)
            .collect_vec();
        let ranks = symbols.iter().enumerate().map(|(rank, symbol)| (*symbol, rank)).collect();

        Self { symbols, ranks }
    }

    /// The symbols in order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The position of `symbol`, if it belongs to this alphabet.
    pub fn rank(&self, symbol: Symbol) -> Option<usize> {
        self.ranks.get(&symbol).copied()
    }

    /// Whether `symbol` belongs to this alphabet.
    pub fn contains(&self, symbol: Symbol) -> bool {
        self.ranks.contains_key(&symbol)
    }

    // foreign symbols sort after every known one, among themselves by code point
    #[inline]
    fn sort_key(&self, symbol: Symbol) -> (usize, Symbol) {
        (self.rank(symbol).unwrap_or(usize::MAX), symbol)
    }

    /// Compare two words under the alien lexicographic order: symbol by symbol by rank, and a
    /// proper prefix before any longer word it starts.
    pub fn compare_words(&self, a: &str, b: &str) -> Ordering {
        a.chars()
            .map(|c| self.sort_key(c))
            .cmp(b.chars().map(|c| self.sort_key(c)))
    }

    /// Sort `words` in place under the alien lexicographic order.
    pub fn sort_words(&self, words: &mut [String]) {
        words.sort_by_cached_key(|word| word.chars().map(|c| self.sort_key(c)).collect_vec());
    }

    /// Whether `words` is already sorted under the alien lexicographic order.
    pub fn is_sorted<S: AsRef<str>>(&self, words: &[S]) -> bool {
        words
            .iter()
            .tuple_windows()
            .all(|(a, b)| self.compare_words(a.as_ref(), b.as_ref()) != Ordering::Greater)
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for symbol in &self.symbols {
            writeln!(f, "{}", symbol)?;
        }
        Ok(())
    }
}
