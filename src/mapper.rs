use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::decode::{read_bytes, split_lines, BOM};
use crate::error::MapperError;
use crate::symbol::{Alphabet, Symbol};

/// A symbol-to-string substitution, e.g. for translating an alien word list into a readable
/// alphabet once its order is known.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubstitutionTable {
    entries: Vec<(Symbol, String)>,
    index: HashMap<Symbol, usize>,
}

impl SubstitutionTable {
    fn insert(&mut self, line: usize, source: Symbol, destination: String) -> Result<(), MapperError> {
        if self.index.contains_key(&source) {
            return Err(MapperError::DuplicateSource { line, symbol: source });
        }

        self.index.insert(source, self.entries.len());
        self.entries.push((source, destination));
        Ok(())
    }

    /// Parse `source<TAB>destination` lines. Empty lines are skipped; the destination may be empty.
    pub fn parse(text: &str) -> Result<Self, MapperError> {
        let text = text.strip_prefix(BOM).unwrap_or(text);
        let mut table = Self::default();

        for (index, entry) in split_lines(text).enumerate() {
            let line = index + 1;
            if entry.is_empty() {
                continue;
            }

            let (source, destination) = entry.split_once('\t').ok_or(MapperError::MissingTab { line })?;
            let mut chars = source.chars();
            let (Some(symbol), None) = (chars.next(), chars.next()) else {
                return Err(MapperError::MultiSymbolSource { line, source_text: source.to_owned() });
            };
            table.insert(line, symbol, destination.to_owned())?;
        }

        Ok(table)
    }

    /// Read and [`parse`](Self::parse) a table file. The file must be UTF-8.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, MapperError> {
        let bytes = read_bytes(path.as_ref())?;
        let text = String::from_utf8(bytes).map_err(|_| MapperError::NotUtf8)?;
        Self::parse(&text)
    }

    /// Pair the i-th symbol of an inferred order with the i-th symbol of `target`.
    pub fn from_orders(inferred: &[Symbol], target: &Alphabet) -> Result<Self, MapperError> {
        if inferred.len() != target.len() {
            return Err(MapperError::LengthMismatch { inferred: inferred.len(), target: target.len() });
        }

        let mut table = Self::default();
        for (position, (source, destination)) in inferred.iter().zip(target.symbols()).enumerate() {
            table.insert(position + 1, *source, destination.to_string())?;
        }
        Ok(table)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table maps nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The replacement for `symbol`, if it is mapped.
    pub fn get(&self, symbol: Symbol) -> Option<&str> {
        self.index.get(&symbol).map(|at| self.entries[*at].1.as_str())
    }

    /// Replace every mapped symbol of `text`; unmapped symbols pass through.
    pub fn map_str(&self, text: &str) -> String {
        let mut mapped = String::with_capacity(text.len());
        for symbol in text.chars() {
            match self.get(symbol) {
                Some(destination) => mapped.push_str(destination),
                None => mapped.push(symbol),
            }
        }
        mapped
    }

    /// [`map_str`](Self::map_str) line by line from `reader` into `writer`, keeping line endings.
    pub fn map_stream<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> io::Result<()> {
        let mut line = String::new();
        while reader.read_line(&mut line)? > 0 {
            writer.write_all(self.map_str(&line).as_bytes())?;
            line.clear();
        }
        writer.flush()
    }
}

impl Display for SubstitutionTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (source, destination) in &self.entries {
            writeln!(f, "{}\t{}", source, destination)?;
        }
        Ok(())
    }
}
