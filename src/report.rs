use std::fmt::{Display, Formatter};
use std::path::Path;

use itertools::Itertools;

use crate::decode::{read_words, ReadStats};
use crate::error::ReadError;
use crate::solver::{ExtractionFailure, OrderExtractor};
use crate::symbol::Symbol;

const RULE_WIDTH: usize = 50;

/// The result of solving one word-list file, together with what the reader saw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractionReport {
    /// The inferred order, or why there is none.
    pub outcome: Result<Vec<Symbol>, ExtractionFailure>,
    /// Decoding statistics of the input.
    pub stats: ReadStats,
}

impl ExtractionReport {
    /// Read the word list at `path` and run `extractor` on it.
    ///
    /// Only resource errors fail; an inconsistent word list is a regular outcome.
    pub fn solve(path: impl AsRef<Path>, extractor: &OrderExtractor) -> Result<Self, ReadError> {
        let (words, stats) = read_words(path)?;
        let outcome = extractor.extract(&words);
        Ok(Self { outcome, stats })
    }

    /// Whether a valid order was found.
    pub fn is_solved(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl Display for ExtractionReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            Ok(order) => {
                writeln!(f, "# Ordered sequence:")?;
                writeln!(f, "{}", order.iter().join(""))?;
            }
            Err(failure) => writeln!(f, "# No valid order: {}", failure)?,
        }
        writeln!(f)?;
        write!(f, "{}", self.stats)?;
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(f)
    }
}
