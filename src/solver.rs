use itertools::Itertools;
use strum::{Display, EnumString, VariantArray};
use thiserror::Error;
use tracing::debug;

use crate::graph::ConstraintGraph;
use crate::symbol::Symbol;

/// How to pick among several symbols that are eligible at the same time.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Display, EnumString, VariantArray)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TieBreak {
    /// Smallest code point first. Reproducible regardless of input layout.
    #[default]
    Ascending,
    /// First come, first served: vertices in first-seen order, successors in the order their
    /// constraints were discovered.
    Insertion,
}

/// Reasons an [`OrderExtractor`] may fail. Both mean no order is consistent with the input.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ExtractionFailure {
    /// A word is immediately followed by its own proper prefix, which no order allows.
    #[error("word {index} ({longer:?}) is followed by its own prefix {shorter:?}")]
    PrefixInvalid {
        /// 0-based index of the longer word in the input.
        index: usize,
        /// The longer word.
        longer: String,
        /// The prefix that follows it.
        shorter: String,
    },
    /// The inferred constraints contain a cycle.
    #[error("constraints are cyclic; unresolved symbols: {{{}}}", .unresolved.iter().join(", "))]
    Cycle {
        /// Symbols left waiting on a predecessor, in code point order.
        unresolved: Vec<Symbol>,
    },
}

// where two adjacent words first disagree
enum Divergence {
    At(Symbol, Symbol),
    // the second word is a proper prefix of the first
    PrefixFollows,
    None,
}

fn first_divergence(first: &str, second: &str) -> Divergence {
    let mut first = first.chars();
    let mut second = second.chars();
    loop {
        match (first.next(), second.next()) {
            (Some(a), Some(b)) if a != b => return Divergence::At(a, b),
            (Some(_), Some(_)) => continue,
            (Some(_), None) => return Divergence::PrefixFollows,
            (None, _) => return Divergence::None,
        }
    }
}

/// Infers an order over symbols from a word list assumed to be sorted under that order.
///
/// Use [`Self::extract`] for the order itself or [`Self::constraint_graph`] to inspect the
/// constraints behind it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct OrderExtractor {
    tie_break: TieBreak,
}

impl OrderExtractor {
    /// An extractor using `tie_break` between simultaneously eligible symbols.
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    /// The tie-break in use.
    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Build the constraint graph implied by `words`.
    ///
    /// Every symbol of every word becomes a vertex. Each adjacent pair contributes at most one
    /// constraint, taken from the first position where they differ. Fails early with
    /// [`ExtractionFailure::PrefixInvalid`] if a word is followed by its own proper prefix.
    pub fn constraint_graph<S: AsRef<str>>(words: &[S]) -> Result<ConstraintGraph, ExtractionFailure> {
        let mut graph = ConstraintGraph::new();
        for word in words {
            word.as_ref().chars().for_each(|symbol| graph.add_symbol(symbol));
        }

        for (index, (first, second)) in words.iter().map(AsRef::as_ref).tuple_windows().enumerate() {
            match first_divergence(first, second) {
                Divergence::At(before, after) => {
                    graph.add_constraint(before, after);
                }
                Divergence::PrefixFollows => {
                    return Err(ExtractionFailure::PrefixInvalid {
                        index,
                        longer: first.to_owned(),
                        shorter: second.to_owned(),
                    });
                }
                Divergence::None => {}
            }
        }

        debug!(
            words = words.len(),
            symbols = graph.vertex_count(),
            constraints = graph.edge_count(),
            "built constraint graph"
        );
        Ok(graph)
    }

    /// Infer one order over every symbol in `words`, consistent with every constraint they imply.
    ///
    /// Returns [`Err`] with an [`ExtractionFailure`] if no such order exists; no partial order is
    /// ever returned. With [`TieBreak::Ascending`] the result depends only on the input.
    pub fn extract<S: AsRef<str>>(&self, words: &[S]) -> Result<Vec<Symbol>, ExtractionFailure> {
        let order = Self::constraint_graph(words).and_then(|graph| graph.into_order(self.tie_break));
        if let Err(failure) = &order {
            debug!(%failure, "no valid order");
        }

        order
    }
}

/// Shorthand for [`OrderExtractor::extract`] with the default, deterministic tie-break.
pub fn extract<S: AsRef<str>>(words: &[S]) -> Result<Vec<Symbol>, ExtractionFailure> {
    OrderExtractor::default().extract(words)
}
