#![warn(missing_docs)]

//! # `alienorder`
//!
//! Recover the order of an unknown alphabet from a word list sorted under it, and the inverse: produce word lists
//! sorted under a chosen order, with as much or as little information about that order as you like.
//!
//! Begin with [`extract`] (or an [`OrderExtractor`] with an explicit [`TieBreak`]) on any slice of strings.
//! To generate instances, parse an [`Alphabet`], configure an [`EncoderBuilder`] and call
//! [`encode()`](OrderEncoder::encode) on what it builds.
//!
//! # Internals
//! Two adjacent words in a sorted list say exactly one thing about the order: at the first position where they
//! differ, the symbol of the first word comes before the symbol of the second.
//! If instead the second word is a proper prefix of the first, the list cannot be sorted under any order.
//! Collecting these facts yields a [`ConstraintGraph`], and any topological order of it is a valid answer.
//! We use Kahn's algorithm, choosing among ready symbols by [`TieBreak`]; a cycle means no answer exists.
//!
//! Generation runs the other way around. A *backbone* of word pairs sharing a filler prefix of configurable
//! depth encodes exactly the constraints the [`Mode`] asks for:
//! 1. [`Mode::Unique`] chains the whole alphabet, so exactly one order survives.
//! 2. [`Mode::Ambiguous`] chains a prefix of it and leaves the rest floating.
//! 3. [`Mode::Adversarial`] splits the alphabet into clusters joined by a handful of deep constraints, then buries
//! them under noise words that share long prefixes but add almost no edges.
//!
//! The list is then padded to the requested size from a seeded generator and sorted under the intended order, so
//! the result is always a valid instance.
//!
//! Word lists from disk go through a forgiving [decoder](decode) that tries several encodings before giving up
//! on strictness.

pub use builder::{
    AdversarialProfile, ConfigError, ConfigInvalidReason, EncoderBuilder, GenerationConfig, Mode, MAX_PAIN_PREFIX,
};
pub use decode::{read_words, ReadStats};
pub use encoder::OrderEncoder;
pub use error::{AlphabetError, MapperError, ReadError};
pub use graph::ConstraintGraph;
pub use mapper::SubstitutionTable;
pub use report::ExtractionReport;
pub use solver::{extract, ExtractionFailure, OrderExtractor, TieBreak};
pub use symbol::{Alphabet, Symbol};

pub mod builder;
pub mod decode;
pub(crate) mod encoder;
pub(crate) mod error;
pub(crate) mod graph;
pub(crate) mod mapper;
pub(crate) mod report;
pub(crate) mod solver;
pub(crate) mod symbol;
mod tests;
