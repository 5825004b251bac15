use itertools::Itertools;
use strum::{Display, EnumString, VariantArray};
use thiserror::Error;

use crate::encoder::OrderEncoder;
use crate::symbol::{Alphabet, Symbol};

/// Strategy for laying down the constraint-bearing backbone of a generated word list.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Display, EnumString, VariantArray)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mode {
    /// Force a total order over the whole alphabet.
    #[default]
    Unique,
    /// Force the order of the first `enforce_prefix` symbols only; the rest float.
    Ambiguous,
    /// Sparse, clustered, mostly ambiguous constraints with deep first differences.
    Adversarial,
}

/// Knobs that only matter in [`Mode::Adversarial`].
#[derive(Clone, Debug, PartialEq)]
pub struct AdversarialProfile {
    /// Number of contiguous clusters the alphabet is split into.
    pub clusters: usize,
    /// Chain the first N symbols of the whole alphabet.
    pub enforce_global: usize,
    /// Chain the first K symbols of every cluster.
    pub enforce_per_cluster: usize,
    /// Probability that a padding word is an edge-barren noise word.
    pub noise_ratio: f64,
    /// Probability that a position in a noise word's tail is the spice symbol instead of filler.
    pub noise_spice: f64,
    /// Constraint pairs emitted across every boundary between neighboring clusters.
    pub inter_cluster_pairs: usize,
}

impl Default for AdversarialProfile {
    fn default() -> Self {
        Self {
            clusters: 8,
            enforce_global: 0,
            enforce_per_cluster: 0,
            noise_ratio: 0.85,
            noise_spice: 0.02,
            inter_cluster_pairs: 2,
        }
    }
}

/// A validated, immutable generation setup. Obtain one through [`EncoderBuilder`].
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationConfig {
    pub(crate) word_count: usize,
    pub(crate) min_len: usize,
    pub(crate) max_len: usize,
    pub(crate) seed: u64,
    pub(crate) mode: Mode,
    pub(crate) enforce_prefix: usize,
    pub(crate) filler: Symbol,
    pub(crate) filler_bias: f64,
    pub(crate) pain_prefix_len: usize,
    pub(crate) adversarial: AdversarialProfile,
}

impl GenerationConfig {
    /// Requested number of words. The backbone alone may exceed it.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Inclusive word length bounds for padding words.
    pub fn word_len(&self) -> (usize, usize) {
        (self.min_len, self.max_len)
    }

    /// Seed of the padding phase's random source.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The generation mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The resolved filler symbol.
    pub fn filler(&self) -> Symbol {
        self.filler
    }

    /// Common prefix length before a backbone pair's first difference.
    pub fn pain_prefix_len(&self) -> usize {
        self.pain_prefix_len
    }

    /// The adversarial profile (ignored by other modes).
    pub fn adversarial(&self) -> &AdversarialProfile {
        &self.adversarial
    }
}

/// Reasons a builder may become invalid while building.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigInvalidReason {
    /// There is nothing to generate words from.
    #[error("the alphabet has no symbols")]
    EmptyAlphabet,
    /// Words must hold at least one symbol.
    #[error("minimum word length must be at least 1")]
    ZeroMinLength,
    /// The maximum word length is below the minimum.
    #[error("maximum word length {max} is below minimum {min}")]
    LengthBounds {
        /// Requested minimum.
        min: usize,
        /// Requested maximum.
        max: usize,
    },
    /// An explicit filler symbol must belong to the alphabet.
    #[error("filler symbol {0:?} is not part of the alphabet")]
    FillerNotInAlphabet(Symbol),
    /// [`Mode::Ambiguous`] needs to know how much of the alphabet to pin down.
    #[error("ambiguous mode requires an enforce-prefix length")]
    MissingEnforcePrefix,
    /// A prefix, chain or cluster parameter does not fit the alphabet.
    #[error("{name} is {requested}, expected {expected}")]
    OutOfRange {
        /// The parameter.
        name: &'static str,
        /// The value given.
        requested: usize,
        /// The accepted range, for humans.
        expected: String,
    },
    /// A probability outside `[0, 1]`.
    #[error("{name} must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange {
        /// The parameter.
        name: &'static str,
        /// The value given.
        value: f64,
    },
}

/// Every reason a [`EncoderBuilder`] refused to build.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("invalid generation config: {}", .reasons.iter().join("; "))]
pub struct ConfigError {
    reasons: Vec<ConfigInvalidReason>,
}

impl ConfigError {
    /// The individual reasons, in the order they were detected.
    pub fn reasons(&self) -> &[ConfigInvalidReason] {
        &self.reasons
    }
}

/// Longest accepted pain prefix. Every backbone word is at least this long plus one.
pub const MAX_PAIN_PREFIX: usize = 1 << 16;

/// Assembles a [`GenerationConfig`] for an [`Alphabet`] and turns it into an [`OrderEncoder`].
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
/// Setters that can be checked on their own are checked immediately; once the builder is invalid,
/// further setters do nothing. Mode-dependent checks run in [`Self::build`].
#[derive(Clone, Debug)]
pub struct EncoderBuilder {
    alphabet: Alphabet,
    word_count: usize,
    min_len: usize,
    max_len: usize,
    seed: u64,
    mode: Mode,
    enforce_prefix: Option<usize>,
    filler: Option<Symbol>,
    filler_bias: f64,
    pain_prefix_len: usize,
    adversarial: AdversarialProfile,
    invalid_reasons: Vec<ConfigInvalidReason>,
}

impl EncoderBuilder {
    /// Start from defaults: 1000 words of 3 to 10 symbols, seed 0, [`Mode::Unique`], filler = the
    /// first symbol, no pain prefix.
    pub fn new(alphabet: Alphabet) -> Self {
        let mut invalid_reasons = Vec::new();
        if alphabet.is_empty() {
            invalid_reasons.push(ConfigInvalidReason::EmptyAlphabet);
        }

        Self {
            alphabet,
            word_count: 1000,
            min_len: 3,
            max_len: 10,
            seed: 0,
            mode: Mode::default(),
            enforce_prefix: None,
            filler: None,
            filler_bias: 0.75,
            pain_prefix_len: 0,
            adversarial: AdversarialProfile::default(),
            invalid_reasons,
        }
    }

    /// Requested number of words. Zero makes [`OrderEncoder::encode`] return an empty list.
    pub fn word_count(&mut self, word_count: usize) -> &mut Self {
        if self.invalid_reasons.is_empty() {
            self.word_count = word_count;
        }
        self
    }

    /// Inclusive length bounds for padding words.
    ///
    /// May invalidate the builder with [`ZeroMinLength`](ConfigInvalidReason::ZeroMinLength) or
    /// [`LengthBounds`](ConfigInvalidReason::LengthBounds).
    pub fn word_len(&mut self, min: usize, max: usize) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if min == 0 {
            self.invalid_reasons.push(ConfigInvalidReason::ZeroMinLength);
            return self;
        }
        if max < min {
            self.invalid_reasons.push(ConfigInvalidReason::LengthBounds { min, max });
            return self;
        }

        self.min_len = min;
        self.max_len = max;
        self
    }

    /// Seed for the padding phase.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        if self.invalid_reasons.is_empty() {
            self.seed = seed;
        }
        self
    }

    /// Generation mode.
    pub fn mode(&mut self, mode: Mode) -> &mut Self {
        if self.invalid_reasons.is_empty() {
            self.mode = mode;
        }
        self
    }

    /// In [`Mode::Ambiguous`], chain only the first `len` symbols.
    pub fn enforce_prefix(&mut self, len: usize) -> &mut Self {
        if self.invalid_reasons.is_empty() {
            self.enforce_prefix = Some(len);
        }
        self
    }

    /// Symbol used to pad words. Defaults to the first symbol of the alphabet.
    ///
    /// May invalidate the builder with [`FillerNotInAlphabet`](ConfigInvalidReason::FillerNotInAlphabet).
    pub fn filler(&mut self, filler: Symbol) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !self.alphabet.contains(filler) {
            self.invalid_reasons.push(ConfigInvalidReason::FillerNotInAlphabet(filler));
            return self;
        }

        self.filler = Some(filler);
        self
    }

    /// Probability that a position after the first in a padding word holds the filler symbol.
    pub fn filler_bias(&mut self, bias: f64) -> &mut Self {
        if self.check_probability("filler bias", bias) {
            self.filler_bias = bias;
        }
        self
    }

    /// Length of the common filler prefix placed before every backbone pair's first difference.
    ///
    /// May invalidate the builder with [`OutOfRange`](ConfigInvalidReason::OutOfRange) above
    /// [`MAX_PAIN_PREFIX`].
    pub fn pain_prefix(&mut self, len: usize) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if len > MAX_PAIN_PREFIX {
            self.invalid_reasons.push(ConfigInvalidReason::OutOfRange {
                name: "pain-prefix",
                requested: len,
                expected: format!("at most {}", MAX_PAIN_PREFIX),
            });
            return self;
        }

        self.pain_prefix_len = len;
        self
    }

    /// Number of clusters in [`Mode::Adversarial`].
    pub fn clusters(&mut self, clusters: usize) -> &mut Self {
        if self.invalid_reasons.is_empty() {
            self.adversarial.clusters = clusters;
        }
        self
    }

    /// In [`Mode::Adversarial`], chain the first `len` symbols of the alphabet.
    pub fn enforce_global(&mut self, len: usize) -> &mut Self {
        if self.invalid_reasons.is_empty() {
            self.adversarial.enforce_global = len;
        }
        self
    }

    /// In [`Mode::Adversarial`], chain the first `len` symbols of every cluster.
    pub fn enforce_per_cluster(&mut self, len: usize) -> &mut Self {
        if self.invalid_reasons.is_empty() {
            self.adversarial.enforce_per_cluster = len;
        }
        self
    }

    /// In [`Mode::Adversarial`], the share of padding words that are noise words.
    pub fn noise_ratio(&mut self, ratio: f64) -> &mut Self {
        if self.check_probability("noise ratio", ratio) {
            self.adversarial.noise_ratio = ratio;
        }
        self
    }

    /// In [`Mode::Adversarial`], the chance that a noise word's tail position holds the spice
    /// symbol (the last of the leading symbols noise heads come from) instead of the filler.
    pub fn noise_spice(&mut self, spice: f64) -> &mut Self {
        if self.check_probability("noise spice", spice) {
            self.adversarial.noise_spice = spice;
        }
        self
    }

    /// In [`Mode::Adversarial`], constraint pairs per boundary between neighboring clusters.
    pub fn inter_cluster_pairs(&mut self, pairs: usize) -> &mut Self {
        if self.invalid_reasons.is_empty() {
            self.adversarial.inter_cluster_pairs = pairs;
        }
        self
    }

    fn check_probability(&mut self, name: &'static str, value: f64) -> bool {
        if !self.invalid_reasons.is_empty() {
            return false;
        }

        if !(0.0..=1.0).contains(&value) {
            self.invalid_reasons.push(ConfigInvalidReason::ProbabilityOutOfRange { name, value });
            return false;
        }

        true
    }

    fn mode_reasons(&self) -> Vec<ConfigInvalidReason> {
        let available = self.alphabet.len();
        let up_to_alphabet = |name: &'static str, requested: usize, min: usize| {
            (!(min..=available).contains(&requested)).then(|| ConfigInvalidReason::OutOfRange {
                name,
                requested,
                expected: format!("between {} and {}", min, available),
            })
        };

        match self.mode {
            Mode::Unique => vec![],
            Mode::Ambiguous => match self.enforce_prefix {
                None => vec![ConfigInvalidReason::MissingEnforcePrefix],
                Some(len) => up_to_alphabet("enforce-prefix", len, 0).into_iter().collect(),
            },
            Mode::Adversarial => [
                up_to_alphabet("clusters", self.adversarial.clusters, 1),
                up_to_alphabet("enforce-global", self.adversarial.enforce_global, 0),
            ]
                .into_iter()
                .flatten()
                .collect(),
        }
    }

    /// Check the validity of this builder, ensuring no [`ConfigInvalidReason`] condition has arisen
    /// from a setter.
    ///
    /// Returns `None` if the builder is valid so far, `Some(&Vec<ConfigInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<ConfigInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Validate everything, including mode-dependent parameters, and produce an encoder.
    pub fn build(&self) -> Result<OrderEncoder, ConfigError> {
        if !self.invalid_reasons.is_empty() {
            return Err(ConfigError { reasons: self.invalid_reasons.clone() });
        }

        // zero words never reach generation, so mode parameters are moot
        let reasons = if self.word_count == 0 { vec![] } else { self.mode_reasons() };
        if !reasons.is_empty() {
            return Err(ConfigError { reasons });
        }

        // non-empty, checked in new()
        let Some(first) = self.alphabet.symbols().first() else {
            return Err(ConfigError { reasons: vec![ConfigInvalidReason::EmptyAlphabet] });
        };

        let config = GenerationConfig {
            word_count: self.word_count,
            min_len: self.min_len,
            max_len: self.max_len,
            seed: self.seed,
            mode: self.mode,
            enforce_prefix: self.enforce_prefix.unwrap_or(0),
            filler: self.filler.unwrap_or(*first),
            filler_bias: self.filler_bias,
            pain_prefix_len: self.pain_prefix_len,
            adversarial: self.adversarial.clone(),
        };

        Ok(OrderEncoder::new(self.alphabet.clone(), config))
    }
}
