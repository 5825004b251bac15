use std::iter;

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::builder::{GenerationConfig, Mode};
use crate::symbol::{Alphabet, Symbol};

/// Noise words draw their head from at most this many leading symbols.
const HEAD_POOL: usize = 16;

/// Produces word lists sorted under an intended order, such that [`extract`](crate::extract)
/// recovers the constraints the [`Mode`] asks for. Build one with
/// [`EncoderBuilder`](crate::EncoderBuilder).
#[derive(Clone, Debug)]
pub struct OrderEncoder {
    alphabet: Alphabet,
    config: GenerationConfig,
}

impl OrderEncoder {
    pub(crate) fn new(alphabet: Alphabet, config: GenerationConfig) -> Self {
        Self { alphabet, config }
    }

    /// The intended order.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The configuration this encoder was built with.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generate the word list: backbone, then padding up to the requested count, then sorted.
    ///
    /// The output is a pure function of the alphabet and the config. It is empty when zero words
    /// were requested, and longer than requested when the backbone alone exceeds the count.
    pub fn encode(&self) -> Vec<String> {
        let target = self.config.word_count;
        if target == 0 {
            debug!("zero words requested");
            return Vec::new();
        }

        let mut words = self.backbone();
        let backbone = words.len();

        // carriers are part of the fixed structure, never cut to fit the count
        if self.config.mode == Mode::Ambiguous {
            words.extend(self.carrier_words());
        }
        let fixed = words.len();

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        while words.len() < target {
            let word = self.padding_word(&mut rng, &words[..backbone]);
            words.push(word);
        }

        debug!(
            mode = %self.config.mode,
            backbone,
            carriers = fixed - backbone,
            padding = words.len() - fixed,
            "encoded word list"
        );

        self.alphabet.sort_words(&mut words);
        words
    }

    /// The constraint-bearing words alone, unsorted.
    pub fn backbone(&self) -> Vec<String> {
        let symbols = self.alphabet.symbols();
        match self.config.mode {
            Mode::Unique => self.chain(symbols),
            Mode::Ambiguous => {
                let enforced = self.config.enforce_prefix.max(1).min(symbols.len());
                self.chain(&symbols[..enforced])
            }
            Mode::Adversarial => self.adversarial_backbone(),
        }
    }

    // filler^p, then `symbol`, then filler up to the minimum length
    fn deep_word(&self, symbol: Symbol) -> String {
        let filler = self.config.filler;
        let prefix = self.config.pain_prefix_len;
        let len = self.config.min_len.max(prefix + 1);

        iter::repeat(filler)
            .take(prefix)
            .chain(iter::once(symbol))
            .chain(iter::repeat(filler).take(len - prefix - 1))
            .collect()
    }

    // a pair of words per neighboring symbols, differing first at the pain prefix
    fn chain(&self, symbols: &[Symbol]) -> Vec<String> {
        if let [only] = symbols {
            return vec![self.deep_word(*only)];
        }

        symbols
            .iter()
            .tuple_windows()
            .flat_map(|(before, after)| [self.deep_word(*before), self.deep_word(*after)])
            .collect()
    }

    fn adversarial_backbone(&self) -> Vec<String> {
        let symbols = self.alphabet.symbols();
        let profile = &self.config.adversarial;
        let clusters = partition(symbols, profile.clusters);

        let mut words = Vec::new();
        if profile.enforce_global > 0 {
            words.extend(self.chain(&symbols[..profile.enforce_global.min(symbols.len())]));
        }

        if profile.enforce_per_cluster > 0 {
            for cluster in &clusters {
                words.extend(self.chain(&cluster[..profile.enforce_per_cluster.min(cluster.len())]));
            }
        }

        for (left, right) in clusters.iter().tuple_windows() {
            let (Some(last), Some(first)) = (left.last(), right.first()) else {
                continue;
            };
            for _ in 0..profile.inter_cluster_pairs {
                words.push(self.deep_word(*last));
                words.push(self.deep_word(*first));
            }
        }

        // one representative per cluster, no edges
        words.extend(clusters.iter().map(|cluster| self.deep_word(cluster[cluster.len() / 2])));

        debug!(clusters = clusters.len(), words = words.len(), "built adversarial backbone");
        words
    }

    // put every symbol outside the enforced prefix into the vertex set
    fn carrier_words(&self) -> Vec<String> {
        let symbols = self.alphabet.symbols();
        let floating = &symbols[self.config.enforce_prefix.max(1).min(symbols.len())..];
        let filler = self.config.filler;
        let run = self.config.max_len.saturating_sub(1).max(1);

        floating
            .chunks(run)
            .map(|chunk| {
                let mut word = iter::once(filler).chain(chunk.iter().copied()).collect::<String>();
                let len = chunk.len() + 1;
                word.extend(iter::repeat(filler).take(self.config.min_len.saturating_sub(len)));
                word
            })
            .collect()
    }

    // adversarial padding only ever repeats the fixed set of constraints
    fn padding_word(&self, rng: &mut StdRng, backbone: &[String]) -> String {
        if self.config.mode != Mode::Adversarial {
            return self.filler_word(rng);
        }

        if rng.gen_bool(self.config.adversarial.noise_ratio) {
            return self.noise_word(rng);
        }
        match backbone.choose(rng) {
            Some(word) => word.clone(),
            None => self.noise_word(rng),
        }
    }

    fn head_pool(&self) -> &[Symbol] {
        let symbols = self.alphabet.symbols();
        &symbols[..symbols.len().min(HEAD_POOL)]
    }

    // the one symbol besides the filler a noise tail may hold
    fn spice_symbol(&self) -> Option<Symbol> {
        self.head_pool().iter().rev().copied().find(|symbol| *symbol != self.config.filler)
    }

    fn random_symbol(&self, rng: &mut StdRng) -> Symbol {
        self.alphabet.symbols().choose(rng).copied().unwrap_or(self.config.filler)
    }

    // filler^p, a head from the first few symbols, then a filler tail rarely spiced with one fixed
    // symbol, so the only edges noise can add are between heads and between filler and spice
    fn noise_word(&self, rng: &mut StdRng) -> String {
        let filler = self.config.filler;
        let prefix = self.config.pain_prefix_len;
        let len = rng.gen_range(self.config.min_len..=self.config.max_len).max(prefix + 1);

        let head = self.head_pool().choose(rng).copied().unwrap_or(filler);
        let spice = self.spice_symbol().unwrap_or(filler);

        let mut word = iter::repeat(filler).take(prefix).collect::<String>();
        word.push(head);
        for _ in 0..len - prefix - 1 {
            let symbol = if rng.gen_bool(self.config.adversarial.noise_spice) { spice } else { filler };
            word.push(symbol);
        }
        word
    }

    // a random head, then mostly filler
    fn filler_word(&self, rng: &mut StdRng) -> String {
        let len = rng.gen_range(self.config.min_len..=self.config.max_len);

        let mut word = String::new();
        word.push(self.random_symbol(rng));
        for _ in 1..len {
            let symbol = if rng.gen_bool(self.config.filler_bias) {
                self.config.filler
            } else {
                self.random_symbol(rng)
            };
            word.push(symbol);
        }
        word
    }
}

/// Split `symbols` into `clusters` contiguous runs whose sizes differ by at most one, larger
/// runs first.
pub(crate) fn partition(symbols: &[Symbol], clusters: usize) -> Vec<&[Symbol]> {
    if symbols.is_empty() {
        return Vec::new();
    }

    let clusters = clusters.clamp(1, symbols.len());
    let base = symbols.len() / clusters;
    let larger = symbols.len() % clusters;

    let mut rest = symbols;
    (0..clusters)
        .map(|index| {
            let size = base + usize::from(index < larger);
            let (cluster, tail) = rest.split_at(size);
            rest = tail;
            cluster
        })
        .collect()
}
