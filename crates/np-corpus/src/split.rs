//! Deterministic train / held-out partition of the corpus.

use std::path::Path;

use np_protocol::QaPair;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{CorpusError, CorpusResult};
use crate::loader::load_csv;

/// Default share of rows placed in the training subset.
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;

/// Default shuffle seed.
pub const DEFAULT_SEED: u64 = 1;

/// Corpus split into a training subset (matched against) and a held-out
/// subset. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    train: Vec<QaPair>,
    held_out: Vec<QaPair>,
}

impl Corpus {
    /// Load a CSV corpus and split it.
    pub fn load(path: impl AsRef<Path>, train_ratio: f64, seed: u64) -> CorpusResult<Self> {
        let pairs = load_csv(path)?;
        Self::split(pairs, train_ratio, seed)
    }

    /// Split `pairs` using a seeded shuffle.
    ///
    /// The training subset takes `round(n * train_ratio)` rows in shuffled
    /// order; the held-out subset keeps the remaining rows in their original
    /// order. The same inputs always produce the same split.
    pub fn split(pairs: Vec<QaPair>, train_ratio: f64, seed: u64) -> CorpusResult<Self> {
        if !(0.0..=1.0).contains(&train_ratio) {
            return Err(CorpusError::InvalidRatio(train_ratio));
        }

        let total = pairs.len();
        let train_len = (total as f64 * train_ratio).round() as usize;

        let mut order: Vec<usize> = (0..total).collect();
        order.shuffle(&mut StdRng::seed_from_u64(seed));

        let mut held_idx = order.split_off(train_len);
        held_idx.sort_unstable();

        let mut slots: Vec<Option<QaPair>> = pairs.into_iter().map(Some).collect();
        let train = order.iter().filter_map(|&i| slots[i].take()).collect();
        let held_out = held_idx.iter().filter_map(|&i| slots[i].take()).collect();

        let corpus = Self { train, held_out };
        tracing::debug!(
            train = corpus.train.len(),
            held_out = corpus.held_out.len(),
            seed,
            "corpus split"
        );
        Ok(corpus)
    }

    /// Build a corpus whose training subset is exactly `pairs`.
    pub fn from_train(pairs: Vec<QaPair>) -> Self {
        Self {
            train: pairs,
            held_out: Vec::new(),
        }
    }

    /// Pairs used for matching.
    pub fn train(&self) -> &[QaPair] {
        &self.train
    }

    /// Pairs withheld from matching.
    pub fn held_out(&self) -> &[QaPair] {
        &self.held_out
    }

    /// Total number of pairs across both subsets.
    pub fn len(&self) -> usize {
        self.train.len() + self.held_out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
