//! Known-question corpus for NetPilot.
//!
//! Loads `question,answer` rows from CSV, splits them deterministically into
//! a training subset (used for matching) and a held-out subset, and finds the
//! closest known question for a free-form query.

pub mod error;
pub mod loader;
pub mod matcher;
pub mod similarity;
pub mod split;

pub use error::{CorpusError, CorpusResult};
pub use loader::{load_csv, read_pairs};
pub use matcher::{DEFAULT_THRESHOLD, find_best_match};
pub use similarity::ratio;
pub use split::{Corpus, DEFAULT_SEED, DEFAULT_TRAIN_RATIO};
