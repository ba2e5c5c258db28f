//! Best-match lookup over the corpus.

use np_protocol::{MatchResult, QaPair};

use crate::similarity::ratio;

/// Minimum similarity for a corpus question to count as a match.
pub const DEFAULT_THRESHOLD: f64 = 0.50;

/// Find the corpus pair whose question is most similar to `query`.
///
/// Scans the whole corpus. A candidate replaces the current best only when
/// its score is strictly higher and at least `threshold`, so on equal scores
/// the first pair in corpus order wins. Returns `None` when nothing reaches
/// the threshold.
pub fn find_best_match(query: &str, corpus: &[QaPair], threshold: f64) -> Option<MatchResult> {
    let mut best: Option<&QaPair> = None;
    let mut best_score = 0.0;

    for pair in corpus {
        let score = ratio(query, &pair.question);
        if score > best_score && score >= threshold {
            best_score = score;
            best = Some(pair);
        }
    }

    best.map(|pair| MatchResult {
        pair: pair.clone(),
        score: best_score,
    })
}
