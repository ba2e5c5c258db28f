//! Ratcliff–Obershelp string similarity.
//!
//! Finds the longest common block, recurses into the unmatched text on both
//! sides, and scores `2 * matched / (len(a) + len(b))`. Longest-block ties
//! resolve to the earliest position in `a`, so the score is not strictly
//! symmetric for inputs with several equally long blocks.

/// Similarity of `a` and `b` in `[0, 1]`. Two empty strings score `1.0`.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

/// Total length of all matching blocks between `a` and `b`.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
///
/// Among equally long blocks the one starting earliest in `a` wins, then the
/// one starting earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo;
    // run[x + 1]: length of the common run ending at a[i] and b[blo + x]
    let mut prev = vec![0usize; width + 1];
    let mut cur = vec![0usize; width + 1];
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);

    for i in alo..ahi {
        for x in 0..width {
            cur[x + 1] = if a[i] == b[blo + x] { prev[x] + 1 } else { 0 };
            let k = cur[x + 1];
            if k > best_len {
                best_i = i + 1 - k;
                best_j = blo + x + 1 - k;
                best_len = k;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    (best_i, best_j, best_len)
}
