//! Approximate string-similarity metrics.
//!
//! # Overview
//!
//! Four pure, total functions over two strings, each returning a value in
//! `[0.0, 1.0]`. They tolerate empty input (scoring `0.0` rather than
//! failing) and treat both arguments identically, so every metric is
//! symmetric.
//!
//! Lengths and positions are counted in Unicode scalar values, not bytes;
//! native-script titles are routinely CJK.
//!
//! The exact-containment rule differs on purpose between two of the metrics:
//! [`basic_similarity`] *floors* containment at 0.6, while
//! [`combined_similarity`] applies a flat *additive* bonus. Both rules are
//! documented and tested; do not unify them.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Floor applied by [`basic_similarity`] when one string contains the other.
const CONTAINMENT_FLOOR: f64 = 0.6;

/// Flat bonus added by [`combined_similarity`] for case-insensitive containment.
pub const DEFAULT_EXACT_BONUS: f64 = 0.3;

/// Coefficient of the length-difference penalty in [`combined_similarity`].
pub const DEFAULT_LENGTH_PENALTY: f64 = 0.3;

/// Prefix weight in [`edge_similarity`].
const EDGE_PREFIX_WEIGHT: f64 = 0.4;

/// Suffix weight in [`edge_similarity`].
const EDGE_SUFFIX_WEIGHT: f64 = 0.3;

/// Basic-similarity weight in [`edge_similarity`].
const EDGE_BASIC_WEIGHT: f64 = 0.3;

// ---------------------------------------------------------------------------
// Normalization helpers
// ---------------------------------------------------------------------------

/// Aggressive normalization: lowercase, drop everything outside
/// alphanumerics/whitespace, trim.
pub(crate) fn normalize_strict(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Light normalization: lowercase and trim, punctuation preserved.
fn normalize_light(s: &str) -> String {
    s.to_lowercase().trim().to_string()
}

fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Length of the shared prefix run, in chars.
fn common_prefix_len(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Length of the shared suffix run, in chars, capped at `max` so the suffix
/// run cannot claim characters already consumed by the prefix run.
fn common_suffix_len(a: &[char], b: &[char], max: usize) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take(max)
        .take_while(|(x, y)| x == y)
        .count()
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Character-position similarity over strictly normalized strings.
///
/// Normalized-equal strings score `1.0`. Otherwise the score is the count of
/// position-by-position matches over the shared prefix span, divided by the
/// longer length. Containment (either normalized string a substring of the
/// other) floors the result at 0.6.
///
/// Empty input on either side (after normalization) scores `0.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn basic_similarity(a: &str, b: &str) -> f64 {
    let na = normalize_strict(a);
    let nb = normalize_strict(b);
    if na.is_empty() || nb.is_empty() {
        return 0.0;
    }
    if na == nb {
        return 1.0;
    }

    let ca: Vec<char> = na.chars().collect();
    let cb: Vec<char> = nb.chars().collect();
    let max_len = ca.len().max(cb.len());

    let positional_matches = ca
        .iter()
        .zip(cb.iter())
        .filter(|(x, y)| x == y)
        .count();

    let mut score = positional_matches as f64 / max_len as f64;
    if na.contains(&nb) || nb.contains(&na) {
        score = score.max(CONTAINMENT_FLOOR);
    }
    clamp01(score)
}

/// Shared-vocabulary similarity: `|common words| / max(word count)`.
///
/// Both strings are lowercased and split on whitespace; a word is common if
/// it appears in both sequences (exact token equality, no stemming). Either
/// side having zero words scores `0.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn word_overlap(a: &str, b: &str) -> f64 {
    let na = normalize_light(a);
    let nb = normalize_light(b);

    let words_a: Vec<&str> = na.split_whitespace().collect();
    let words_b: Vec<&str> = nb.split_whitespace().collect();
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let set_a: std::collections::HashSet<&str> = words_a.iter().copied().collect();
    let set_b: std::collections::HashSet<&str> = words_b.iter().copied().collect();
    let common = set_a.intersection(&set_b).count();

    common as f64 / words_a.len().max(words_b.len()) as f64
}

/// Prefix/suffix-weighted similarity over lightly normalized strings.
///
/// Both strings empty after trim scores `1.0`; exactly one empty scores
/// `0.0`; equal scores `1.0`. Otherwise combines the shared prefix run, the
/// non-overlapping shared suffix run, and [`basic_similarity`]:
///
/// ```text
/// 0.4 * prefix/max_len  +  0.3 * suffix/max_len  +  0.3 * basic
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn edge_similarity(a: &str, b: &str) -> f64 {
    let na = normalize_light(a);
    let nb = normalize_light(b);

    if na.is_empty() && nb.is_empty() {
        return 1.0;
    }
    if na.is_empty() || nb.is_empty() {
        return 0.0;
    }
    if na == nb {
        return 1.0;
    }

    let ca: Vec<char> = na.chars().collect();
    let cb: Vec<char> = nb.chars().collect();
    let max_len = ca.len().max(cb.len());
    let min_len = ca.len().min(cb.len());

    let prefix = common_prefix_len(&ca, &cb);
    let suffix = common_suffix_len(&ca, &cb, min_len - prefix);

    let score = EDGE_PREFIX_WEIGHT * (prefix as f64 / max_len as f64)
        + EDGE_SUFFIX_WEIGHT * (suffix as f64 / max_len as f64)
        + EDGE_BASIC_WEIGHT * basic_similarity(a, b);
    clamp01(score)
}

/// The headline metric: best of edge and word-overlap similarity, with a
/// length penalty and an additive containment bonus.
///
/// Uses the default bonus/penalty coefficients; see
/// [`combined_similarity_with`] for the tunable form.
#[must_use]
pub fn combined_similarity(a: &str, b: &str) -> f64 {
    combined_similarity_with(a, b, DEFAULT_EXACT_BONUS, DEFAULT_LENGTH_PENALTY)
}

/// [`combined_similarity`] with explicit containment-bonus and
/// length-penalty coefficients.
///
/// Pipeline:
/// 1. either side empty after trim ⇒ `0.0`
/// 2. equal after lowercase/trim ⇒ `1.0`
/// 3. `best = max(edge_similarity, word_overlap)`
/// 4. `penalty = 1 - length_penalty * |len(a) - len(b)| / max(len)`
/// 5. case-insensitive containment adds `exact_bonus`: additive, not a
///    floor, so it can lift a near miss toward (but never past) `1.0`
/// 6. `clamp01(best * penalty + bonus)`
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn combined_similarity_with(a: &str, b: &str, exact_bonus: f64, length_penalty: f64) -> f64 {
    let na = normalize_light(a);
    let nb = normalize_light(b);

    if na.is_empty() || nb.is_empty() {
        return 0.0;
    }
    if na == nb {
        return 1.0;
    }

    let best = edge_similarity(a, b).max(word_overlap(a, b));

    let len_a = na.chars().count();
    let len_b = nb.chars().count();
    let max_len = len_a.max(len_b);
    let penalty = 1.0 - length_penalty * (len_a.abs_diff(len_b) as f64) / max_len as f64;

    let bonus = if na.contains(&nb) || nb.contains(&na) {
        exact_bonus
    } else {
        0.0
    };

    clamp01(best * penalty + bonus)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
