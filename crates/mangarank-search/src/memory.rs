//! In-memory backends.
//!
//! Reference implementations of the backend traits: a filtered `Vec` scan
//! behind [`CandidateStore`] and a token inverted index behind [`TextIndex`].
//! Good enough for small corpora and embedded use; the test suite runs on
//! them exclusively. Both carry a poisoned mode that simulates an outage so
//! degradation paths can be exercised without a real backend.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

use mangarank_core::{Candidate, CandidateFilter, CandidateId, FieldId};

use crate::metrics::normalize_strict;
use crate::planner::{CandidateStore, IndexError, IndexHit, StoreError, TextIndex};

/// Largest per-term edit-distance budget the index accepts.
pub const MAX_FUZZINESS: u8 = 4;

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Candidate records held in a plain `Vec`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    candidates: Vec<Candidate>,
    poisoned: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            poisoned: false,
        }
    }

    /// Same store, but every call fails as if the backend were down.
    #[must_use]
    pub fn poisoned(mut self) -> Self {
        self.poisoned = true;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.poisoned {
            return Err(StoreError::Unavailable("in-memory store poisoned".into()));
        }
        Ok(())
    }
}

impl CandidateStore for MemoryStore {
    fn fetch_candidates(
        &self,
        filter: &CandidateFilter,
        max: usize,
    ) -> Result<Vec<Candidate>, StoreError> {
        self.check_available()?;
        Ok(self
            .candidates
            .iter()
            .filter(|c| filter.matches(c))
            .take(max)
            .cloned()
            .collect())
    }

    fn fetch_by_id(&self, id: CandidateId) -> Result<Option<Candidate>, StoreError> {
        self.check_available()?;
        Ok(self.candidates.iter().find(|c| c.id == id).cloned())
    }
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Posting {
    id: CandidateId,
    /// Token count of the indexed field value, for length normalization.
    field_len: usize,
}

/// Token inverted index over the text fields of a candidate set.
///
/// Scoring is tf-idf flavoured: rarer terms weigh more, longer field values
/// dilute each term, and fuzzy term matches are discounted by their edit
/// distance. Scores are comparable within one index, not across indexes.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    postings: HashMap<FieldId, HashMap<String, Vec<Posting>>>,
    docs_per_field: HashMap<FieldId, usize>,
    poisoned: bool,
}

impl MemoryIndex {
    /// Build the index over every candidate currently in `store`.
    #[must_use]
    pub fn from_store(store: &MemoryStore) -> Self {
        let mut index = Self::default();
        for candidate in &store.candidates {
            index.add(candidate);
        }
        index
    }

    /// Same index, but every lookup fails as if the backend were down.
    #[must_use]
    pub fn poisoned(mut self) -> Self {
        self.poisoned = true;
        self
    }

    fn add(&mut self, candidate: &Candidate) {
        for field in FieldId::ALL {
            let Some(value) = candidate.field(field) else {
                continue;
            };
            let tokens = tokenize(value);
            if tokens.is_empty() {
                continue;
            }
            *self.docs_per_field.entry(field).or_default() += 1;
            let field_len = tokens.len();
            let terms = self.postings.entry(field).or_default();
            // One posting per distinct term per document.
            let unique: HashSet<String> = tokens.into_iter().collect();
            for term in unique {
                terms.entry(term).or_default().push(Posting {
                    id: candidate.id,
                    field_len,
                });
            }
        }
    }
}

impl TextIndex for MemoryIndex {
    #[allow(clippy::cast_precision_loss)]
    fn lookup(
        &self,
        field: FieldId,
        query: &str,
        fuzziness: u8,
    ) -> Result<Vec<IndexHit>, IndexError> {
        if self.poisoned {
            return Err(IndexError::Unavailable("in-memory index poisoned".into()));
        }
        if fuzziness > MAX_FUZZINESS {
            return Err(IndexError::InvalidFuzziness {
                requested: fuzziness,
                max: MAX_FUZZINESS,
            });
        }

        let Some(terms) = self.postings.get(&field) else {
            return Ok(Vec::new());
        };
        let docs = self.docs_per_field.get(&field).copied().unwrap_or(0);
        if docs == 0 {
            return Ok(Vec::new());
        }

        let mut scores: HashMap<CandidateId, f64> = HashMap::new();
        for token in tokenize(query) {
            let token_chars: Vec<char> = token.chars().collect();
            // Short tokens get a tighter budget so a generous request-level
            // fuzziness cannot make 3-letter words match everything.
            let budget = usize::from(fuzziness).min(token_chars.len() / 2);

            for (term, postings) in terms {
                let Some(distance) = distance_within(&token_chars, term, budget) else {
                    continue;
                };
                let idf = (1.0 + docs as f64 / (1.0 + postings.len() as f64)).ln() + 1.0;
                for posting in postings {
                    let tf = 1.0 / posting.field_len as f64;
                    let discount = 1.0 / (1.0 + distance as f64);
                    *scores.entry(posting.id).or_default() += idf * tf * discount;
                }
            }
        }

        Ok(scores
            .into_iter()
            .map(|(id, score)| IndexHit { id, score })
            .collect())
    }
}

fn tokenize(s: &str) -> Vec<String> {
    normalize_strict(s)
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Edit distance between `a` and `b`, or `None` when it exceeds `budget`.
fn distance_within(a: &[char], b: &str, budget: usize) -> Option<usize> {
    let b_chars: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b_chars.len()) > budget {
        return None;
    }
    let distance = levenshtein(a, &b_chars);
    (distance <= budget).then_some(distance)
}

/// Two-row Levenshtein over char slices.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
