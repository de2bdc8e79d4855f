#![forbid(unsafe_code)]
//! mangarank-search library.
//!
//! Hybrid relevance ranking: an external full-text index and a string
//! similarity fallback, fused into one deterministic ordering. The entry
//! point is [`SearchEngine`]; backends plug in through the [`TextIndex`] and
//! [`CandidateStore`] traits, with in-memory reference implementations in
//! [`memory`].
//!
//! # Conventions
//!
//! - **Errors**: typed enums per seam; only validation and store failures are
//!   fatal, index failures degrade.
//! - **Logging**: `tracing` macros (`warn!` on degradation, `debug!` on plan
//!   progress).

pub use mangarank_core::{
    Candidate, CandidateFilter, CandidateId, ErrorCode, FieldId, SearchConfig, SearchRequest,
    ValidationError,
};

pub mod engine;
pub mod fields;
pub mod fusion;
pub mod memory;
pub mod metrics;
pub mod planner;
pub mod ranker;

pub use engine::{NoIndex, SearchEngine};
pub use fields::{FieldScore, SimilarityOpts, best_field_similarity};
pub use fusion::{FusedScore, FusionWeights, MatchType, fuse, recency_multiplier};
pub use memory::{MemoryIndex, MemoryStore};
pub use metrics::{basic_similarity, combined_similarity, edge_similarity, word_overlap};
pub use planner::{
    CancellationToken, CandidateStore, IndexError, IndexHit, MergedCandidate, SearchError,
    StoreError, TextIndex, plan,
};
pub use ranker::{RankedResult, rank};
