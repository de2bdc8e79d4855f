//! Engine configuration, loadable from `mangarank.toml`.
//!
//! All knobs carry serde defaults so a missing file or an empty `[fusion]`
//! table behaves exactly like `SearchConfig::default()`.

#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ErrorCode;

/// Configuration load/parse errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } | Self::Parse { .. } => ErrorCode::ConfigParseError,
        }
    }
}

/// Score-fusion constants.
///
/// The multiplier exists so a strong textual similarity (bounded by 1.0) can
/// compete with index relevance scores, which are unbounded but commonly
/// single-digit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionWeights {
    /// Similarity-to-score multiplier applied before the max with the index score.
    #[serde(default = "default_similarity_multiplier")]
    pub similarity_multiplier: f64,

    /// Flat bonus added when one string contains the other.
    #[serde(default = "default_exact_bonus")]
    pub exact_bonus: f64,

    /// Coefficient of the length-difference penalty.
    #[serde(default = "default_length_penalty")]
    pub length_penalty: f64,

    /// Multiplier for records published within the recent window.
    #[serde(default = "default_recent_boost")]
    pub recent_boost: f64,

    /// Multiplier for records published within the moderately recent window.
    #[serde(default = "default_moderate_boost")]
    pub moderate_boost: f64,

    /// Gate for the recency multipliers.
    #[serde(default)]
    pub boost_recent: bool,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            similarity_multiplier: default_similarity_multiplier(),
            exact_bonus: default_exact_bonus(),
            length_penalty: default_length_penalty(),
            recent_boost: default_recent_boost(),
            moderate_boost: default_moderate_boost(),
            boost_recent: false,
        }
    }
}

/// Top-level engine configuration, `[search]`-style table plus `[fusion]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Floor for the fallback-scan similarity threshold; requests may tighten
    /// it but never relax it.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Largest fuzzy distance the index contract supports.
    #[serde(default = "default_max_fuzzy_distance")]
    pub max_fuzzy_distance: u8,

    /// Upper bound on candidates pulled for one fallback scan, protecting the
    /// fusion stage from unbounded work.
    #[serde(default = "default_scan_limit")]
    pub scan_limit: usize,

    /// Cap on the caller-supplied `limit`.
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    /// Candidates scored per batch between cancellation checks.
    #[serde(default = "default_scan_batch_size")]
    pub scan_batch_size: usize,

    #[serde(default)]
    pub fusion: FusionWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            max_fuzzy_distance: default_max_fuzzy_distance(),
            scan_limit: default_scan_limit(),
            max_limit: default_max_limit(),
            scan_batch_size: default_scan_batch_size(),
            fusion: FusionWeights::default(),
        }
    }
}

impl SearchConfig {
    /// Load from `dir/mangarank.toml`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file exists but cannot be read or
    /// parsed.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join("mangarank.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }
}

const fn default_similarity_multiplier() -> f64 {
    8.0
}

const fn default_exact_bonus() -> f64 {
    0.3
}

const fn default_length_penalty() -> f64 {
    0.3
}

const fn default_recent_boost() -> f64 {
    1.5
}

const fn default_moderate_boost() -> f64 {
    1.2
}

const fn default_similarity_threshold() -> f64 {
    0.3
}

const fn default_max_fuzzy_distance() -> u8 {
    4
}

const fn default_scan_limit() -> usize {
    10_000
}

const fn default_max_limit() -> usize {
    100
}

const fn default_scan_batch_size() -> usize {
    256
}
