//! Searchable records and the filters applied to them.
//!
//! A [`Candidate`] is one record under consideration for a query. Candidates
//! are constructed fresh per ranking pass from the external store; nothing in
//! this crate persists them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable record identifier.
///
/// Uniqueness is only required within one ranking pass.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CandidateId(pub i64);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The text attributes a query can be matched against.
///
/// The declaration order is the fixed priority order used to break ties when
/// two fields produce the same similarity: `Title` beats `NativeTitle` beats
/// `RomanizedTitle` beats `Description`. Field dispatch is always through
/// this enum; caller input never reaches a query string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    Title,
    NativeTitle,
    RomanizedTitle,
    Description,
}

impl FieldId {
    /// All fields in priority order.
    pub const ALL: [Self; 4] = [
        Self::Title,
        Self::NativeTitle,
        Self::RomanizedTitle,
        Self::Description,
    ];

    /// Stable wire/display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::NativeTitle => "native_title",
            Self::RomanizedTitle => "romanized_title",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One searchable record.
///
/// Optional fields contribute zero similarity when absent; they are skipped,
/// never treated as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub title: String,
    #[serde(default)]
    pub native_title: Option<String>,
    #[serde(default)]
    pub romanized_title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    /// Community rating, used as the secondary tie-break signal.
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub content_rating: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl Candidate {
    /// Minimal candidate with just an id and a title.
    #[must_use]
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id: CandidateId(id),
            title: title.into(),
            native_title: None,
            romanized_title: None,
            description: None,
            year: None,
            rating: None,
            status: None,
            content_rating: None,
            genres: Vec::new(),
        }
    }

    /// Text value of `field`, if present and non-empty.
    #[must_use]
    pub fn field(&self, field: FieldId) -> Option<&str> {
        let value = match field {
            FieldId::Title => Some(self.title.as_str()),
            FieldId::NativeTitle => self.native_title.as_deref(),
            FieldId::RomanizedTitle => self.romanized_title.as_deref(),
            FieldId::Description => self.description.as_deref(),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

/// Hard filters applied to the visible candidate set.
///
/// These are a pre-filter: they apply on every path (indexed and fallback)
/// before any similarity work happens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateFilter {
    #[serde(default)]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub max_rating: Option<f64>,
    #[serde(default)]
    pub year_from: Option<i32>,
    #[serde(default)]
    pub year_to: Option<i32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub content_rating: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Restrict to an explicit id set (used to hydrate index hits).
    #[serde(default)]
    pub ids: Option<Vec<CandidateId>>,
}

impl CandidateFilter {
    /// Whether `candidate` passes every set constraint.
    ///
    /// Unset constraints always pass. A rating/year constraint against a
    /// candidate missing that attribute fails closed: the record cannot
    /// demonstrate it is in range.
    #[must_use]
    pub fn matches(&self, candidate: &Candidate) -> bool {
        if let Some(min) = self.min_rating {
            match candidate.rating {
                Some(r) if r >= min => {}
                _ => return false,
            }
        }
        if let Some(max) = self.max_rating {
            match candidate.rating {
                Some(r) if r <= max => {}
                _ => return false,
            }
        }
        if let Some(from) = self.year_from {
            match candidate.year {
                Some(y) if y >= from => {}
                _ => return false,
            }
        }
        if let Some(to) = self.year_to {
            match candidate.year {
                Some(y) if y <= to => {}
                _ => return false,
            }
        }
        if let Some(status) = &self.status {
            if candidate.status.as_deref() != Some(status.as_str()) {
                return false;
            }
        }
        if let Some(content_rating) = &self.content_rating {
            if candidate.content_rating.as_deref() != Some(content_rating.as_str()) {
                return false;
            }
        }
        if !self.genres.is_empty() {
            let has_all = self
                .genres
                .iter()
                .all(|g| candidate.genres.iter().any(|cg| cg.eq_ignore_ascii_case(g)));
            if !has_all {
                return false;
            }
        }
        if let Some(ids) = &self.ids {
            if !ids.contains(&candidate.id) {
                return false;
            }
        }
        true
    }
}
