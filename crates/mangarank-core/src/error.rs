#![allow(clippy::module_name_repetitions)]

use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EmptyQuery,
    FuzzinessOutOfRange,
    InvalidLimit,
    InvalidFieldSet,
    ConfigParseError,
    IndexUnavailable,
    IndexTimeout,
    StoreUnavailable,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EmptyQuery => "E1001",
            Self::FuzzinessOutOfRange => "E1002",
            Self::InvalidLimit => "E1003",
            Self::InvalidFieldSet => "E1004",
            Self::ConfigParseError => "E2001",
            Self::IndexUnavailable => "E3001",
            Self::IndexTimeout => "E3002",
            Self::StoreUnavailable => "E4001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::EmptyQuery => "Query is empty after trimming",
            Self::FuzzinessOutOfRange => "Fuzzy distance outside supported range",
            Self::InvalidLimit => "Result limit must be positive and within the cap",
            Self::InvalidFieldSet => "No searchable fields requested",
            Self::ConfigParseError => "Config file parse error",
            Self::IndexUnavailable => "Text index unavailable",
            Self::IndexTimeout => "Text index lookup timed out",
            Self::StoreUnavailable => "Candidate store unavailable",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::EmptyQuery => Some("Provide at least one non-whitespace character."),
            Self::FuzzinessOutOfRange => Some("Use a fuzzy distance between 0 and the configured maximum."),
            Self::InvalidLimit => Some("Use a limit between 1 and the configured cap."),
            Self::InvalidFieldSet => Some("Request at least one of: title, native_title, romanized_title, description."),
            Self::ConfigParseError => Some("Fix syntax in mangarank.toml and retry."),
            Self::IndexUnavailable | Self::IndexTimeout => {
                Some("Searches degrade to similarity-only scanning; check the index backend.")
            }
            Self::StoreUnavailable => Some("Check the candidate store backend; no fallback exists below it."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::EmptyQuery,
            ErrorCode::FuzzinessOutOfRange,
            ErrorCode::InvalidLimit,
            ErrorCode::InvalidFieldSet,
            ErrorCode::ConfigParseError,
            ErrorCode::IndexUnavailable,
            ErrorCode::IndexTimeout,
            ErrorCode::StoreUnavailable,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::FuzzinessOutOfRange.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }
}
