use serde::Serialize;
use std::fmt;

/// Maximum accepted username length, per the export format.
pub const MAX_USERNAME_LEN: usize = 30;

/// A validated username: 1-30 chars of `[A-Za-z0-9._]`, not numeric-looking.
/// Can only be constructed through [`Username::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Username(String);

impl Username {
    /// Trims whitespace and validates the candidate; returns `None` for
    /// anything that is not a plausible username (too long, bad characters,
    /// timestamp-shaped digits). Numeric-looking means digits and dots
    /// only, so decimal-shaped names like "1.2" are rejected along with
    /// plain digit runs; letter-bearing names always pass this check.
    pub fn parse(candidate: &str) -> Option<Self> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() || trimmed.len() > MAX_USERNAME_LEN {
            return None;
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
        {
            return None;
        }
        if looks_numeric(trimmed) {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True for strings made of digits and dots only, e.g. "12345" or a unix
/// timestamp with a fractional part. Letter-bearing names stay valid.
pub fn looks_numeric(s: &str) -> bool {
    !s.is_empty()
        && s.chars().any(|c| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Result of running the extractor over one parsed JSON document: the
/// usernames in extraction order (duplicates kept) plus a count of
/// candidates that were silently dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub usernames: Vec<Username>,
    pub dropped: usize,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.usernames.is_empty()
    }
}

/// A persisted copy of the follower list plus when it was captured.
/// At most one snapshot exists at a time; saving overwrites it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub usernames: Vec<Username>,
    /// RFC3339 UTC, stored as text
    pub captured_at: String,
}

/// Unfollower computation against the saved snapshot, if one exists.
#[derive(Debug, Clone, PartialEq)]
pub struct UnfollowerReport {
    /// Sorted case-insensitively; empty when no snapshot exists
    pub unfollowers: Vec<Username>,
    pub has_previous: bool,
    pub snapshot_date: Option<String>,
}

impl UnfollowerReport {
    /// The report returned when no snapshot has ever been saved.
    pub fn no_history() -> Self {
        Self {
            unfollowers: Vec::new(),
            has_previous: false,
            snapshot_date: None,
        }
    }
}

/// Everything the renderer needs: counts plus both sorted difference lists.
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub follower_count: usize,
    pub following_count: usize,
    /// Sorted case-insensitively, original casing preserved
    pub not_following_back: Vec<Username>,
    pub unfollowers: UnfollowerReport,
    /// Set when the snapshot store failed and the comparison ran without
    /// history; the caller shows this to the user as an alert.
    pub storage_warning: Option<String>,
}
