use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A note as handed to callers: the title, the file's mtime, and the
/// full content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Note title (the filename without extension)
    pub title: String,
    /// Filesystem mtime of the backing file
    pub last_modified: DateTime<Utc>,
    /// Full markdown content
    pub content: String,
}

/// Partial update applied to an existing note.
///
/// An absent `new_title` keeps the current title; an absent
/// `new_content` keeps the current content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_content: Option<String>,
}

/// Requested sort key.
///
/// Accepted for API compatibility; result ordering is currently fixed
/// to score descending with mtime as tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Score,
    Title,
    LastModified,
}

/// Requested sort direction; see [`SortBy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

/// One search hit materialized for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Matching note title
    pub title: String,
    /// Mtime of the note at the time it was indexed
    pub last_modified: DateTime<Utc>,
    /// Relevance score (0 for wildcard listings)
    pub score: f64,
    /// Highlighted title snippet; absent in the current design
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_highlights: Option<String>,
    /// Highlighted content snippets joined with `<br>`, absent when
    /// no line of the content matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_highlights: Option<String>,
    /// Tags from the query that the note carries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_matches: Vec<String>,
}
