//! Note document model
//!
//! A note is a markdown file; its title is the filename without the
//! `.md` extension and doubles as the document id. This module owns
//! the indexable view of a note: the closed field schema with its
//! weights, tag extraction, and the stripping of inline base64 images
//! from the indexed content.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Weight multiplier for the title field
pub const TITLE_WEIGHT: f64 = 2.0;
/// Weight multiplier for the content field (baseline)
pub const CONTENT_WEIGHT: f64 = 1.0;
/// Weight multiplier for the tags field
pub const TAGS_WEIGHT: f64 = 4.0;

/// Characters a title may never contain (plus newline, CR, tab)
const INVALID_TITLE_CHARS: &str = "<>:\"/\\|?*\n\r\t";

static RE_TAGS: OnceLock<Regex> = OnceLock::new();
static RE_CODE_FENCES: OnceLock<Regex> = OnceLock::new();
static RE_IMAGE_DATA: OnceLock<Regex> = OnceLock::new();

/// A tag is a `#word` preceded by start-of-text or whitespace and
/// followed by whitespace or end-of-text.
fn tag_pattern() -> &'static Regex {
    RE_TAGS.get_or_init(|| Regex::new(r"(?:^#|\s#)(\w+)(?:\s|$)").expect("tag pattern"))
}

/// Backtick runs delimit code spans; spans may cross lines.
fn code_fence_pattern() -> &'static Regex {
    RE_CODE_FENCES.get_or_init(|| Regex::new(r"(?s)`{1,3}.*?`{1,3}").expect("code fence pattern"))
}

/// Inline markdown images with base64 data URIs
fn image_data_pattern() -> &'static Regex {
    RE_IMAGE_DATA.get_or_init(|| {
        Regex::new(r"!\[[^\[\]]*\]\(data:image/\w+;base64,[a-zA-Z0-9+/=]+\)")
            .expect("image data pattern")
    })
}

/// Return false if the title contains any of `<>:"/\|?*`, a newline,
/// a carriage return, or a tab.
pub fn is_valid_title(title: &str) -> bool {
    !title.chars().any(|c| INVALID_TITLE_CHARS.contains(c))
}

/// Extract the set of lowercase tags from note content.
///
/// Code-fence spans are stripped before matching so `#words` inside
/// code blocks are not picked up.
pub fn extract_tags(content: &str) -> BTreeSet<String> {
    let without_code = code_fence_pattern().replace_all(content, "");
    tag_pattern()
        .captures_iter(&without_code)
        .map(|cap| cap[1].to_lowercase())
        .collect()
}

/// Remove inline base64 image data URIs from content.
///
/// Used only for the indexed view; the on-disk file keeps its images.
pub fn strip_image_data(content: &str) -> String {
    image_data_pattern().replace_all(content, "").into_owned()
}

/// One of the named views of a document exposed to the index.
///
/// The field set is a closed schema, fixed for the lifetime of an
/// index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Content,
    Tags,
}

impl Field {
    /// All fields, in schema order
    pub const ALL: [Field; 3] = [Field::Title, Field::Content, Field::Tags];

    /// Scoring multiplier applied to term matches in this field
    pub fn weight(self) -> f64 {
        match self {
            Field::Title => TITLE_WEIGHT,
            Field::Content => CONTENT_WEIGHT,
            Field::Tags => TAGS_WEIGHT,
        }
    }
}

/// The indexable content of a single document field
#[derive(Debug, Clone)]
pub struct FieldContent {
    /// Text run through the analyzer
    pub content: String,
    /// Terms indexed verbatim, bypassing the analyzer
    pub extra_terms: Vec<String>,
    /// Scoring multiplier for matches in this field
    pub weight: f64,
}

/// Immutable snapshot of a note at a given mtime.
///
/// The title doubles as the document id; the on-disk file stays the
/// source of truth and a snapshot is replaced whenever the file's
/// mtime advances past `modtime`.
#[derive(Debug, Clone)]
pub struct NoteDocument {
    title: String,
    content: String,
    tags: BTreeSet<String>,
    modtime: DateTime<Utc>,
}

impl NoteDocument {
    /// Build a snapshot from raw file content; tags are extracted
    /// eagerly.
    pub fn new(title: String, content: String, modtime: DateTime<Utc>) -> Self {
        let tags = extract_tags(&content);
        NoteDocument {
            title,
            content,
            tags,
            modtime,
        }
    }

    /// Document id (the title)
    pub fn id(&self) -> &str {
        &self.title
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Raw content as read from disk
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn modtime(&self) -> DateTime<Utc> {
        self.modtime
    }

    /// The weighted, indexable view of one field
    pub fn field(&self, field: Field) -> FieldContent {
        let (content, extra_terms) = match field {
            Field::Title => (self.title.clone(), Vec::new()),
            Field::Content => (strip_image_data(&self.content), Vec::new()),
            Field::Tags => (
                self.tags.iter().cloned().collect::<Vec<_>>().join(" "),
                self.tags.iter().cloned().collect(),
            ),
        };
        FieldContent {
            content,
            extra_terms,
            weight: field.weight(),
        }
    }
}
