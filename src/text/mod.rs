//! Text analysis pipeline for indexing and search
//!
//! Turns raw note text into lowercased, stemmed terms while keeping
//! the byte offsets of the original slices. The same pipeline runs on
//! document fields at index time and on query phrases at search time,
//! so both sides agree on term forms.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Stop words removed during analysis.
///
/// Deliberately empty: single-letter words like "a" and "i" are valid
/// tags and must stay searchable.
static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();

/// Snowball stemmer for English text
static STEMMER: OnceLock<Stemmer> = OnceLock::new();

fn stop_words() -> &'static HashSet<&'static str> {
    STOP_WORDS.get_or_init(HashSet::new)
}

fn stemmer() -> &'static Stemmer {
    STEMMER.get_or_init(|| Stemmer::create(Algorithm::English))
}

/// A single analyzed token: the (possibly rewritten) term plus the
/// byte offsets `[start, end)` of the slice it was extracted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// Term text after the pipeline stages applied so far
    pub text: String,
    /// Byte offset of the token start in the source text
    pub start: usize,
    /// Byte offset just past the token end
    pub end: usize,
}

/// Split text into maximal runs of alphanumeric characters
/// (Unicode letter and number categories).
///
/// The iterator is lazy; callers may stop consuming at any point. A
/// token running up to the end of input is emitted.
pub fn tokenize(text: &str) -> impl Iterator<Item = Term> + '_ {
    let mut chars = text.char_indices().peekable();
    std::iter::from_fn(move || {
        while let Some(&(_, c)) = chars.peek() {
            if c.is_alphanumeric() {
                break;
            }
            chars.next();
        }

        let &(start, _) = chars.peek()?;
        let mut end = text.len();
        while let Some(&(i, c)) = chars.peek() {
            if !c.is_alphanumeric() {
                end = i;
                break;
            }
            chars.next();
        }

        Some(Term {
            text: text[start..end].to_string(),
            start,
            end,
        })
    })
}

/// Full analysis pipeline: tokenize, lowercase, drop stop words, stem.
///
/// Offsets always reference the original input, so highlighters can
/// map an analyzed term back to the raw text it came from.
pub fn analyze(text: &str) -> impl Iterator<Item = Term> + '_ {
    tokenize(text)
        .map(|term| Term {
            text: term.text.to_lowercase(),
            ..term
        })
        .filter(|term| !stop_words().contains(term.text.as_str()))
        .map(|term| Term {
            text: stemmer().stem(&term.text).into_owned(),
            ..term
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(text: &str) -> Vec<String> {
        analyze(text).map(|t| t.text).collect()
    }

    #[test]
    fn test_tokenize_offsets() {
        let text = "Hello, world!";
        let tokens: Vec<Term> = tokenize(text).collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "Hello");
        assert_eq!(&text[tokens[0].start..tokens[0].end], "Hello");
        assert_eq!(tokens[1].text, "world");
        assert_eq!(&text[tokens[1].start..tokens[1].end], "world");
        assert_eq!((tokens[1].start, tokens[1].end), (7, 12));
    }

    #[test]
    fn test_tokenize_emits_trailing_token() {
        let tokens: Vec<Term> = tokenize("alpha beta").collect();
        assert_eq!(tokens.last().unwrap().text, "beta");
        assert_eq!(tokens.last().unwrap().end, 10);
    }

    #[test]
    fn test_tokenize_empty_input() {
        assert_eq!(tokenize("").count(), 0);
    }

    #[test]
    fn test_tokenize_punctuation_only() {
        assert_eq!(tokenize("... !?! ---").count(), 0);
    }

    #[test]
    fn test_tokenize_keeps_numbers() {
        let tokens: Vec<String> = tokenize("rfc 2822 draft").map(|t| t.text).collect();
        assert_eq!(tokens, vec!["rfc", "2822", "draft"]);
    }

    #[test]
    fn test_tokenize_unicode_offsets() {
        let text = "naïve déjà";
        for token in tokenize(text) {
            assert_eq!(&text[token.start..token.end], token.text);
        }
    }

    #[test]
    fn test_analyze_lowercases() {
        assert_eq!(terms("Hello WORLD"), vec!["hello", "world"]);
    }

    #[test]
    fn test_analyze_stems_english() {
        assert_eq!(terms("running jumps"), vec!["run", "jump"]);
        assert_eq!(terms("notes indexing"), vec!["note", "index"]);
    }

    #[test]
    fn test_analyze_keeps_short_tag_words() {
        // No stop word removal: "a" and "i" are legitimate tags
        assert_eq!(terms("a i the"), vec!["a", "i", "the"]);
    }

    #[test]
    fn test_analyze_preserves_offsets_through_stemming() {
        let text = "Running fast";
        let tokens: Vec<Term> = analyze(text).collect();
        assert_eq!(tokens[0].text, "run");
        assert_eq!(&text[tokens[0].start..tokens[0].end], "Running");
    }

    #[test]
    fn test_analyze_is_stable_over_its_output() {
        let text = "The runner was running and jumped over indexes";
        let first = terms(text);
        let second = terms(&first.join(" "));
        assert_eq!(first, second);
    }

    #[test]
    fn test_analyze_is_lazy() {
        let mut iter = analyze("one two three four");
        assert_eq!(iter.next().unwrap().text, "one");
        // Short-circuit without draining the rest
        drop(iter);
    }
}
