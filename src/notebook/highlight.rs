//! Match highlighting and snippet extraction
//!
//! Every analyzed query term is wrapped where it occurs in the raw
//! note content, then the marked text is reduced to a handful of
//! windowed snippets around the first match of each matching line.

use regex::Regex;
use tracing::warn;

use crate::text::Term;

const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

/// At most this many matching lines contribute snippets
const SNIPPET_LINES: usize = 3;
/// A snippet window starts this many characters before the match
const WINDOW_BEFORE: usize = 100;
/// Total snippet window size in characters
const WINDOW_CHARS: usize = 300;

/// Build the highlighted content snippets for one hit.
///
/// Each term is matched case-insensitively on word boundaries against
/// the raw content; the per-term results are concatenated, reduced to
/// windowed `<mark>`-bearing lines, and rewritten to the display
/// markup. Returns `None` when nothing matched.
pub(crate) fn content_highlights(content: &str, terms: &[Term]) -> Option<String> {
    let mut marked = String::new();
    for term in terms {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(&term.text));
        let re = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(e) => {
                warn!(error = %e, term = %term.text, "failed to compile highlight pattern");
                continue;
            }
        };
        marked.push_str(&re.replace_all(content, format!("{MARK_OPEN}${{0}}{MARK_CLOSE}")));
    }

    let snippets = snip_marked_lines(&marked);
    if snippets.is_empty() {
        None
    } else {
        Some(snippets)
    }
}

/// Keep the first few lines containing a mark, cut each to a window
/// around its first mark, and rewrite the markers to display markup.
fn snip_marked_lines(marked: &str) -> String {
    let windows: Vec<&str> = marked
        .lines()
        .filter(|line| line.contains(MARK_OPEN))
        .take(SNIPPET_LINES)
        .map(window_around_first_mark)
        .collect();

    windows
        .join("<br>")
        .replace(MARK_OPEN, r#"<b class="match term0">"#)
        .replace(MARK_CLOSE, "</b>")
}

/// A fixed-size character window starting shortly before the line's
/// first mark, clamped to the line bounds.
fn window_around_first_mark(line: &str) -> &str {
    let Some(mark) = line.find(MARK_OPEN) else {
        return line;
    };
    let leading_chars = line[..mark].chars().count();
    let start = byte_offset_at(line, leading_chars.saturating_sub(WINDOW_BEFORE));
    let end = start + byte_offset_at(&line[start..], WINDOW_CHARS);
    &line[start..end]
}

/// Byte offset of the nth character, or the string length when the
/// string is shorter.
fn byte_offset_at(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(text: &str) -> Term {
        Term {
            text: text.to_string(),
            start: 0,
            end: text.len(),
        }
    }

    #[test]
    fn test_marks_word_bounded_case_insensitive() {
        let out = content_highlights("Hello world, worldly", &[term("world")]).unwrap();
        assert_eq!(out, r#"Hello <b class="match term0">world</b>, worldly"#);
    }

    #[test]
    fn test_no_match_is_none() {
        assert!(content_highlights("nothing here", &[term("absent")]).is_none());
        assert!(content_highlights("nothing here", &[]).is_none());
    }

    #[test]
    fn test_keeps_only_matching_lines() {
        let content = "first alpha line\nno match\nsecond alpha line";
        let out = content_highlights(content, &[term("alpha")]).unwrap();
        assert_eq!(out.matches("<br>").count(), 1);
        assert!(!out.contains("no match"));
    }

    #[test]
    fn test_caps_snippet_lines() {
        let content = "alpha 1\nalpha 2\nalpha 3\nalpha 4\nalpha 5";
        let out = content_highlights(content, &[term("alpha")]).unwrap();
        assert_eq!(out.matches("<br>").count(), SNIPPET_LINES - 1);
        assert!(!out.contains("alpha 4"));
    }

    #[test]
    fn test_window_clamps_long_lines() {
        let line = format!("{}needle{}", "x".repeat(200), "y".repeat(400));
        let out = content_highlights(&line, &[term("needle")]).unwrap();
        assert!(out.contains(r#"<b class="match term0">needle</b>"#));
        // window starts 100 chars before the match, not at the line start
        assert!(out.starts_with(&"x".repeat(100)));
        assert!(!out.contains(&"x".repeat(101)));
        // and stops well before the line end
        assert!(!out.contains(&"y".repeat(300)));
    }

    #[test]
    fn test_short_line_window_is_whole_line() {
        let out = content_highlights("tiny needle line", &[term("needle")]).unwrap();
        assert_eq!(out, r#"tiny <b class="match term0">needle</b> line"#);
    }

    #[test]
    fn test_regex_metacharacters_are_escaped() {
        let out = content_highlights("a c++ note", &[term("c++")]);
        // "c++" never comes out of the analyzer, but escaping must hold
        assert!(out.is_none() || out.unwrap().contains("c++"));
    }
}
