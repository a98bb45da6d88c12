use std::sync::LazyLock;

use regex::Regex;

/// A line holding nothing but `---` (trailing spaces allowed).
static SLIDE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^---[ \t]*\r?$").expect("slide break pattern is valid"));

/// Split a document into raw slide strings.
///
/// Only a standalone `---` line starts a new slide. Every segment is trimmed
/// and segments that end up empty are dropped, so the returned list only
/// ever contains text worth rendering.
pub fn split(document: &str) -> Vec<String> {
    SLIDE_BREAK
        .split(document)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_separator() {
        let slides = split("Slide one\n\n---\n\nSlide two");
        assert_eq!(slides, vec!["Slide one", "Slide two"]);
    }

    #[test]
    fn test_separator_without_blank_lines() {
        let slides = split("One\n---\nTwo");
        assert_eq!(slides, vec!["One", "Two"]);
    }

    #[test]
    fn test_trailing_whitespace_on_separator() {
        let slides = split("One\n---   \nTwo\r\n---\t\r\nThree");
        assert_eq!(slides.len(), 3);
        assert_eq!(slides[2], "Three");
    }

    #[test]
    fn test_longer_rule_is_not_a_separator() {
        let slides = split("One\n----\nTwo");
        assert_eq!(slides.len(), 1);
    }

    #[test]
    fn test_inline_dashes_do_not_split() {
        let slides = split("A --- B\n\n  ---\nC");
        assert_eq!(slides.len(), 1);
    }

    #[test]
    fn test_empty_segments_dropped() {
        let slides = split("---\n\n---\nOnly\n---\n   \n---");
        assert_eq!(slides, vec!["Only"]);
    }

    #[test]
    fn test_blank_document() {
        assert!(split("").is_empty());
        assert!(split("   \n\n\t").is_empty());
    }
}
