//! Excerpt generation for items without a manual excerpt.

use std::collections::HashSet;

/// Maximum number of words kept in a generated excerpt.
pub const EXCERPT_WORDS: usize = 55;

/// Appended when a generated excerpt was cut short.
pub const EXCERPT_MORE: &str = " [&hellip;]";

/// Return the manual excerpt, or generate one from the body.
pub fn excerpt_for(manual: &str, body: &str) -> String {
    let manual = manual.trim();
    if manual.is_empty() {
        generate_excerpt(body)
    } else {
        manual.to_string()
    }
}

/// Strip block delimiters and markup, then keep the first [`EXCERPT_WORDS`] words.
pub fn generate_excerpt(body: &str) -> String {
    // No tags are allowed: comments (block delimiters included) and markup
    // are dropped, text is kept except inside script and style.
    let mut cleaner = ammonia::Builder::empty();
    cleaner.clean_content_tags(HashSet::from(["script", "style"]));
    let text = cleaner.clean(body).to_string();

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > EXCERPT_WORDS {
        format!("{}{EXCERPT_MORE}", words[..EXCERPT_WORDS].join(" "))
    } else {
        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_excerpt_wins() {
        assert_eq!(excerpt_for("  Hand written.  ", "<p>Body</p>"), "Hand written.");
    }

    #[test]
    fn strips_blocks_and_markup() {
        let body = "<!-- wp:paragraph --><p>Hello <strong>there</strong>\n friend</p><!-- /wp:paragraph -->";
        assert_eq!(excerpt_for("", body), "Hello there friend");
    }

    #[test]
    fn script_and_style_content_is_dropped() {
        let body = "<p>Hi</p><script>alert(1)</script><style>p { color: red }</style>";
        assert_eq!(generate_excerpt(body), "Hi");
    }

    #[test]
    fn truncates_long_bodies() {
        let words: Vec<String> = (1..=60).map(|i| format!("w{i}")).collect();
        let body = format!("<p>{}</p>", words.join(" "));

        let excerpt = generate_excerpt(&body);
        assert!(excerpt.starts_with("w1 w2 "));
        assert!(excerpt.ends_with("w55 [&hellip;]"));
        assert!(!excerpt.contains("w56"));
    }

    #[test]
    fn short_bodies_are_not_marked() {
        let excerpt = generate_excerpt("<p>Only a few words</p>");
        assert_eq!(excerpt, "Only a few words");
    }
}
