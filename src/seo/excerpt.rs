use crate::models::post::ContentItem;

use super::text::{strip_all_tags, strip_shortcodes, truncate_chars};

pub const EXCERPT_MAX_LENGTH: usize = 300;
pub const EXCERPT_MIN_LENGTH: usize = 150;
pub const ELLIPSIS: char = '…';

/// Summary of an item for its description tag, with the default lengths.
pub fn derive_excerpt(item: &ContentItem) -> String {
    derive_excerpt_with(item, EXCERPT_MAX_LENGTH, EXCERPT_MIN_LENGTH)
}

/// A manual summary wins. Otherwise the body, with shortcodes and markup
/// removed, is cut to `max_len` characters and then back to its last
/// period when that leaves at least `min_len` characters. Any cut that
/// does not end on a period gets an ellipsis.
pub fn derive_excerpt_with(item: &ContentItem, max_len: usize, min_len: usize) -> String {
    if let Some(manual) = item.excerpt.as_deref().filter(|e| !e.trim().is_empty()) {
        return strip_all_tags(&strip_shortcodes(manual));
    }

    let body = strip_all_tags(&strip_shortcodes(&item.content));
    let slice = truncate_chars(&body, max_len);

    if let Some(pos) = slice.rfind('.') {
        let sentence = &slice[..=pos];
        if sentence.chars().count() >= min_len {
            return sentence.to_string();
        }
    }

    let mut excerpt = slice.to_string();
    excerpt.push(ELLIPSIS);
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn item(content: &str, excerpt: Option<&str>) -> ContentItem {
        ContentItem {
            id: 1,
            kind: "post".to_string(),
            title: "T".to_string(),
            slug: "t".to_string(),
            content: content.to_string(),
            excerpt: excerpt.map(str::to_string),
            status: "published".to_string(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn empty_body_yields_ellipsis() {
        assert_eq!(derive_excerpt(&item("", None)), "…");
        assert_eq!(derive_excerpt(&item("", Some("  "))), "…");
    }

    #[test]
    fn manual_summary_wins() {
        let i = item("Body text.", Some("<p>Hand written [gallery] summary</p>"));
        assert_eq!(derive_excerpt(&i), "Hand written  summary");
    }

    #[test]
    fn cuts_at_last_period_when_long_enough() {
        let first = format!("{}.", "a".repeat(199));
        let body = format!("{} {}", first, "b".repeat(200));
        assert_eq!(derive_excerpt(&item(&body, None)), first);
    }

    #[test]
    fn sentence_of_exactly_min_length_is_kept() {
        let first = format!("{}.", "a".repeat(EXCERPT_MIN_LENGTH - 1));
        let body = format!("{} {}", first, "b".repeat(200));
        assert_eq!(derive_excerpt(&item(&body, None)), first);
    }

    #[test]
    fn sentence_one_short_of_min_length_is_not_kept() {
        let first = format!("{}.", "a".repeat(EXCERPT_MIN_LENGTH - 2));
        let body = format!("{} {}", first, "b".repeat(200));
        let out = derive_excerpt(&item(&body, None));
        assert_eq!(out.chars().count(), EXCERPT_MAX_LENGTH + 1);
        assert!(out.starts_with(&first));
        assert!(out.ends_with(ELLIPSIS));
    }

    #[test]
    fn short_sentence_falls_back_to_slice() {
        let body = format!("Short. {}", "c".repeat(400));
        let out = derive_excerpt(&item(&body, None));
        assert_eq!(out.chars().count(), EXCERPT_MAX_LENGTH + 1);
        assert!(out.ends_with(ELLIPSIS));
        assert!(out.starts_with("Short. ccc"));
    }

    #[test]
    fn exact_length_without_period_is_not_cut() {
        let body = "d".repeat(EXCERPT_MAX_LENGTH);
        assert_eq!(derive_excerpt(&item(&body, None)), format!("{}…", body));
    }

    #[test]
    fn markup_and_shortcodes_are_removed_first() {
        let i = item("<p>Hi [caption]hidden[/caption]<script>x()</script> there</p>", None);
        assert_eq!(derive_excerpt_with(&i, 300, 150), "Hi  there…");
    }

    #[test]
    fn counts_characters_not_bytes() {
        let body = "é".repeat(10);
        assert_eq!(derive_excerpt_with(&item(&body, None), 4, 2), "éééé…");
        let body = "éé. ééééé";
        assert_eq!(derive_excerpt_with(&item(body, None), 6, 3), "éé.");
    }
}
