//! Allow-list filter for the emitted meta block.
//!
//! Only `<meta>` elements survive, carrying only the attributes in
//! [`META_ATTRIBUTES`]. Any other tag is dropped while the text around it
//! stays. A `<` that does not open a tag and a lone `>` are escaped, so
//! the result cannot open an element the list does not allow.

use regex::Regex;
use std::sync::LazyLock;

use super::text::esc_attr;

pub const META_ATTRIBUTES: [&str; 4] = ["http-equiv", "name", "property", "content"];

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^<(/?)([A-Za-z][A-Za-z0-9:-]*)((?:\s+[^\s"'>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+))?)*)\s*/?\s*>"#,
    )
    .unwrap()
});
static RE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#).unwrap()
});
static RE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?s)<!--.*?-->").unwrap());

/// Filter `html` down to allowed meta elements and plain text.
pub fn filter_meta_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut i = 0;

    while i < html.len() {
        let rest = &html[i..];
        let ch = match rest.chars().next() {
            Some(c) => c,
            None => break,
        };

        match ch {
            '<' => {
                if let Some(m) = RE_COMMENT.find(rest) {
                    i += m.end();
                } else if let Some(caps) = RE_TAG.captures(rest) {
                    let closing = caps.get(1).map_or(false, |m| !m.as_str().is_empty());
                    let name = caps.get(2).map_or("", |m| m.as_str());
                    if !closing && name.eq_ignore_ascii_case("meta") {
                        out.push_str(&render_meta(caps.get(3).map_or("", |m| m.as_str())));
                    }
                    i += caps.get(0).map_or(1, |m| m.end());
                } else {
                    out.push_str("&lt;");
                    i += 1;
                }
            }
            '>' => {
                out.push_str("&gt;");
                i += 1;
            }
            c => {
                out.push(c);
                i += c.len_utf8();
            }
        }
    }
    out
}

fn render_meta(attrs: &str) -> String {
    let mut kept: Vec<(String, Option<String>)> = Vec::new();

    for caps in RE_ATTR.captures_iter(attrs) {
        let name = match caps.get(1) {
            Some(m) => m.as_str().to_ascii_lowercase(),
            None => continue,
        };
        if !META_ATTRIBUTES.contains(&name.as_str()) || kept.iter().any(|(n, _)| *n == name) {
            continue;
        }
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str().to_string());
        kept.push((name, value));
    }

    let mut tag = String::from("<meta");
    for (name, value) in kept {
        match value {
            Some(v) => tag.push_str(&format!(r#" {}="{}""#, name, esc_attr(&v))),
            None => tag.push_str(&format!(" {}", name)),
        }
    }
    tag.push_str(" />");
    tag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_meta_is_unchanged() {
        let block = "<meta name=\"keywords\" content=\"a, b\" />\n<meta property=\"og:type\" content=\"article\" />\n";
        assert_eq!(filter_meta_markup(block), block);
    }

    #[test]
    fn disallowed_attributes_are_dropped() {
        assert_eq!(
            filter_meta_markup(r#"<META Name='robots' onload="x()" content=noindex>"#),
            r#"<meta name="robots" content="noindex" />"#
        );
        assert_eq!(
            filter_meta_markup(r#"<meta http-equiv="refresh" content="5" data-x="1"/>"#),
            r#"<meta http-equiv="refresh" content="5" />"#
        );
    }

    #[test]
    fn other_tags_are_removed_text_kept() {
        assert_eq!(
            filter_meta_markup("<script>alert(1)</script><b>bold</b><!-- note -->"),
            "alert(1)bold"
        );
        assert_eq!(
            filter_meta_markup(r#"<link rel="stylesheet" href="x.css"><meta name="a" content="b" />"#),
            r#"<meta name="a" content="b" />"#
        );
    }

    #[test]
    fn stray_brackets_are_escaped() {
        assert_eq!(filter_meta_markup("1 < 2 > 0"), "1 &lt; 2 &gt; 0");
        assert_eq!(filter_meta_markup("<<meta name=\"x\">"), "&lt;<meta name=\"x\" />");
    }

    #[test]
    fn values_are_attribute_escaped() {
        assert_eq!(
            filter_meta_markup(r#"<meta name='q' content='say "hi" &amp; go'>"#),
            r#"<meta name="q" content="say &quot;hi&quot; &amp; go" />"#
        );
    }
}
