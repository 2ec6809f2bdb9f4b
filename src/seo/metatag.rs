use super::text::{collapse_whitespace, esc_attr, html_escape, strip_all_tags};
use super::{TagMap, TAG_CUSTOM, TAG_DESCRIPTION, TAG_KEYWORDS, TAG_NEWS_KEYWORDS, TAG_SITE_WIDE};

/// Render one logical tag as markup.
///
/// `custom` and `site_wide` already hold rendered markup and come back
/// trimmed but otherwise untouched; the final allow-list pass over the
/// whole block is what constrains them. Everything else becomes a
/// `<meta name=".." content=".." />` element.
pub fn create_metatag(name: &str, value: &str) -> String {
    if name.is_empty() || value.is_empty() {
        return String::new();
    }

    if name == TAG_CUSTOM || name == TAG_SITE_WIDE {
        return value.trim().to_string();
    }

    let mut clean = value.trim().to_string();
    match name {
        TAG_KEYWORDS | TAG_NEWS_KEYWORDS => clean = clean.to_lowercase(),
        TAG_DESCRIPTION => clean = collapse_whitespace(&html_escape(&strip_all_tags(&clean))),
        _ => {}
    }

    format!(
        r#"<meta name="{}" content="{}" />"#,
        esc_attr(name),
        esc_attr(&clean)
    )
}

/// Render every entry of the map, in map order.
pub fn create_metatags(map: &TagMap) -> Vec<String> {
    map.iter()
        .map(|(name, value)| create_metatag(name, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_lowercased() {
        assert_eq!(
            create_metatag("keywords", "Foo, BAR"),
            r#"<meta name="keywords" content="foo, bar" />"#
        );
        assert_eq!(
            create_metatag("news_keywords", " Rust, WASM "),
            r#"<meta name="news_keywords" content="rust, wasm" />"#
        );
    }

    #[test]
    fn description_is_single_spaced() {
        assert_eq!(
            create_metatag("description", "Line1\n\n  Line2"),
            r#"<meta name="description" content="Line1 Line2" />"#
        );
        assert_eq!(
            create_metatag("description", " <b>Tom</b> &\t\"Jerry\"\r\n"),
            r#"<meta name="description" content="Tom &amp; &quot;Jerry&quot;" />"#
        );
    }

    #[test]
    fn raw_markup_passes_through() {
        let raw = r#"<meta name="robots" content="noindex" />"#;
        assert_eq!(create_metatag("custom", raw), raw);
        assert_eq!(create_metatag("site_wide", &format!("  {}\n", raw)), raw);
    }

    #[test]
    fn empty_name_or_value_renders_nothing() {
        assert_eq!(create_metatag("", "x"), "");
        assert_eq!(create_metatag("keywords", ""), "");
    }

    #[test]
    fn unknown_names_are_escaped() {
        assert_eq!(
            create_metatag("author", "A \"B\""),
            r#"<meta name="author" content="A &quot;B&quot;" />"#
        );
    }

    #[test]
    fn map_order_is_kept() {
        let mut map = TagMap::new();
        map.insert("keywords", "K");
        map.insert("description", "D");
        assert_eq!(
            create_metatags(&map),
            vec![
                r#"<meta name="keywords" content="k" />"#.to_string(),
                r#"<meta name="description" content="D" />"#.to_string(),
            ]
        );
    }
}
