use regex::Regex;
use std::sync::LazyLock;

static RE_SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*?>.*?</script\s*>").unwrap());
static RE_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*?>.*?</style\s*>").unwrap());
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static RE_SHORTCODE_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([A-Za-z][A-Za-z0-9_-]*)(?:\s[^\[\]]*?)?(/)?\]").unwrap()
});
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\r\n\t ]+").unwrap());
static RE_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});").unwrap()
});

/// Remove `<script>`/`<style>` elements with their content, then every
/// remaining tag, then trim.
pub fn strip_all_tags(html: &str) -> String {
    let without_scripts = RE_SCRIPT.replace_all(html, "");
    let without_styles = RE_STYLE.replace_all(&without_scripts, "");
    RE_TAG.replace_all(&without_styles, "").trim().to_string()
}

/// Remove `[name ...]...[/name]` blocks with their content, and lone
/// `[name ...]` / `[name /]` / `[/name]` tags.
///
/// There is no shortcode registry, so any bracketed word counts: plain
/// text such as `[Update] The story` loses `[Update]` too.
pub fn strip_shortcodes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(caps) = RE_SHORTCODE_OPEN.captures(rest) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => break,
        };
        out.push_str(&rest[..whole.start()]);
        let after = &rest[whole.end()..];
        let self_closing = caps.get(2).is_some();
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let closing = format!("[/{}]", name);

        rest = match after.find(&closing) {
            Some(pos) if !self_closing => &after[pos + closing.len()..],
            _ => after,
        };
    }
    out.push_str(rest);

    // Closing tags whose opener was not found
    static RE_STRAY_CLOSE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\[/[A-Za-z][A-Za-z0-9_-]*\]").unwrap());
    RE_STRAY_CLOSE.replace_all(&out, "").into_owned()
}

/// Collapse every run of spaces, tabs and line breaks into one space.
pub fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Plain single-line text: tags stripped, whitespace collapsed, trimmed.
pub fn sanitize_text(text: &str) -> String {
    collapse_whitespace(&strip_all_tags(text))
}

/// Escape text for HTML: `& < > " '`.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Escape an attribute value without double-encoding entities already present.
pub fn esc_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, ch) in s.char_indices() {
        match ch {
            '&' if RE_ENTITY.is_match(&s[i..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

/// First `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
