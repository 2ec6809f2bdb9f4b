use crate::models::post::ContentItem;
use crate::models::term::Term;
use crate::seo::text::html_escape;

/// Full page shell. `seo_meta` is inserted into the head as is.
pub fn render_document(title: &str, seo_meta: &str, body_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
{seo_meta}</head>
<body>
    <main class="content">
{body_html}
    </main>
</body>
</html>"#,
        title = html_escape(title),
        seo_meta = seo_meta,
        body_html = body_html,
    )
}

pub fn render_item(item: &ContentItem) -> String {
    format!(
        "<article class=\"{kind}\">\n<h1>{title}</h1>\n<div class=\"entry\">{content}</div>\n</article>",
        kind = html_escape(&item.kind),
        title = html_escape(&item.title),
        content = item.content,
    )
}

pub fn render_item_list(heading: &str, intro: &str, items: &[ContentItem]) -> String {
    let mut html = format!("<h1>{}</h1>\n", html_escape(heading));
    if !intro.is_empty() {
        html.push_str(&format!("<p class=\"intro\">{}</p>\n", html_escape(intro)));
    }
    html.push_str("<ul class=\"items\">\n");
    for item in items {
        html.push_str(&format!(
            "<li><a href=\"/{}\">{}</a></li>\n",
            html_escape(&item.slug),
            html_escape(&item.title)
        ));
    }
    html.push_str("</ul>");
    html
}

pub fn render_archive(term: &Term, items: &[ContentItem]) -> String {
    render_item_list(&term.name, &term.description, items)
}
