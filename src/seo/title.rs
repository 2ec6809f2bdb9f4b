use serde::Serialize;

use crate::models::post::ContentItem;
use crate::models::settings::SeoField;

use super::front_end::{MetaTags, PageContext};
use super::text::strip_all_tags;

pub const TITLE_PLACEHOLDER: &str = "%title%";
pub const TITLE_SEPARATOR: &str = " – ";

/// Pieces of the document title, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TitleParts {
    pub title: String,
    pub page: Option<String>,
    pub tagline: Option<String>,
    pub site: Option<String>,
}

impl TitleParts {
    pub fn new(title: &str) -> Self {
        TitleParts {
            title: title.to_string(),
            ..Default::default()
        }
    }

    /// Non-empty parts joined with an en dash.
    pub fn join(&self) -> String {
        std::iter::once(Some(self.title.as_str()))
            .chain([
                self.page.as_deref(),
                self.tagline.as_deref(),
                self.site.as_deref(),
            ])
            .flatten()
            .filter(|p| !p.trim().is_empty())
            .collect::<Vec<_>>()
            .join(TITLE_SEPARATOR)
    }
}

/// Replace every `%title%` in `template` with `title`.
pub fn substitute_title(template: &str, title: &str) -> String {
    template.replace(TITLE_PLACEHOLDER, title)
}

impl MetaTags<'_> {
    /// Apply the item's title override, if the current page is a single
    /// post or page of a supported kind with the title field enabled.
    pub fn rewrite_title(&self, mut parts: TitleParts, page: &PageContext<'_>) -> TitleParts {
        let item: &ContentItem = match page {
            PageContext::Single(item) | PageContext::Page(item) => item,
            _ => return parts,
        };
        if !self.is_supported_kind(&item.kind) {
            return parts;
        }
        if !self.enabled_fields(&item.kind).is_enabled(SeoField::Title) {
            return parts;
        }

        // Legacy titles use another placeholder syntax and are never read here
        let template = self.store().meta_get_string(item.id, SeoField::Title.key());
        if template.is_empty() {
            return parts;
        }

        parts.title = strip_all_tags(&substitute_title(&template, &parts.title));
        parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_replaced_everywhere() {
        assert_eq!(substitute_title("My %title% Page", "Hello"), "My Hello Page");
        assert_eq!(substitute_title("%title% | %title%", "A"), "A | A");
        assert_eq!(substitute_title("%%TITLE%%", "A"), "%%TITLE%%");
    }

    #[test]
    fn join_skips_empty_parts() {
        let parts = TitleParts {
            title: "Post".to_string(),
            page: None,
            tagline: Some(String::new()),
            site: Some("My Site".to_string()),
        };
        assert_eq!(parts.join(), "Post – My Site");
        assert_eq!(TitleParts::new("Only").join(), "Only");
    }
}
