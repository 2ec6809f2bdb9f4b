use std::cell::OnceCell;

use log::debug;

use crate::cache::ObjectCache;
use crate::hooks::Hooks;
use crate::models::option::{OPTION_BLOG_DESCRIPTION, OPTION_BLOG_NAME};
use crate::models::post::{ContentItem, ContentKind, KIND_PAGE, KIND_POST};
use crate::models::settings::{EnabledFields, SeoField, Settings};
use crate::models::term::Term;
use crate::store::Store;

use super::kses::filter_meta_markup;
use super::metatag::create_metatags;
use super::{excerpt, terms};
use super::{TagMap, TAG_CUSTOM, TAG_DESCRIPTION, TAG_KEYWORDS, TAG_NEWS_KEYWORDS, TAG_SITE_WIDE};

/// What the current request renders.
#[derive(Debug, Clone, Copy)]
pub enum PageContext<'a> {
    /// A post or an item of a custom kind.
    Single(&'a ContentItem),
    /// A static page.
    Page(&'a ContentItem),
    Home,
    TaxonomyArchive(&'a Term),
    Other,
}

impl<'a> PageContext<'a> {
    pub fn for_item(item: &'a ContentItem) -> Self {
        if item.is_page() {
            PageContext::Page(item)
        } else {
            PageContext::Single(item)
        }
    }
}

/// Per-request meta tag engine. Settings are read from the store once
/// and reused for every later call on the same instance.
pub struct MetaTags<'a> {
    store: &'a dyn Store,
    hooks: &'a Hooks,
    cache: &'a ObjectCache<Vec<String>>,
    settings: OnceCell<Settings>,
}

impl<'a> MetaTags<'a> {
    pub fn new(store: &'a dyn Store, hooks: &'a Hooks, cache: &'a ObjectCache<Vec<String>>) -> Self {
        MetaTags {
            store,
            hooks,
            cache,
            settings: OnceCell::new(),
        }
    }

    pub fn store(&self) -> &'a dyn Store {
        self.store
    }

    pub fn hooks(&self) -> &'a Hooks {
        self.hooks
    }

    pub fn settings(&self) -> &Settings {
        self.settings.get_or_init(|| self.store.settings_load())
    }

    // ── Content kinds ───────────────────────────────────────

    /// `post`, `page` and every custom kind enabled in the settings.
    pub fn supported_kinds(&self) -> Vec<String> {
        let mut kinds = vec![KIND_POST.to_string(), KIND_PAGE.to_string()];
        for kind in self.settings().enabled_custom_kinds() {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        self.hooks.supported_kinds.apply(kinds)
    }

    pub fn is_supported_kind(&self, kind: &str) -> bool {
        self.supported_kinds().iter().any(|k| k == kind)
    }

    /// Custom kinds that may be switched on in the options panel.
    pub fn registered_kinds(&self) -> Vec<ContentKind> {
        self.hooks.registered_kinds.apply(self.store.content_kind_list())
    }

    /// Field switches for `kind`. Pages use the page section, every other
    /// supported kind the post section; unsupported kinds get nothing.
    pub fn enabled_fields(&self, kind: &str) -> EnabledFields {
        if !self.is_supported_kind(kind) {
            return EnabledFields::default();
        }
        let settings = self.settings();
        if kind == KIND_PAGE {
            EnabledFields::from_flags(&settings.page_options)
        } else {
            EnabledFields::from_flags(&settings.post_options)
        }
    }

    // ── Per-item values ─────────────────────────────────────

    /// Stored value of a per-item field, falling back to its legacy
    /// third-party key when empty.
    pub fn item_field(&self, item_id: i64, field: SeoField) -> String {
        let value = self.store.meta_get_string(item_id, field.key());
        if !value.is_empty() {
            return value;
        }
        match field.legacy_key() {
            Some(legacy) => self.store.meta_get_string(item_id, legacy),
            None => value,
        }
    }

    pub fn excerpt(&self, item: &ContentItem) -> String {
        self.hooks
            .excerpt
            .apply_with(excerpt::derive_excerpt(item), item)
    }

    pub fn post_categories(&self, item: &ContentItem) -> String {
        terms::post_categories(self.store, self.hooks, item)
    }

    pub fn post_tags(&self, item: &ContentItem) -> String {
        terms::post_tags(self.store, self.hooks, item)
    }

    pub fn site_categories(&self, exclude_uncategorized: bool) -> String {
        terms::site_categories(self.store, self.hooks, self.cache, exclude_uncategorized)
    }

    // ── Tag map ─────────────────────────────────────────────

    /// Logical tags for the page, after the `metatags_map` filter.
    pub fn build_tag_map(&self, page: &PageContext<'_>) -> TagMap {
        let mut map = TagMap::new();
        let site_wide = self.settings().site_wide_meta.trim().to_string();

        match page {
            PageContext::Single(item) => {
                if !self.singular_tags(&mut map, item, true, &site_wide) {
                    return map;
                }
            }
            PageContext::Page(item) => {
                if !self.singular_tags(&mut map, item, false, &site_wide) {
                    return map;
                }
            }
            PageContext::Home => self.home_tags(&mut map),
            PageContext::TaxonomyArchive(term) => {
                if !term.description.trim().is_empty() {
                    map.insert(TAG_DESCRIPTION, term.description.as_str());
                }
                if !term.name.is_empty() {
                    map.insert(TAG_KEYWORDS, term.name.as_str());
                }
            }
            PageContext::Other => {}
        }

        if !site_wide.is_empty() {
            map.insert(TAG_SITE_WIDE, site_wide);
        }

        self.hooks.metatags_map.apply(map)
    }

    /// Fills tags for a post or page. Returns false when the page gets no
    /// tags at all.
    fn singular_tags(&self, map: &mut TagMap, item: &ContentItem, single: bool, site_wide: &str) -> bool {
        let enabled = self.enabled_fields(&item.kind);
        if !enabled.any() && site_wide.is_empty() {
            debug!("No meta fields enabled for kind '{}'", item.kind);
            return false;
        }

        if enabled.description {
            let mut description = self.item_field(item.id, SeoField::Description);
            if description.is_empty() && single {
                description = self.excerpt(item);
            }
            let description = self.hooks.meta_description.apply(description);
            if !description.is_empty() {
                map.insert(TAG_DESCRIPTION, description);
            }
        }

        if enabled.meta {
            let custom = self.item_field(item.id, SeoField::Meta);
            if !custom.is_empty() {
                map.insert(TAG_CUSTOM, custom);
            }
        }

        if enabled.google_news_meta {
            let news = self.item_field(item.id, SeoField::GoogleNewsMeta);
            if !news.is_empty() {
                map.insert(TAG_NEWS_KEYWORDS, news);
            }
        }

        if enabled.keywords {
            let mut keywords = self.item_field(item.id, SeoField::Keywords);
            if !keywords.is_empty() {
                if single {
                    if keywords.contains("%cats%") {
                        keywords = keywords.replace("%cats%", &self.post_categories(item));
                    }
                    if keywords.contains("%tags%") {
                        keywords = keywords.replace("%tags%", &self.post_tags(item));
                    }
                }
                map.insert(TAG_KEYWORDS, keywords);
            } else if single {
                let derived = [self.post_categories(item), self.post_tags(item)]
                    .iter()
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_lowercase())
                    .collect::<Vec<_>>()
                    .join(", ");
                if !derived.is_empty() {
                    map.insert(TAG_KEYWORDS, derived);
                }
            }
        }

        true
    }

    fn home_tags(&self, map: &mut TagMap) {
        let settings = self.settings();

        let description = if settings.site_description.trim().is_empty() {
            self.store.option_get_or(OPTION_BLOG_DESCRIPTION, "")
        } else {
            settings.site_description.clone()
        };
        if !description.is_empty() {
            map.insert(TAG_DESCRIPTION, description);
        }

        let keywords = if settings.site_keywords.trim().is_empty() {
            self.site_categories(true)
        } else {
            settings.site_keywords.clone()
        };
        if !keywords.is_empty() {
            map.insert(TAG_KEYWORDS, keywords);
        }
    }

    // ── Output ──────────────────────────────────────────────

    /// The meta block for the document head, newline-terminated, or an
    /// empty string when there is nothing to emit.
    pub fn render_head(&self, page: &PageContext<'_>) -> String {
        let map = self.build_tag_map(page);
        if map.is_empty() {
            return String::new();
        }

        let joined = create_metatags(&map)
            .into_iter()
            .filter(|tag| !tag.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        let markup = self.hooks.metatags_markup.apply(joined);
        if markup.trim().is_empty() {
            return String::new();
        }
        filter_meta_markup(&format!("{}\n", markup))
    }

    pub fn site_name(&self) -> String {
        self.store.option_get_or(OPTION_BLOG_NAME, "")
    }
}
