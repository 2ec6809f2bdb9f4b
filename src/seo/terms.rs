use log::debug;

use crate::cache::{ObjectCache, WEEK};
use crate::hooks::Hooks;
use crate::models::post::ContentItem;
use crate::models::term::{TAXONOMY_CATEGORY, TAXONOMY_TAG};
use crate::store::Store;

pub const TOP_CATEGORIES_LIMIT: i64 = 20;
pub const CATEGORY_CACHE_GROUP: &str = "category";
pub const CATEGORY_CACHE_KEY: &str = "amt_get_all_categories";
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Comma-joined names of the item's categories.
pub fn post_categories(store: &dyn Store, hooks: &Hooks, item: &ContentItem) -> String {
    let terms = store.term_for_item(item.id, TAXONOMY_CATEGORY);
    let joined = terms
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    hooks.item_categories.apply_with(joined, &terms)
}

/// Comma-joined names of the item's tags.
pub fn post_tags(store: &dyn Store, hooks: &Hooks, item: &ContentItem) -> String {
    let terms = store.term_for_item(item.id, TAXONOMY_TAG);
    let joined = terms
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    hooks.item_tags.apply_with(joined, &terms)
}

/// The most used categories of the site, comma-joined. The name list is
/// cached for a week; nothing here invalidates it.
pub fn site_categories(
    store: &dyn Store,
    hooks: &Hooks,
    cache: &ObjectCache<Vec<String>>,
    exclude_uncategorized: bool,
) -> String {
    let names = match cache.get(CATEGORY_CACHE_GROUP, CATEGORY_CACHE_KEY) {
        Some(names) => names,
        None => {
            let names: Vec<String> = store
                .term_top_by_count(TAXONOMY_CATEGORY, TOP_CATEGORIES_LIMIT)
                .into_iter()
                .map(|t| t.name)
                .collect();
            debug!("Caching {} top category names", names.len());
            cache.add(CATEGORY_CACHE_GROUP, CATEGORY_CACHE_KEY, names.clone(), WEEK);
            names
        }
    };

    let names: Vec<String> = names
        .into_iter()
        .filter(|n| !(exclude_uncategorized && n == UNCATEGORIZED))
        .collect();
    hooks.site_categories.apply_with(names.join(", "), names.as_slice())
}
