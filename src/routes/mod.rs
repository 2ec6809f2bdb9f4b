use std::sync::Arc;

use rocket::State;

use crate::cache::ObjectCache;
use crate::hooks::Hooks;
use crate::seo::MetaTags;
use crate::store::Store;

pub mod admin;
pub mod public;

/// Cache shared by every request for the top-category lookup.
pub type CategoryCache = ObjectCache<Vec<String>>;

/// A fresh per-request engine over the managed state.
pub(crate) fn engine<'r>(
    store: &'r State<Arc<dyn Store>>,
    hooks: &'r State<Hooks>,
    cache: &'r State<CategoryCache>,
) -> MetaTags<'r> {
    let s: &dyn Store = &**store.inner();
    MetaTags::new(s, hooks.inner(), cache.inner())
}
