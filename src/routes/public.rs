use std::sync::Arc;

use rocket::response::content::RawHtml;
use rocket::State;

use crate::hooks::Hooks;
use crate::models::option::OPTION_BLOG_DESCRIPTION;
use crate::models::post::KIND_POST;
use crate::models::term::{TAXONOMY_CATEGORY, TAXONOMY_TAG};
use crate::render;
use crate::seo::{PageContext, TitleParts};
use crate::store::Store;

use super::{engine, CategoryCache};

const LIST_LIMIT: i64 = 20;

// ── Homepage ───────────────────────────────────────────

#[get("/")]
pub fn homepage(
    store: &State<Arc<dyn Store>>,
    hooks: &State<Hooks>,
    cache: &State<CategoryCache>,
) -> RawHtml<String> {
    let meta = engine(store, hooks, cache);
    let page = PageContext::Home;

    let site_name = meta.site_name();
    let tagline = store.option_get_or(OPTION_BLOG_DESCRIPTION, "");
    let title = TitleParts {
        title: site_name.clone(),
        tagline: Some(tagline.clone()),
        ..Default::default()
    };

    let posts: Vec<_> = store
        .item_list(Some(KIND_POST), LIST_LIMIT, 0)
        .into_iter()
        .filter(|i| i.is_published())
        .collect();

    RawHtml(render::render_document(
        &meta.rewrite_title(title, &page).join(),
        &meta.render_head(&page),
        &render::render_item_list(&site_name, &tagline, &posts),
    ))
}

// ── Taxonomy archives ──────────────────────────────────

fn term_archive(
    taxonomy: &str,
    slug: &str,
    store: &State<Arc<dyn Store>>,
    hooks: &State<Hooks>,
    cache: &State<CategoryCache>,
) -> Option<RawHtml<String>> {
    let term = store.term_find_by_slug(taxonomy, slug)?;
    let meta = engine(store, hooks, cache);
    let page = PageContext::TaxonomyArchive(&term);

    let title = TitleParts {
        title: term.name.clone(),
        site: Some(meta.site_name()),
        ..Default::default()
    };
    let items = store.item_list_for_term(term.id, LIST_LIMIT, 0);

    Some(RawHtml(render::render_document(
        &meta.rewrite_title(title, &page).join(),
        &meta.render_head(&page),
        &render::render_archive(&term, &items),
    )))
}

#[get("/category/<slug>")]
pub fn category_archive(
    slug: &str,
    store: &State<Arc<dyn Store>>,
    hooks: &State<Hooks>,
    cache: &State<CategoryCache>,
) -> Option<RawHtml<String>> {
    term_archive(TAXONOMY_CATEGORY, slug, store, hooks, cache)
}

#[get("/tag/<slug>")]
pub fn tag_archive(
    slug: &str,
    store: &State<Arc<dyn Store>>,
    hooks: &State<Hooks>,
    cache: &State<CategoryCache>,
) -> Option<RawHtml<String>> {
    term_archive(TAXONOMY_TAG, slug, store, hooks, cache)
}

// ── Single items ───────────────────────────────────────

#[get("/<slug>")]
pub fn single(
    slug: &str,
    store: &State<Arc<dyn Store>>,
    hooks: &State<Hooks>,
    cache: &State<CategoryCache>,
) -> Option<RawHtml<String>> {
    let item = store.item_find_by_slug(slug).filter(|i| i.is_published())?;
    let meta = engine(store, hooks, cache);
    let page = PageContext::for_item(&item);

    let title = TitleParts {
        title: item.title.clone(),
        site: Some(meta.site_name()),
        ..Default::default()
    };

    Some(RawHtml(render::render_document(
        &meta.rewrite_title(title, &page).join(),
        &meta.render_head(&page),
        &render::render_item(&item),
    )))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![homepage, category_archive, tag_archive, single]
}
