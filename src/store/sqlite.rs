use crate::db::DbPool;
use crate::models::meta::ItemMeta;
use crate::models::option::SiteOption;
use crate::models::post::{ContentItem, ContentKind, ItemForm};
use crate::models::term::{Term, TermForm};

use super::Store;

/// SQLite-backed implementation of the Store trait.
/// Wraps the r2d2 connection pool and delegates to model methods.
pub struct SqliteStore {
    pub pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn new_at(path: &str) -> Result<Self, String> {
        let pool = crate::db::init_pool_at(path)?;
        Ok(Self { pool })
    }
}

impl Store for SqliteStore {
    // ── Lifecycle ───────────────────────────────────────────────────

    fn run_migrations(&self) -> Result<(), String> {
        crate::db::run_migrations(&self.pool).map_err(|e| e.to_string())
    }

    fn seed_defaults(&self) -> Result<(), String> {
        crate::db::seed_defaults(&self.pool).map_err(|e| e.to_string())
    }

    // ── Options ─────────────────────────────────────────────────────

    fn option_get(&self, key: &str) -> Option<String> {
        SiteOption::get(&self.pool, key)
    }

    fn option_set(&self, key: &str, value: &str) -> Result<(), String> {
        SiteOption::set(&self.pool, key, value)
    }

    fn option_delete(&self, key: &str) -> Result<(), String> {
        SiteOption::delete(&self.pool, key)
    }

    // ── Content items ───────────────────────────────────────────────

    fn item_find_by_id(&self, id: i64) -> Option<ContentItem> {
        ContentItem::find_by_id(&self.pool, id)
    }

    fn item_find_by_slug(&self, slug: &str) -> Option<ContentItem> {
        ContentItem::find_by_slug(&self.pool, slug)
    }

    fn item_list(&self, kind: Option<&str>, limit: i64, offset: i64) -> Vec<ContentItem> {
        ContentItem::list(&self.pool, kind, limit, offset)
    }

    fn item_list_for_term(&self, term_id: i64, limit: i64, offset: i64) -> Vec<ContentItem> {
        ContentItem::published_for_term(&self.pool, term_id, limit, offset)
    }

    fn item_create(&self, form: &ItemForm) -> Result<i64, String> {
        ContentItem::create(&self.pool, form)
    }

    fn item_update(&self, id: i64, form: &ItemForm) -> Result<(), String> {
        ContentItem::update(&self.pool, id, form)
    }

    // ── Content kinds ───────────────────────────────────────────────

    fn content_kind_list(&self) -> Vec<ContentKind> {
        ContentKind::list_visible(&self.pool)
    }

    fn content_kind_register(&self, kind: &ContentKind) -> Result<(), String> {
        ContentKind::register(&self.pool, kind)
    }

    // ── Per-item metadata ───────────────────────────────────────────

    fn meta_get(&self, item_id: i64, key: &str) -> Option<String> {
        ItemMeta::get(&self.pool, item_id, key)
    }

    fn meta_set(&self, item_id: i64, key: &str, value: &str) -> Result<(), String> {
        ItemMeta::set(&self.pool, item_id, key, value)
    }

    fn meta_delete(&self, item_id: i64, key: &str) -> Result<(), String> {
        ItemMeta::delete(&self.pool, item_id, key)
    }

    // ── Terms ───────────────────────────────────────────────────────

    fn term_find_by_slug(&self, taxonomy: &str, slug: &str) -> Option<Term> {
        Term::find_by_slug(&self.pool, taxonomy, slug)
    }

    fn term_create(&self, form: &TermForm) -> Result<i64, String> {
        Term::create(&self.pool, form)
    }

    fn term_for_item(&self, item_id: i64, taxonomy: &str) -> Vec<Term> {
        Term::for_item(&self.pool, item_id, taxonomy)
    }

    fn term_set_for_item(
        &self,
        item_id: i64,
        taxonomy: &str,
        term_ids: &[i64],
    ) -> Result<(), String> {
        Term::set_for_item(&self.pool, item_id, taxonomy, term_ids)
    }

    fn term_top_by_count(&self, taxonomy: &str, limit: i64) -> Vec<Term> {
        Term::top_by_count(&self.pool, taxonomy, limit)
    }
}
