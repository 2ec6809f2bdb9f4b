use crate::models::post::{ContentItem, ContentKind, ItemForm};
use crate::models::settings::{Settings, OPTIONS_KEY};
use crate::models::term::{Term, TermForm};

pub mod sqlite;

/// Unified data-access trait. Every read and write of options, content,
/// per-item metadata and taxonomy goes through here.
/// Implementation: `SqliteStore` (wraps rusqlite/r2d2).
pub trait Store: Send + Sync {
    // ── Lifecycle ───────────────────────────────────────────────────
    fn run_migrations(&self) -> Result<(), String>;
    fn seed_defaults(&self) -> Result<(), String>;

    // ── Options ─────────────────────────────────────────────────────
    fn option_get(&self, key: &str) -> Option<String>;
    fn option_get_or(&self, key: &str, default: &str) -> String {
        self.option_get(key).unwrap_or_else(|| default.to_string())
    }
    fn option_set(&self, key: &str, value: &str) -> Result<(), String>;
    fn option_delete(&self, key: &str) -> Result<(), String>;

    /// The settings record; absent or malformed blobs load as defaults.
    fn settings_load(&self) -> Settings {
        self.option_get(OPTIONS_KEY)
            .map(|raw| Settings::from_json(&raw))
            .unwrap_or_default()
    }
    fn settings_save(&self, settings: &Settings) -> Result<(), String> {
        self.option_set(OPTIONS_KEY, &settings.to_json())
    }

    // ── Content items ───────────────────────────────────────────────
    fn item_find_by_id(&self, id: i64) -> Option<ContentItem>;
    fn item_find_by_slug(&self, slug: &str) -> Option<ContentItem>;
    fn item_list(&self, kind: Option<&str>, limit: i64, offset: i64) -> Vec<ContentItem>;
    /// Published items assigned to a term.
    fn item_list_for_term(&self, term_id: i64, limit: i64, offset: i64) -> Vec<ContentItem>;
    fn item_create(&self, form: &ItemForm) -> Result<i64, String>;
    fn item_update(&self, id: i64, form: &ItemForm) -> Result<(), String>;

    // ── Content kinds ───────────────────────────────────────────────
    fn content_kind_list(&self) -> Vec<ContentKind>;
    fn content_kind_register(&self, kind: &ContentKind) -> Result<(), String>;

    // ── Per-item metadata ───────────────────────────────────────────
    fn meta_get(&self, item_id: i64, key: &str) -> Option<String>;
    /// Stored value, or an empty string when absent.
    fn meta_get_string(&self, item_id: i64, key: &str) -> String {
        self.meta_get(item_id, key).unwrap_or_default()
    }
    fn meta_set(&self, item_id: i64, key: &str, value: &str) -> Result<(), String>;
    fn meta_delete(&self, item_id: i64, key: &str) -> Result<(), String>;

    // ── Terms ───────────────────────────────────────────────────────
    fn term_find_by_slug(&self, taxonomy: &str, slug: &str) -> Option<Term>;
    fn term_create(&self, form: &TermForm) -> Result<i64, String>;
    fn term_for_item(&self, item_id: i64, taxonomy: &str) -> Vec<Term>;
    fn term_set_for_item(
        &self,
        item_id: i64,
        taxonomy: &str,
        term_ids: &[i64],
    ) -> Result<(), String>;
    fn term_top_by_count(&self, taxonomy: &str, limit: i64) -> Vec<Term>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::term::{TAXONOMY_CATEGORY, TAXONOMY_TAG};
    use crate::store::sqlite::SqliteStore;

    /// Create a fresh in-memory SqliteStore with migrations + seed applied.
    fn test_store() -> SqliteStore {
        let manager = r2d2_sqlite::SqliteConnectionManager::memory();
        let pool = r2d2::Pool::builder()
            .max_size(1)
            .build(manager)
            .expect("Failed to create in-memory pool");
        let store = SqliteStore::new(pool);
        store.run_migrations().expect("migrations failed");
        store.seed_defaults().expect("seed failed");
        store
    }

    fn item(kind: &str, slug: &str) -> ItemForm {
        ItemForm {
            kind: kind.to_string(),
            title: format!("Title {}", slug),
            slug: slug.to_string(),
            content: "<p>Body</p>".to_string(),
            excerpt: None,
            status: "published".to_string(),
        }
    }

    fn term(taxonomy: &str, name: &str) -> TermForm {
        TermForm {
            taxonomy: taxonomy.to_string(),
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            description: String::new(),
        }
    }

    // ── Options ─────────────────────────────────────────────────────

    #[test]
    fn test_option_get_set_delete() {
        let s = test_store();
        assert!(s.option_get("nonexistent_key_xyz").is_none());
        s.option_set("test_key", "hello").unwrap();
        assert_eq!(s.option_get("test_key"), Some("hello".to_string()));
        s.option_set("test_key", "again").unwrap();
        assert_eq!(s.option_get_or("test_key", "fallback"), "again");
        s.option_delete("test_key").unwrap();
        assert_eq!(s.option_get_or("test_key", "fallback"), "fallback");
    }

    #[test]
    fn test_seeded_defaults() {
        let s = test_store();
        assert!(s.option_get("blogname").is_some());
        assert!(s.option_get("blogdescription").is_some());
        assert!(s.term_find_by_slug(TAXONOMY_CATEGORY, "uncategorized").is_some());
    }

    #[test]
    fn test_settings_blob_roundtrip() {
        let s = test_store();
        assert_eq!(s.settings_load(), Settings::default());

        let mut settings = Settings::default();
        settings.site_keywords = "a, b".to_string();
        settings
            .post_options
            .insert("mt_seo_title".to_string(), "1".to_string());
        s.settings_save(&settings).unwrap();
        assert_eq!(s.settings_load(), settings);

        s.option_set(OPTIONS_KEY, "{broken").unwrap();
        assert_eq!(s.settings_load(), Settings::default());
    }

    // ── Items ───────────────────────────────────────────────────────

    #[test]
    fn test_item_create_find_update() {
        let s = test_store();
        let id = s.item_create(&item("post", "hello")).unwrap();
        let found = s.item_find_by_id(id).expect("item by id");
        assert_eq!(found.slug, "hello");
        assert_eq!(s.item_find_by_slug("hello").unwrap().id, id);

        let mut form = item("page", "hello");
        form.title = "Changed".to_string();
        s.item_update(id, &form).unwrap();
        let found = s.item_find_by_id(id).unwrap();
        assert_eq!(found.title, "Changed");
        assert!(found.is_page());

        assert!(s.item_create(&item("post", "hello")).is_err());
    }

    #[test]
    fn test_item_list_by_kind() {
        let s = test_store();
        s.item_create(&item("post", "a")).unwrap();
        s.item_create(&item("page", "b")).unwrap();
        s.item_create(&item("post", "c")).unwrap();
        assert_eq!(s.item_list(Some("post"), 10, 0).len(), 2);
        assert_eq!(s.item_list(None, 10, 0).len(), 3);
        assert_eq!(s.item_list(None, 1, 0).len(), 1);
    }

    // ── Kinds ───────────────────────────────────────────────────────

    #[test]
    fn test_content_kinds() {
        let s = test_store();
        s.content_kind_register(&ContentKind {
            name: "book".to_string(),
            label: "Books".to_string(),
            public: true,
            show_ui: true,
        })
        .unwrap();
        s.content_kind_register(&ContentKind {
            name: "internal".to_string(),
            label: "Internal".to_string(),
            public: false,
            show_ui: true,
        })
        .unwrap();
        let kinds = s.content_kind_list();
        assert_eq!(kinds.len(), 1);
        assert_eq!(kinds[0].name, "book");

        let builtin = ContentKind {
            name: "post".to_string(),
            label: "Posts".to_string(),
            public: true,
            show_ui: true,
        };
        assert!(s.content_kind_register(&builtin).is_err());
    }

    // ── Meta ────────────────────────────────────────────────────────

    #[test]
    fn test_meta_get_set_delete() {
        let s = test_store();
        let id = s.item_create(&item("post", "m")).unwrap();
        assert_eq!(s.meta_get_string(id, "mt_seo_title"), "");
        s.meta_set(id, "mt_seo_title", "One").unwrap();
        s.meta_set(id, "mt_seo_title", "Two").unwrap();
        assert_eq!(s.meta_get(id, "mt_seo_title"), Some("Two".to_string()));
        s.meta_delete(id, "mt_seo_title").unwrap();
        assert!(s.meta_get(id, "mt_seo_title").is_none());
    }

    // ── Terms ───────────────────────────────────────────────────────

    #[test]
    fn test_terms_for_item() {
        let s = test_store();
        let id = s.item_create(&item("post", "t")).unwrap();
        let news = s.term_create(&term(TAXONOMY_CATEGORY, "News")).unwrap();
        let rust = s.term_create(&term(TAXONOMY_TAG, "Rust")).unwrap();

        s.term_set_for_item(id, TAXONOMY_CATEGORY, &[news]).unwrap();
        s.term_set_for_item(id, TAXONOMY_TAG, &[rust]).unwrap();
        let cats = s.term_for_item(id, TAXONOMY_CATEGORY);
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].name, "News");
        assert_eq!(cats[0].count, 1);

        // A term from another taxonomy is not attached
        s.term_set_for_item(id, TAXONOMY_CATEGORY, &[rust]).unwrap();
        assert!(s.term_for_item(id, TAXONOMY_CATEGORY).is_empty());
        assert_eq!(s.term_for_item(id, TAXONOMY_TAG).len(), 1);
    }

    #[test]
    fn test_term_top_by_count() {
        let s = test_store();
        let a = s.term_create(&term(TAXONOMY_CATEGORY, "Alpha")).unwrap();
        let b = s.term_create(&term(TAXONOMY_CATEGORY, "Beta")).unwrap();
        for slug in ["p1", "p2"] {
            let id = s.item_create(&item("post", slug)).unwrap();
            s.term_set_for_item(id, TAXONOMY_CATEGORY, &[b]).unwrap();
        }
        let id = s.item_create(&item("post", "p3")).unwrap();
        s.term_set_for_item(id, TAXONOMY_CATEGORY, &[a, b]).unwrap();

        let top = s.term_top_by_count(TAXONOMY_CATEGORY, 20);
        let names: Vec<&str> = top.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Beta", "Alpha", "Uncategorized"]);
        assert_eq!(s.term_top_by_count(TAXONOMY_CATEGORY, 1).len(), 1);
    }

    #[test]
    fn test_items_for_term_skip_drafts() {
        let s = test_store();
        let news = s.term_create(&term(TAXONOMY_CATEGORY, "News")).unwrap();
        let live = s.item_create(&item("post", "live")).unwrap();
        let mut draft = item("post", "draft");
        draft.status = "draft".to_string();
        let draft = s.item_create(&draft).unwrap();
        for id in [live, draft] {
            s.term_set_for_item(id, TAXONOMY_CATEGORY, &[news]).unwrap();
        }

        let items = s.item_list_for_term(news, 10, 0);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, live);
    }
}
