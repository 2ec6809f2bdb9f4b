use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use crate::models::option::{OPTION_BLOG_DESCRIPTION, OPTION_BLOG_NAME};

pub type DbPool = Pool<SqliteConnectionManager>;

pub fn init_pool_at(path: &str) -> Result<DbPool, String> {
    let manager = SqliteConnectionManager::file(path);
    let pool = Pool::builder()
        .max_size(10)
        .build(manager)
        .map_err(|e| e.to_string())?;

    // WAL keeps page renders from blocking on admin saves
    let conn = pool.get().map_err(|e| e.to_string())?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .map_err(|e| e.to_string())?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    conn.execute_batch(
        "
        -- Site options (the settings blob lives in one row)
        CREATE TABLE IF NOT EXISTS options (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        -- Content items: posts, pages and custom kinds
        CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY,
            kind TEXT NOT NULL DEFAULT 'post',
            title TEXT NOT NULL,
            slug TEXT UNIQUE NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            excerpt TEXT,
            status TEXT NOT NULL DEFAULT 'draft',
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Registered custom content kinds
        CREATE TABLE IF NOT EXISTS content_kinds (
            name TEXT PRIMARY KEY,
            label TEXT NOT NULL,
            public INTEGER NOT NULL DEFAULT 1,
            show_ui INTEGER NOT NULL DEFAULT 1
        );

        -- Per-item key/value metadata
        CREATE TABLE IF NOT EXISTS item_meta (
            item_id INTEGER NOT NULL,
            meta_key TEXT NOT NULL,
            meta_value TEXT NOT NULL,
            UNIQUE(item_id, meta_key),
            FOREIGN KEY (item_id) REFERENCES items(id) ON DELETE CASCADE
        );

        -- Taxonomy terms (category, post_tag, custom)
        CREATE TABLE IF NOT EXISTS terms (
            id INTEGER PRIMARY KEY,
            taxonomy TEXT NOT NULL,
            name TEXT NOT NULL,
            slug TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            UNIQUE(taxonomy, slug)
        );

        -- Many-to-many: items <-> terms
        CREATE TABLE IF NOT EXISTS item_terms (
            item_id INTEGER NOT NULL,
            term_id INTEGER NOT NULL,
            UNIQUE(item_id, term_id),
            FOREIGN KEY (item_id) REFERENCES items(id) ON DELETE CASCADE,
            FOREIGN KEY (term_id) REFERENCES terms(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_items_kind ON items(kind, status);
        CREATE INDEX IF NOT EXISTS idx_item_terms_term ON item_terms(term_id);
        ",
    )?;

    Ok(())
}

pub fn seed_defaults(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    let defaults = vec![
        (OPTION_BLOG_NAME, "My Site"),
        (OPTION_BLOG_DESCRIPTION, "Just another site"),
    ];

    for (key, value) in defaults {
        conn.execute(
            "INSERT OR IGNORE INTO options (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
    }

    conn.execute(
        "INSERT OR IGNORE INTO terms (taxonomy, name, slug, description)
         VALUES ('category', 'Uncategorized', 'uncategorized', '')",
        [],
    )?;

    Ok(())
}
