use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

pub const KIND_POST: &str = "post";
pub const KIND_PAGE: &str = "page";

/// A single addressable piece of content: a post, a page or an item of a
/// custom kind.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ContentItem {
    pub id: i64,
    pub kind: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct ItemForm {
    pub kind: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub status: String,
}

/// A registered custom content kind.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ContentKind {
    pub name: String,
    pub label: String,
    pub public: bool,
    pub show_ui: bool,
}

impl ContentItem {
    pub fn is_published(&self) -> bool {
        self.status == "published"
    }

    pub fn is_page(&self) -> bool {
        self.kind == KIND_PAGE
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(ContentItem {
            id: row.get("id")?,
            kind: row.get("kind")?,
            title: row.get("title")?,
            slug: row.get("slug")?,
            content: row.get("content")?,
            excerpt: row.get("excerpt")?,
            status: row.get("status")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row("SELECT * FROM items WHERE id = ?1", params![id], Self::from_row)
            .ok()
    }

    pub fn find_by_slug(pool: &DbPool, slug: &str) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM items WHERE slug = ?1",
            params![slug],
            Self::from_row,
        )
        .ok()
    }

    pub fn list(pool: &DbPool, kind: Option<&str>, limit: i64, offset: i64) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };

        let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match kind {
            Some(k) => (
                "SELECT * FROM items WHERE kind = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3"
                    .to_string(),
                vec![Box::new(k.to_string()), Box::new(limit), Box::new(offset)],
            ),
            None => (
                "SELECT * FROM items ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2".to_string(),
                vec![Box::new(limit), Box::new(offset)],
            ),
        };

        let mut stmt = match conn.prepare(&sql) {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        stmt.query_map(params_refs.as_slice(), Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    /// Published items assigned to a term, newest first.
    pub fn published_for_term(pool: &DbPool, term_id: i64, limit: i64, offset: i64) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let mut stmt = match conn.prepare(
            "SELECT i.* FROM items i
             JOIN item_terms it ON it.item_id = i.id
             WHERE it.term_id = ?1 AND i.status = 'published'
             ORDER BY i.created_at DESC, i.id DESC LIMIT ?2 OFFSET ?3",
        ) {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map(params![term_id, limit, offset], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn create(pool: &DbPool, form: &ItemForm) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO items (kind, title, slug, content, excerpt, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                form.kind,
                form.title,
                form.slug,
                form.content,
                form.excerpt,
                form.status,
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(pool: &DbPool, id: i64, form: &ItemForm) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "UPDATE items SET kind = ?1, title = ?2, slug = ?3, content = ?4, excerpt = ?5,
             status = ?6, updated_at = CURRENT_TIMESTAMP WHERE id = ?7",
            params![
                form.kind,
                form.title,
                form.slug,
                form.content,
                form.excerpt,
                form.status,
                id,
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }
}

impl ContentKind {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(ContentKind {
            name: row.get("name")?,
            label: row.get("label")?,
            public: row.get::<_, i64>("public")? != 0,
            show_ui: row.get::<_, i64>("show_ui")? != 0,
        })
    }

    /// Custom kinds that are public and shown in the admin UI.
    pub fn list_visible(pool: &DbPool) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let mut stmt = match conn.prepare(
            "SELECT * FROM content_kinds WHERE public = 1 AND show_ui = 1 ORDER BY name",
        ) {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map([], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn register(pool: &DbPool, kind: &ContentKind) -> Result<(), String> {
        if kind.name == KIND_POST || kind.name == KIND_PAGE {
            return Err(format!("'{}' is a built-in kind", kind.name));
        }
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO content_kinds (name, label, public, show_ui) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(name) DO UPDATE SET label = ?2, public = ?3, show_ui = ?4",
            params![kind.name, kind.label, kind.public as i64, kind.show_ui as i64],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }
}
