use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

pub const TAXONOMY_CATEGORY: &str = "category";
pub const TAXONOMY_TAG: &str = "post_tag";

/// A classification term. `count` is the number of items assigned to it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Term {
    pub id: i64,
    pub taxonomy: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub count: i64,
}

#[derive(Debug, Deserialize)]
pub struct TermForm {
    pub taxonomy: String,
    pub name: String,
    pub slug: String,
    pub description: String,
}

const SELECT_WITH_COUNT: &str = "SELECT t.id, t.taxonomy, t.name, t.slug, t.description,
        (SELECT COUNT(*) FROM item_terms it WHERE it.term_id = t.id) AS count
     FROM terms t";

impl Term {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Term {
            id: row.get("id")?,
            taxonomy: row.get("taxonomy")?,
            name: row.get("name")?,
            slug: row.get("slug")?,
            description: row.get("description")?,
            count: row.get("count")?,
        })
    }

    pub fn find_by_slug(pool: &DbPool, taxonomy: &str, slug: &str) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            &format!("{} WHERE t.taxonomy = ?1 AND t.slug = ?2", SELECT_WITH_COUNT),
            params![taxonomy, slug],
            Self::from_row,
        )
        .ok()
    }

    pub fn for_item(pool: &DbPool, item_id: i64, taxonomy: &str) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };

        let sql = format!(
            "{} JOIN item_terms x ON x.term_id = t.id
             WHERE x.item_id = ?1 AND t.taxonomy = ?2
             ORDER BY t.name",
            SELECT_WITH_COUNT
        );
        let mut stmt = match conn.prepare(&sql) {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        stmt.query_map(params![item_id, taxonomy], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    /// Most used terms first; ties broken by name.
    pub fn top_by_count(pool: &DbPool, taxonomy: &str, limit: i64) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };

        let sql = format!(
            "{} WHERE t.taxonomy = ?1 ORDER BY count DESC, t.name ASC LIMIT ?2",
            SELECT_WITH_COUNT
        );
        let mut stmt = match conn.prepare(&sql) {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        stmt.query_map(params![taxonomy, limit], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn create(pool: &DbPool, form: &TermForm) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO terms (taxonomy, name, slug, description) VALUES (?1, ?2, ?3, ?4)",
            params![form.taxonomy, form.name, form.slug, form.description],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    /// Replace the item's terms within one taxonomy.
    pub fn set_for_item(
        pool: &DbPool,
        item_id: i64,
        taxonomy: &str,
        term_ids: &[i64],
    ) -> Result<(), String> {
        let mut conn = pool.get().map_err(|e| e.to_string())?;
        let tx = conn.transaction().map_err(|e| e.to_string())?;
        tx.execute(
            "DELETE FROM item_terms WHERE item_id = ?1
             AND term_id IN (SELECT id FROM terms WHERE taxonomy = ?2)",
            params![item_id, taxonomy],
        )
        .map_err(|e| e.to_string())?;
        for term_id in term_ids {
            tx.execute(
                "INSERT OR IGNORE INTO item_terms (item_id, term_id)
                 SELECT ?1, id FROM terms WHERE id = ?2 AND taxonomy = ?3",
                params![item_id, term_id, taxonomy],
            )
            .map_err(|e| e.to_string())?;
        }
        tx.commit().map_err(|e| e.to_string())?;
        Ok(())
    }
}
