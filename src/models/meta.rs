use rusqlite::params;

use crate::db::DbPool;

/// Per-item key/value metadata rows.
pub struct ItemMeta;

impl ItemMeta {
    pub fn get(pool: &DbPool, item_id: i64, key: &str) -> Option<String> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT meta_value FROM item_meta WHERE item_id = ?1 AND meta_key = ?2",
            params![item_id, key],
            |row| row.get(0),
        )
        .ok()
    }

    pub fn set(pool: &DbPool, item_id: i64, key: &str, value: &str) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO item_meta (item_id, meta_key, meta_value) VALUES (?1, ?2, ?3)
             ON CONFLICT(item_id, meta_key) DO UPDATE SET meta_value = ?3",
            params![item_id, key, value],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn delete(pool: &DbPool, item_id: i64, key: &str) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "DELETE FROM item_meta WHERE item_id = ?1 AND meta_key = ?2",
            params![item_id, key],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }
}
