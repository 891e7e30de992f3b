// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Anchor persistence

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::model::{Anchor, NewAnchor};

/// Page size used when the caller does not ask for one
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Storage for saved anchors
pub trait AnchorStore: Send + Sync {
    fn create_anchor(&self, anchor: NewAnchor) -> Result<Anchor>;

    /// Oldest anchor with exactly this name
    fn get_anchor_by_name(&self, name: &str) -> Result<Option<Anchor>>;

    /// Anchors in insertion order
    fn list_anchors(&self, skip: usize, limit: usize) -> Result<Vec<Anchor>>;

    /// Returns false when no anchor had this id
    fn delete_anchor(&self, id: i64) -> Result<bool>;
}

/// SQLite-backed anchor store
pub struct SqliteAnchorStore {
    conn: Mutex<Connection>,
}

impl SqliteAnchorStore {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .with_context(|| format!("failed to open anchor database {}", db_path.display()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.ensure_schema()?;
        info!("Anchor store opened at {}", db_path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("anchor store lock poisoned"))
    }

    fn ensure_schema(&self) -> Result<()> {
        self.conn()?.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS anchors (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              name TEXT NOT NULL,
              description TEXT,
              x_center REAL NOT NULL,
              y_center REAL NOT NULL,
              created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_anchors_name ON anchors(name);
            "#,
        )?;
        Ok(())
    }
}

fn anchor_from_row(row: &Row<'_>) -> rusqlite::Result<Anchor> {
    let created_at: String = row.get(5)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Anchor {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        x_center: row.get(3)?,
        y_center: row.get(4)?,
        created_at,
    })
}

const SELECT_COLUMNS: &str = "SELECT id, name, description, x_center, y_center, created_at FROM anchors";

impl AnchorStore for SqliteAnchorStore {
    fn create_anchor(&self, anchor: NewAnchor) -> Result<Anchor> {
        let created_at = Utc::now();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO anchors (name, description, x_center, y_center, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                anchor.name,
                anchor.description,
                anchor.x_center,
                anchor.y_center,
                created_at.to_rfc3339()
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!("Anchor {} saved as id {}", anchor.name, id);

        Ok(Anchor {
            id,
            name: anchor.name,
            description: anchor.description,
            x_center: anchor.x_center,
            y_center: anchor.y_center,
            created_at,
        })
    }

    fn get_anchor_by_name(&self, name: &str) -> Result<Option<Anchor>> {
        let conn = self.conn()?;
        let anchor = conn
            .query_row(
                &format!("{} WHERE name = ?1 ORDER BY id LIMIT 1", SELECT_COLUMNS),
                params![name],
                anchor_from_row,
            )
            .optional()?;
        Ok(anchor)
    }

    fn list_anchors(&self, skip: usize, limit: usize) -> Result<Vec<Anchor>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY id LIMIT ?1 OFFSET ?2",
            SELECT_COLUMNS
        ))?;
        // SQLite reads a negative LIMIT as unbounded, so oversized values saturate
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let skip = i64::try_from(skip).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit, skip], anchor_from_row)?;

        let mut anchors = Vec::new();
        for row in rows {
            anchors.push(row?);
        }
        Ok(anchors)
    }

    fn delete_anchor(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn()?
            .execute("DELETE FROM anchors WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}
