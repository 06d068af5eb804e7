// SQLite document store behind the `expense-store` server
//
// One table holds every collection. Documents are opaque JSON objects keyed
// by a time-ordered UUID (v7), so sorting keys gives insertion order, the way
// push keys behave in a realtime database. The server never interprets them.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;

use crate::error::StoreError;

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

pub fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT UNIQUE NOT NULL,
            collection TEXT NOT NULL,
            body TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection)",
        [],
    )?;

    Ok(())
}

/// Store a document, returning its new id. Never overwrites.
pub fn push_document(
    conn: &Connection,
    collection: &str,
    body: &serde_json::Value,
) -> Result<String, StoreError> {
    let id = uuid::Uuid::now_v7().to_string();
    let body_json = serde_json::to_string(body)?;

    conn.execute(
        "INSERT INTO documents (id, collection, body) VALUES (?1, ?2, ?3)",
        params![id, collection, body_json],
    )?;

    Ok(id)
}

/// All documents of a collection, in insertion order
pub fn get_documents(
    conn: &Connection,
    collection: &str,
) -> Result<Vec<(String, serde_json::Value)>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, body FROM documents
         WHERE collection = ?1
         ORDER BY seq",
    )?;

    let rows = stmt
        .query_map([collection], |row| {
            let id: String = row.get(0)?;
            let body: String = row.get(1)?;
            Ok((id, body))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, body)| -> Result<_, StoreError> { Ok((id, serde_json::from_str(&body)?)) })
        .collect()
}
