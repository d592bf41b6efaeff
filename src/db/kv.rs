//! String key-value store on top of the `kv_store` table.
//!
//! Every write bumps the row's `version`, so callers can guard a
//! read-modify-write with [`compare_and_set`].

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct KvEntry {
    pub value: String,
    pub version: i64,
}

pub fn get(conn: &Connection, key: &str) -> anyhow::Result<Option<KvEntry>> {
    let entry = conn
        .query_row(
            "SELECT value, version FROM kv_store WHERE key = ?1",
            params![key],
            |row| {
                Ok(KvEntry {
                    value: row.get(0)?,
                    version: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(entry)
}

/// Blind write. Returns the row's new version.
pub fn set(conn: &Connection, key: &str, value: &str) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO kv_store (key, value, version, updated_at) VALUES (?1, ?2, 1, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET
           value = excluded.value,
           version = kv_store.version + 1,
           updated_at = excluded.updated_at",
        params![key, value],
    )?;
    let version: i64 = conn.query_row(
        "SELECT version FROM kv_store WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Write only if the stored version still equals `expected`; `expected == 0`
/// means the key must not exist yet. Returns the new version, or `None` when
/// someone else wrote first.
pub fn compare_and_set(
    conn: &Connection,
    key: &str,
    value: &str,
    expected: i64,
) -> anyhow::Result<Option<i64>> {
    let changed = if expected == 0 {
        conn.execute(
            "INSERT INTO kv_store (key, value, version, updated_at) VALUES (?1, ?2, 1, datetime('now'))
             ON CONFLICT(key) DO NOTHING",
            params![key, value],
        )?
    } else {
        conn.execute(
            "UPDATE kv_store SET value = ?1, version = version + 1, updated_at = datetime('now')
             WHERE key = ?2 AND version = ?3",
            params![value, key, expected],
        )?
    };

    Ok((changed == 1).then_some(expected + 1))
}

pub fn delete(conn: &Connection, key: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
    Ok(count > 0)
}

pub fn get_json<T: DeserializeOwned>(conn: &Connection, key: &str) -> anyhow::Result<Option<(T, i64)>> {
    match get(conn, key)? {
        Some(entry) => {
            let value = serde_json::from_str(&entry.value)?;
            Ok(Some((value, entry.version)))
        }
        None => Ok(None),
    }
}

pub fn set_json<T: Serialize>(conn: &Connection, key: &str, value: &T) -> anyhow::Result<i64> {
    set(conn, key, &serde_json::to_string(value)?)
}
