use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::User;

// ── Users ──

pub fn create_user(conn: &Connection, user: &User, password_hash: &str) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO users (id, email, name, password_hash, email_confirmed, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.id,
            user.email,
            user.name,
            password_hash,
            user.email_confirmed as i32,
            user.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn email_exists(conn: &Connection, email: &str) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE email = ?1",
        params![email],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> anyhow::Result<Option<(User, String)>> {
    let result = conn.query_row(
        "SELECT id, email, name, email_confirmed, created_at, password_hash FROM users WHERE email = ?1",
        params![email],
        |row| {
            let created_at_str: String = row.get(4)?;
            Ok((
                User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    name: row.get(2)?,
                    email_confirmed: row.get::<_, i32>(3)? != 0,
                    created_at: parse_timestamp(&created_at_str),
                },
                row.get::<_, String>(5)?,
            ))
        },
    );

    match result {
        Ok(found) => Ok(Some(found)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
