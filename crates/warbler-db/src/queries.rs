use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::warn;

use crate::models::{DEFAULT_IMAGE_URL, MessageRow, NewMessage, NewUser, UserRow};
use crate::{Database, DbError, Result};

pub(crate) const USER_COLUMNS: &str = "u.id, u.username, u.email, u.password, u.image_url";
pub(crate) const MESSAGE_COLUMNS: &str = "m.id, m.text, m.timestamp, m.user_id";

impl Database {
    // -- Users --

    pub fn create_user(&self, user: &NewUser) -> Result<UserRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, password, image_url)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    user.id,
                    user.username,
                    user.email,
                    user.password,
                    user.image_url.as_deref().unwrap_or(DEFAULT_IMAGE_URL),
                ],
            )?;
            let id = conn.last_insert_rowid();
            query_user(conn, id)?.ok_or(DbError::NotFound)
        })
    }

    pub fn get_user(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, id))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {USER_COLUMNS} FROM users u WHERE u.username = ?1"),
                    [username],
                    user_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Users whose username contains `search` verbatim (case-sensitive, no
    /// wildcards), or everyone when `None`.
    pub fn search_users(&self, search: Option<&str>) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let needle = search.unwrap_or("");
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users u WHERE instr(u.username, ?1) > 0 ORDER BY u.id"
            ))?;
            let rows = stmt
                .query_map([needle], user_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// Check a username/password pair.
    ///
    /// Unknown users, wrong passwords and stored passwords that were never
    /// hashed all come back as `Ok(None)`.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<UserRow>> {
        let Some(user) = self.get_user_by_username(username)? else {
            return Ok(None);
        };

        match warbler_crypto::verify_password(password, &user.password) {
            Ok(true) => Ok(Some(user)),
            Ok(false) => Ok(None),
            Err(e) => {
                warn!("Unverifiable password hash for user {}: {}", user.id, e);
                Ok(None)
            }
        }
    }

    /// Returns whether a row was removed. Messages, follows and likes go with it.
    pub fn delete_user(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(n > 0)
        })
    }

    // -- Messages --

    pub fn insert_message(&self, message: &NewMessage) -> Result<MessageRow> {
        let timestamp = message.timestamp.unwrap_or_else(Utc::now);

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, text, timestamp, user_id) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![message.id, message.text, timestamp, message.user_id],
            )?;
            let id = conn.last_insert_rowid();
            query_message(conn, id)?.ok_or(DbError::NotFound)
        })
    }

    pub fn get_message(&self, id: i64) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| query_message(conn, id))
    }

    /// The only message in the table. `NotFound` when empty,
    /// `MultipleResults` when there is more than one.
    pub fn one_message(&self) -> Result<MessageRow> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {MESSAGE_COLUMNS} FROM messages m LIMIT 2"))?;
            let mut rows = stmt
                .query_map([], message_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            match rows.len() {
                0 => Err(DbError::NotFound),
                1 => Ok(rows.remove(0)),
                _ => Err(DbError::MultipleResults),
            }
        })
    }

    pub fn message_count(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM messages", [], |r| r.get(0))?;
            Ok(n as usize)
        })
    }

    /// Newest first.
    pub fn messages_for_user(&self, user_id: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages m
                 WHERE m.user_id = ?1
                 ORDER BY m.timestamp DESC, m.id DESC"
            ))?;
            let rows = stmt
                .query_map([user_id], message_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// Messages by `user_id` and everyone they follow, newest first.
    pub fn timeline(&self, user_id: i64, limit: u32) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages m
                 WHERE m.user_id = ?1
                    OR m.user_id IN (
                        SELECT f.user_being_followed_id FROM follows f
                        WHERE f.user_following_id = ?1
                    )
                 ORDER BY m.timestamp DESC, m.id DESC
                 LIMIT ?2"
            ))?;
            let rows = stmt
                .query_map(rusqlite::params![user_id, limit], message_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    pub fn delete_message(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM messages WHERE id = ?1", [id])?;
            Ok(n > 0)
        })
    }
}

pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        image_url: row.get(4)?,
    })
}

pub(crate) fn message_from_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        text: row.get(1)?,
        timestamp: row.get(2)?,
        user_id: row.get(3)?,
    })
}

fn query_user(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    let row = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = ?1"),
            [id],
            user_from_row,
        )
        .optional()?;
    Ok(row)
}

fn query_message(conn: &Connection, id: i64) -> Result<Option<MessageRow>> {
    let row = conn
        .query_row(
            &format!("SELECT {MESSAGE_COLUMNS} FROM messages m WHERE m.id = ?1"),
            [id],
            message_from_row,
        )
        .optional()?;
    Ok(row)
}
