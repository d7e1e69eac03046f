use rusqlite::Connection;

use crate::models::{LikeRow, MessageRow, UserRow};
use crate::queries::{MESSAGE_COLUMNS, USER_COLUMNS, message_from_row, user_from_row};
use crate::{Database, Result};

impl Database {
    // -- Follows --

    /// `follower_id` starts following `followed_id`. A repeated pair is an
    /// integrity error.
    pub fn follow(&self, follower_id: i64, followed_id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO follows (user_being_followed_id, user_following_id) VALUES (?1, ?2)",
                [followed_id, follower_id],
            )?;
            Ok(())
        })
    }

    /// Like [`Database::follow`], but an existing pair is left alone.
    /// Returns `true` when a new row was written.
    pub fn follow_if_absent(&self, follower_id: i64, followed_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "INSERT OR IGNORE INTO follows (user_being_followed_id, user_following_id)
                 VALUES (?1, ?2)",
                [followed_id, follower_id],
            )?;
            Ok(n > 0)
        })
    }

    pub fn unfollow(&self, follower_id: i64, followed_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM follows WHERE user_being_followed_id = ?1 AND user_following_id = ?2",
                [followed_id, follower_id],
            )?;
            Ok(n > 0)
        })
    }

    /// Users that `user_id` follows.
    pub fn following(&self, user_id: i64) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            query_users(
                conn,
                &format!(
                    "SELECT {USER_COLUMNS} FROM follows f
                     JOIN users u ON u.id = f.user_being_followed_id
                     WHERE f.user_following_id = ?1
                     ORDER BY f.rowid"
                ),
                user_id,
            )
        })
    }

    /// Users that follow `user_id`.
    pub fn followers(&self, user_id: i64) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            query_users(
                conn,
                &format!(
                    "SELECT {USER_COLUMNS} FROM follows f
                     JOIN users u ON u.id = f.user_following_id
                     WHERE f.user_being_followed_id = ?1
                     ORDER BY f.rowid"
                ),
                user_id,
            )
        })
    }

    /// Does `user_id` follow `other_id`?
    pub fn is_following(&self, user_id: i64, other_id: i64) -> Result<bool> {
        self.with_conn(|conn| follow_exists(conn, user_id, other_id))
    }

    /// Is `user_id` followed by `other_id`?
    pub fn is_followed_by(&self, user_id: i64, other_id: i64) -> Result<bool> {
        self.with_conn(|conn| follow_exists(conn, other_id, user_id))
    }

    // -- Likes --

    pub fn like(&self, user_id: i64, message_id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO likes (user_id, message_id) VALUES (?1, ?2)",
                [user_id, message_id],
            )?;
            Ok(())
        })
    }

    pub fn unlike(&self, user_id: i64, message_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM likes WHERE user_id = ?1 AND message_id = ?2",
                [user_id, message_id],
            )?;
            Ok(n > 0)
        })
    }

    /// Remove the like if present, add it otherwise. Returns `true` when added.
    pub fn toggle_like(&self, user_id: i64, message_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM likes WHERE user_id = ?1 AND message_id = ?2",
                [user_id, message_id],
            )?;
            if removed > 0 {
                return Ok(false);
            }

            conn.execute(
                "INSERT INTO likes (user_id, message_id) VALUES (?1, ?2)",
                [user_id, message_id],
            )?;
            Ok(true)
        })
    }

    pub fn likes_for_user(&self, user_id: i64) -> Result<Vec<LikeRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, message_id FROM likes WHERE user_id = ?1 ORDER BY rowid",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(LikeRow {
                        user_id: row.get(0)?,
                        message_id: row.get(1)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// Messages `user_id` has liked, in the order they were liked.
    pub fn liked_messages(&self, user_id: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM likes l
                 JOIN messages m ON m.id = l.message_id
                 WHERE l.user_id = ?1
                 ORDER BY l.rowid"
            ))?;
            let rows = stmt
                .query_map([user_id], message_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }
}

fn follow_exists(conn: &Connection, follower_id: i64, followed_id: i64) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM follows
            WHERE user_following_id = ?1 AND user_being_followed_id = ?2
         )",
        [follower_id, followed_id],
        |r| r.get(0),
    )?;
    Ok(exists)
}

fn query_users(conn: &Connection, sql: &str, id: i64) -> Result<Vec<UserRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([id], user_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}
