pub mod error;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod relations;

pub use error::{DbError, Result};
pub use models::{DEFAULT_IMAGE_URL, LikeRow, MessageRow, NewMessage, NewUser, UserRow};

use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        let db = Self::init(conn)?;
        info!("Database opened at {} (journal_mode={})", path.display(), mode);
        Ok(db)
    }

    /// Private, empty database. Used by tests so every case starts clean.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|_| DbError::Poisoned)?;
        f(&conn)
    }

    /// Delete every row from every table, children first.
    pub fn reset(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(
                "
                DELETE FROM likes;
                DELETE FROM follows;
                DELETE FROM messages;
                DELETE FROM users;
                ",
            )?;
            Ok(())
        })
    }
}
