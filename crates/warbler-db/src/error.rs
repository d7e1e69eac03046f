use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// A write rejected by a NOT NULL, UNIQUE, PRIMARY KEY or FOREIGN KEY constraint.
    #[error("integrity violation: {0}")]
    Integrity(String),

    #[error("no row found")]
    NotFound,

    #[error("multiple rows found when exactly one was required")]
    MultipleResults,

    #[error("database lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Sqlite(rusqlite::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DbError {
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(e, msg)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::Integrity(msg.unwrap_or_else(|| e.to_string()))
            }
            rusqlite::Error::QueryReturnedNoRows => Self::NotFound,
            other => Self::Sqlite(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
