//! Database row types: these map directly to SQLite rows.
//! `New*` types are pending entities; nothing touches the database until
//! they are passed to `Database::create_user` / `Database::insert_message`.

use chrono::{DateTime, Utc};

use crate::Result;

pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-pic.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    pub id: i64,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeRow {
    pub user_id: i64,
    pub message_id: i64,
}

/// A user waiting to be committed.
///
/// Building one by hand stores `password` verbatim; go through
/// [`NewUser::signup`] for anything that will log in.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
    pub image_url: Option<String>,
}

impl NewUser {
    /// Hash the password and fill in the default image. `None` for username or
    /// email is accepted here and rejected by the database on commit.
    pub fn signup(
        username: Option<&str>,
        email: Option<&str>,
        password: &str,
        image_url: Option<&str>,
    ) -> Result<Self> {
        let hashed = warbler_crypto::hash_password(password)?;

        Ok(Self {
            id: None,
            username: username.map(str::to_owned),
            email: email.map(str::to_owned),
            password: hashed,
            image_url: Some(image_url.unwrap_or(DEFAULT_IMAGE_URL).to_owned()),
        })
    }
}

/// A message waiting to be committed. `timestamp: None` means "now".
#[derive(Debug, Clone, Default)]
pub struct NewMessage {
    pub id: Option<i64>,
    pub text: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub user_id: Option<i64>,
}

impl NewMessage {
    pub fn new(text: impl Into<String>, user_id: i64) -> Self {
        Self {
            text: text.into(),
            user_id: Some(user_id),
            ..Self::default()
        }
    }
}
