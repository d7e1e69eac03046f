pub mod auth;
pub mod likes;
pub mod messages;
pub mod middleware;
pub mod users;

use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    http::{StatusCode, header},
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use tracing::error;

use warbler_db::{Database, MessageRow, UserRow};
use warbler_types::api::{MessageResponse, UserResponse};

/// Shared application state for all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    /// Signs the session cookie.
    pub key: Key,
}

impl AppState {
    pub fn new(db: Database, key: Key) -> Self {
        Self {
            db: Arc::new(db),
            key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

/// Every Warbler route, with the session middleware applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(messages::home))
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/users", get(users::list_users))
        .route("/users/{user_id}", get(users::show_user))
        .route("/users/{user_id}/following", get(users::show_following))
        .route("/users/{user_id}/followers", get(users::show_followers))
        .route("/users/{user_id}/likes", get(likes::show_likes))
        .route("/users/follow/{follow_id}", post(users::add_follow))
        .route("/users/stop-following/{follow_id}", post(users::stop_following))
        .route("/users/add_like/{message_id}", post(likes::toggle_like))
        .route("/users/delete", post(users::delete_user))
        .route("/messages/new", post(messages::create_message))
        .route("/messages/{message_id}", get(messages::show_message))
        .route("/messages/{message_id}/delete", post(messages::delete_message))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::load_current_user,
        ))
        .with_state(state)
}

/// `302 Found` to `location`. axum's `Redirect` only speaks 303/307/308.
pub(crate) fn found(location: impl Into<String>) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.into())]).into_response()
}

/// Run a store call on the blocking pool. Any failure is logged and becomes a 500.
pub(crate) async fn db_call<F, T>(db: &Arc<Database>, f: F) -> Result<T, StatusCode>
where
    F: FnOnce(&Database) -> warbler_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = Arc::clone(db);
    tokio::task::spawn_blocking(move || f(&db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("Database error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

pub(crate) fn user_response(user: &UserRow) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        image_url: user.image_url.clone(),
    }
}

pub(crate) fn message_response(message: MessageRow) -> MessageResponse {
    MessageResponse {
        id: message.id,
        text: message.text,
        timestamp: message.timestamp,
        user_id: message.user_id,
    }
}
