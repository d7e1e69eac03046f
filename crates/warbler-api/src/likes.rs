use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use crate::middleware::CurrentUser;
use crate::{AppState, db_call, found, message_response};

/// GET /users/{user_id}/likes
pub async fn show_likes(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Extension(CurrentUser(viewer)): Extension<CurrentUser>,
) -> Result<Response, StatusCode> {
    if viewer.is_none() {
        return Ok(found("/"));
    }

    let messages = db_call(&state.db, move |db| match db.get_user(user_id)? {
        Some(_) => db.liked_messages(user_id).map(Some),
        None => Ok(None),
    })
    .await?
    .ok_or(StatusCode::NOT_FOUND)?;

    let body: Vec<_> = messages.into_iter().map(message_response).collect();
    Ok(Json(body).into_response())
}

/// POST /users/add_like/{message_id}
///
/// Toggles. Liking your own message is forbidden.
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Response, StatusCode> {
    let Some(user) = user else {
        return Ok(found("/"));
    };

    let message = db_call(&state.db, move |db| db.get_message(message_id))
        .await?
        .ok_or(StatusCode::NOT_FOUND)?;

    if message.user_id == user.id {
        warn!("User {} tried to like their own message {}", user.id, message_id);
        return Err(StatusCode::FORBIDDEN);
    }

    let user_id = user.id;
    let added = db_call(&state.db, move |db| db.toggle_like(user_id, message_id)).await?;

    info!(
        "User {} {} message {}",
        user_id,
        if added { "liked" } else { "unliked" },
        message_id
    );
    Ok(found("/"))
}
