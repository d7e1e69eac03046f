use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use warbler_db::NewMessage;
use warbler_types::api::{MessageForm, MessageResponse};

use crate::middleware::CurrentUser;
use crate::{AppState, db_call, found, message_response};

const MAX_MESSAGE_LEN: usize = 140;
const TIMELINE_LIMIT: u32 = 100;

/// GET /
///
/// The logged-in user's timeline. Empty for anonymous visitors.
pub async fn home(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<MessageResponse>>, StatusCode> {
    let Some(user) = user else {
        return Ok(Json(Vec::new()));
    };

    let rows = db_call(&state.db, move |db| db.timeline(user.id, TIMELINE_LIMIT)).await?;
    Ok(Json(rows.into_iter().map(message_response).collect()))
}

/// POST /messages/new
pub async fn create_message(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<MessageForm>,
) -> Result<Response, StatusCode> {
    let Some(user) = user else {
        warn!("Anonymous attempt to post a message");
        return Ok(found("/"));
    };

    let len = form.text.chars().count();
    if form.text.trim().is_empty() || len > MAX_MESSAGE_LEN {
        return Err(StatusCode::BAD_REQUEST);
    }

    let user_id = user.id;
    let message = db_call(&state.db, move |db| {
        db.insert_message(&NewMessage::new(form.text, user_id))
    })
    .await?;

    info!("User {} posted message {}", user_id, message.id);
    Ok(found(format!("/users/{}", user_id)))
}

/// GET /messages/{message_id}
pub async fn show_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> Result<impl IntoResponse, StatusCode> {
    let message = db_call(&state.db, move |db| db.get_message(message_id))
        .await?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(message_response(message)))
}

/// POST /messages/{message_id}/delete
///
/// Only the owner may delete. Anyone else is redirected home and the row is
/// left alone.
pub async fn delete_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Response, StatusCode> {
    let Some(user) = user else {
        warn!("Anonymous attempt to delete message {}", message_id);
        return Ok(found("/"));
    };

    let message = db_call(&state.db, move |db| db.get_message(message_id))
        .await?
        .ok_or(StatusCode::NOT_FOUND)?;

    if message.user_id != user.id {
        warn!(
            "User {} tried to delete message {} owned by {}",
            user.id, message_id, message.user_id
        );
        return Ok(found("/"));
    }

    db_call(&state.db, move |db| db.delete_message(message_id)).await?;

    info!("User {} deleted message {}", user.id, message_id);
    Ok(found(format!("/users/{}", user.id)))
}
