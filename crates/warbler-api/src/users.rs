use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::{info, warn};

use warbler_types::api::{ProfileResponse, UserResponse, UserSearchQuery};

use crate::middleware::{CurrentUser, do_logout};
use crate::{AppState, db_call, found, message_response, user_response};

/// GET /users?q=
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserSearchQuery>,
) -> Result<Json<Vec<UserResponse>>, StatusCode> {
    let users = db_call(&state.db, move |db| db.search_users(query.q.as_deref())).await?;
    Ok(Json(users.iter().map(user_response).collect()))
}

/// GET /users/{user_id}
pub async fn show_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, StatusCode> {
    let profile = db_call(&state.db, move |db| {
        let Some(user) = db.get_user(user_id)? else {
            return Ok(None);
        };
        let messages = db.messages_for_user(user_id)?;
        let following_count = db.following(user_id)?.len();
        let followers_count = db.followers(user_id)?.len();
        let likes_count = db.likes_for_user(user_id)?.len();

        Ok(Some(ProfileResponse {
            user: user_response(&user),
            messages: messages.into_iter().map(message_response).collect(),
            following_count,
            followers_count,
            likes_count,
        }))
    })
    .await?
    .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(profile))
}

/// GET /users/{user_id}/following
pub async fn show_following(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Extension(CurrentUser(viewer)): Extension<CurrentUser>,
) -> Result<Response, StatusCode> {
    if viewer.is_none() {
        return Ok(found("/"));
    }

    let users = db_call(&state.db, move |db| match db.get_user(user_id)? {
        Some(_) => db.following(user_id).map(Some),
        None => Ok(None),
    })
    .await?
    .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(users.iter().map(user_response).collect::<Vec<_>>()).into_response())
}

/// GET /users/{user_id}/followers
pub async fn show_followers(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Extension(CurrentUser(viewer)): Extension<CurrentUser>,
) -> Result<Response, StatusCode> {
    if viewer.is_none() {
        return Ok(found("/"));
    }

    let users = db_call(&state.db, move |db| match db.get_user(user_id)? {
        Some(_) => db.followers(user_id).map(Some),
        None => Ok(None),
    })
    .await?
    .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(users.iter().map(user_response).collect::<Vec<_>>()).into_response())
}

/// POST /users/follow/{follow_id}
///
/// Following someone already followed is a no-op.
pub async fn add_follow(
    State(state): State<AppState>,
    Path(follow_id): Path<i64>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Response, StatusCode> {
    let Some(user) = user else {
        return Ok(found("/"));
    };
    if follow_id == user.id {
        return Err(StatusCode::BAD_REQUEST);
    }

    let me = user.id;
    let followed = db_call(&state.db, move |db| {
        if db.get_user(follow_id)?.is_none() {
            return Ok(false);
        }
        db.follow_if_absent(me, follow_id)?;
        Ok(true)
    })
    .await?;

    if !followed {
        return Err(StatusCode::NOT_FOUND);
    }

    info!("User {} follows {}", me, follow_id);
    Ok(found(format!("/users/{}/following", me)))
}

/// POST /users/stop-following/{follow_id}
pub async fn stop_following(
    State(state): State<AppState>,
    Path(follow_id): Path<i64>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Response, StatusCode> {
    let Some(user) = user else {
        return Ok(found("/"));
    };

    let me = user.id;
    if db_call(&state.db, move |db| db.unfollow(me, follow_id)).await? {
        info!("User {} stopped following {}", me, follow_id);
    }

    Ok(found(format!("/users/{}/following", me)))
}

/// POST /users/delete
///
/// Removes the account and everything hanging off it.
pub async fn delete_user(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Response, StatusCode> {
    let Some(user) = user else {
        warn!("Anonymous attempt to delete an account");
        return Ok(found("/"));
    };

    let id = user.id;
    db_call(&state.db, move |db| db.delete_user(id)).await?;

    info!("User {} deleted their account", id);
    Ok((do_logout(jar), found("/signup")).into_response())
}
