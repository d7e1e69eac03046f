use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::{error, info, warn};

use warbler_db::{DbError, NewUser};
use warbler_types::api::{LoginForm, SignupForm};

use crate::middleware::{do_login, do_logout};
use crate::{AppState, db_call, found};

const MIN_PASSWORD_LEN: usize = 6;

pub async fn signup(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<SignupForm>,
) -> Result<Response, StatusCode> {
    // Validate input
    let username = form.username.trim().to_owned();
    if username.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    if !form.email.contains('@') {
        return Err(StatusCode::BAD_REQUEST);
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(StatusCode::BAD_REQUEST);
    }

    // Hashing and the insert both block
    let db = state.db.clone();
    let created = tokio::task::spawn_blocking(move || {
        let image_url = form.image_url.as_deref().filter(|url| !url.is_empty());
        let pending = NewUser::signup(
            Some(username.as_str()),
            Some(form.email.as_str()),
            &form.password,
            image_url,
        )?;
        db.create_user(&pending)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let user = match created {
        Ok(user) => user,
        Err(DbError::Integrity(msg)) => {
            warn!("Signup rejected: {}", msg);
            return Err(StatusCode::CONFLICT);
        }
        Err(e) => {
            error!("Signup failed: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    info!("New user {} ({})", user.username, user.id);
    Ok((do_login(jar, user.id), found("/")).into_response())
}

pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, StatusCode> {
    let user = db_call(&state.db, move |db| {
        db.authenticate(&form.username, &form.password)
    })
    .await?
    .ok_or(StatusCode::UNAUTHORIZED)?;

    info!("User {} logged in", user.id);
    Ok((do_login(jar, user.id), found("/")).into_response())
}

pub async fn logout(jar: SignedCookieJar) -> Response {
    (do_logout(jar), found("/login")).into_response()
}
