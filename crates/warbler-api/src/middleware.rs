use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};

use warbler_db::UserRow;

use crate::{AppState, db_call};

/// Session cookie holding the logged-in user's id.
pub const CURR_USER_KEY: &str = "curr_user";

/// The user behind the request's session, if any. Inserted into request
/// extensions by [`load_current_user`] on every route.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<UserRow>);

/// Resolve the session cookie to a user. A missing, tampered or stale cookie
/// leaves the request anonymous.
pub async fn load_current_user(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let user = match session_user_id(&jar) {
        Some(id) => db_call(&state.db, move |db| db.get_user(id)).await?,
        None => None,
    };

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

pub fn session_user_id(jar: &SignedCookieJar) -> Option<i64> {
    jar.get(CURR_USER_KEY)
        .and_then(|cookie| cookie.value().parse().ok())
}

pub fn do_login(jar: SignedCookieJar, user_id: i64) -> SignedCookieJar {
    jar.add(
        Cookie::build((CURR_USER_KEY, user_id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

pub fn do_logout(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build(CURR_USER_KEY).path("/"))
}
