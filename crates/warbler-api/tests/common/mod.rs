#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
    response::IntoResponse,
};
use axum_extra::extract::cookie::{Cookie, Key, SignedCookieJar};
use http_body_util::BodyExt;
use tower::ServiceExt;

use warbler_api::middleware::CURR_USER_KEY;
use warbler_api::{AppState, app};
use warbler_db::{Database, NewUser, UserRow};

pub fn test_state() -> AppState {
    AppState::new(Database::open_in_memory().unwrap(), Key::generate())
}

pub fn signup(state: &AppState, username: &str, password: &str) -> UserRow {
    let email = format!("{username}@test.com");
    let pending = NewUser::signup(Some(username), Some(email.as_str()), password, None).unwrap();
    state.db.create_user(&pending).unwrap()
}

/// `Cookie` header value carrying a signed session for `user_id`, as the
/// login route would have set it.
pub fn session_cookie(key: &Key, user_id: i64) -> String {
    let jar = SignedCookieJar::new(key.clone())
        .add(Cookie::new(CURR_USER_KEY, user_id.to_string()));
    let response = jar.into_response();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(state: &AppState, req: Request<Body>) -> Response<Body> {
    let router: Router = app(state.clone());
    router.oneshot(req).await.unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

pub async fn json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
