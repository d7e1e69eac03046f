mod common;

use axum::http::StatusCode;
use warbler_db::{DbError, NewMessage};

use common::*;

#[tokio::test]
async fn add_message() {
    let state = test_state();
    let testuser = signup(&state, "testuser", "testuser");
    let cookie = session_cookie(&state.key, testuser.id);

    let resp = send(&state, post_form("/messages/new", "text=Hello", Some(&cookie))).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/users/{}", testuser.id));

    let msg = state.db.one_message().unwrap();
    assert_eq!(msg.text, "Hello");
    assert_eq!(msg.user_id, testuser.id);
}

#[tokio::test]
async fn add_message_without_session() {
    let state = test_state();
    signup(&state, "testuser", "testuser");

    let resp = send(&state, post_form("/messages/new", "text=Hello", None)).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert!(matches!(state.db.one_message(), Err(DbError::NotFound)));
}

#[tokio::test]
async fn add_message_with_stale_session() {
    let state = test_state();
    let cookie = session_cookie(&state.key, 12345);

    let resp = send(&state, post_form("/messages/new", "text=Hello", Some(&cookie))).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(state.db.message_count().unwrap(), 0);
}

#[tokio::test]
async fn add_message_with_forged_session() {
    let state = test_state();
    let testuser = signup(&state, "testuser", "testuser");
    let cookie = format!("curr_user={}", testuser.id);

    let resp = send(&state, post_form("/messages/new", "text=Hello", Some(&cookie))).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert_eq!(state.db.message_count().unwrap(), 0);
}

#[tokio::test]
async fn add_message_rejects_bad_text() {
    let state = test_state();
    let testuser = signup(&state, "testuser", "testuser");
    let cookie = session_cookie(&state.key, testuser.id);

    let resp = send(&state, post_form("/messages/new", "text=", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let long = format!("text={}", "a".repeat(141));
    let resp = send(&state, post_form("/messages/new", &long, Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(state.db.message_count().unwrap(), 0);
}

#[tokio::test]
async fn delete_message_logged_in() {
    let state = test_state();
    let testuser = signup(&state, "testuser", "testuser");
    let cookie = session_cookie(&state.key, testuser.id);
    state
        .db
        .insert_message(&NewMessage {
            id: Some(999),
            ..NewMessage::new("TEST TEST TEST", testuser.id)
        })
        .unwrap();

    let resp = send(&state, post_form("/messages/999/delete", "", Some(&cookie))).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(state.db.get_message(999).unwrap().is_none());
}

#[tokio::test]
async fn delete_message_logged_out() {
    let state = test_state();
    let testuser = signup(&state, "testuser", "testuser");
    state
        .db
        .insert_message(&NewMessage {
            id: Some(999),
            ..NewMessage::new("TEST TEST TEST", testuser.id)
        })
        .unwrap();

    let resp = send(&state, post_form("/messages/999/delete", "", None)).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    let msg = state.db.get_message(999).unwrap().unwrap();
    assert_eq!(msg.text, "TEST TEST TEST");
}

#[tokio::test]
async fn delete_message_of_another_user() {
    let state = test_state();
    let owner = signup(&state, "owner", "password");
    let intruder = signup(&state, "intruder", "password");
    let cookie = session_cookie(&state.key, intruder.id);
    state
        .db
        .insert_message(&NewMessage {
            id: Some(999),
            ..NewMessage::new("mine", owner.id)
        })
        .unwrap();

    let resp = send(&state, post_form("/messages/999/delete", "", Some(&cookie))).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    let msg = state.db.get_message(999).unwrap().unwrap();
    assert_eq!(msg.text, "mine");
}

#[tokio::test]
async fn delete_missing_message_is_not_found() {
    let state = test_state();
    let testuser = signup(&state, "testuser", "testuser");
    let cookie = session_cookie(&state.key, testuser.id);

    let resp = send(&state, post_form("/messages/999/delete", "", Some(&cookie))).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn show_message() {
    let state = test_state();
    let testuser = signup(&state, "testuser", "testuser");
    let msg = state
        .db
        .insert_message(&NewMessage::new("visible", testuser.id))
        .unwrap();

    let resp = send(&state, get(&format!("/messages/{}", msg.id), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json(resp).await;
    assert_eq!(body["text"], "visible");
    assert_eq!(body["user_id"], testuser.id);

    let resp = send(&state, get("/messages/4242", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn home_timeline() {
    let state = test_state();
    let me = signup(&state, "me", "password");
    let friend = signup(&state, "friend", "password");
    let stranger = signup(&state, "stranger", "password");
    state.db.follow(me.id, friend.id).unwrap();
    state.db.insert_message(&NewMessage::new("mine", me.id)).unwrap();
    state.db.insert_message(&NewMessage::new("friend's", friend.id)).unwrap();
    state.db.insert_message(&NewMessage::new("stranger's", stranger.id)).unwrap();

    let anon = json(send(&state, get("/", None)).await).await;
    assert_eq!(anon, serde_json::json!([]));

    let cookie = session_cookie(&state.key, me.id);
    let feed = json(send(&state, get("/", Some(&cookie))).await).await;
    let texts: Vec<&str> = feed
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts.len(), 2);
    assert!(texts.contains(&"mine"));
    assert!(texts.contains(&"friend's"));
}
