use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use privy::{
    AppState,
    auth::{Blacklist, TokenIssuer, TokenKind},
    db::MemoryStore,
};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app_with_tokens() -> (Router, TokenIssuer) {
    let tokens = TokenIssuer::new(b"test-secret", Arc::new(Blacklist::default()));
    let app = privy::app(AppState {
        store: Arc::new(MemoryStore::default()),
        tokens: tokens.clone(),
    });
    (app, tokens)
}

fn test_app() -> Router {
    app_with_tokens().0
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

struct Account {
    token: String,
    refresh_token: String,
}

async fn sign_up(app: &Router, username: &str) -> Account {
    let (status, created) = call(
        app,
        Method::PUT,
        "/manageuser",
        None,
        Some(json!({ "username": username, "pass": "hunter22", "email": format!("{username}@example.com") })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");

    let (status, login) = call(
        app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "username": username, "pass": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{login}");
    assert_eq!(login["username"], json!(username));

    Account {
        token: login["token"].as_str().unwrap().to_owned(),
        refresh_token: login["refreshToken"].as_str().unwrap().to_owned(),
    }
}

async fn new_post(app: &Router, author: &Account, restricted_to: &str) -> String {
    let (status, post) = call(
        app,
        Method::POST,
        "/posts",
        Some(&author.token),
        Some(json!({ "title": "hello", "content": "first", "restrictedTo": restricted_to })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{post}");
    post["_id"].as_str().unwrap().to_owned()
}

fn code(body: &Value) -> &str {
    body["err"]["code"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn account_errors_use_their_codes() {
    let app = test_app();
    sign_up(&app, "anna").await;

    let (status, body) = call(
        &app,
        Method::PUT,
        "/manageuser",
        None,
        Some(json!({ "username": "anna", "pass": "x", "email": "other@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(code(&body), "USERNAME_OR_EMAIL_ALREADY_EXISTS");

    let (status, body) = call(
        &app,
        Method::PUT,
        "/manageuser",
        None,
        Some(json!({ "username": "abc", "pass": "x", "email": "abc@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code(&body), "INVALID_USERNAME");

    let (status, body) = call(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "username": "anna", "pass": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), "INCORRECT_PASSWORD");

    let (status, body) = call(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "username": "nobody", "pass": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(code(&body), "USERNAME_NOT_FOUND");
}

#[tokio::test]
async fn requests_need_an_access_token() {
    let app = test_app();
    let anna = sign_up(&app, "anna").await;

    let (status, body) = call(&app, Method::GET, "/posts/post-x", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), "INVALID_TOKEN");

    let (status, _) = call(&app, Method::GET, "/posts/post-x", Some(&anna.refresh_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(&app, Method::GET, "/posts/post-x", Some(&anna.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn friends_only_posts_need_a_friendship() {
    let app = test_app();
    let anna = sign_up(&app, "anna").await;
    let bobby = sign_up(&app, "bobby").await;
    let carol = sign_up(&app, "carol").await;
    let post = new_post(&app, &anna, "friends").await;
    let uri = format!("/posts/{post}");

    let (status, body) = call(&app, Method::GET, &uri, Some(&bobby.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(code(&body), "FORBIDDEN");

    let (status, body) = call(&app, Method::POST, "/u/anna/friend", Some(&bobby.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("requested"));

    let (status, _) = call(&app, Method::GET, &uri, Some(&bobby.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = call(&app, Method::POST, "/u/bobby/friend", Some(&anna.token), None).await;
    assert_eq!(body["status"], json!("friends"));

    let (status, body) = call(&app, Method::GET, &uri, Some(&bobby.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], json!("hello"));

    let (status, _) = call(&app, Method::GET, &uri, Some(&carol.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, Method::POST, "/u/anna/friend", Some(&anna.token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code(&body), "INVALID_USERNAME");
}

#[tokio::test]
async fn private_users_hide_unrestricted_profiles() {
    let app = test_app();
    let anna = sign_up(&app, "anna").await;
    let bobby = sign_up(&app, "bobby").await;

    let (_, page) = call(&app, Method::GET, "/u/anna", Some(&bobby.token), None).await;
    assert_eq!(page["profile"]["name"], json!("anna"));

    let (status, _) = call(
        &app,
        Method::PATCH,
        "/manageuser",
        Some(&anna.token),
        Some(json!({ "private": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, page) = call(&app, Method::GET, "/u/anna", Some(&bobby.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["username"], json!("anna"));
    assert!(page.get("profile").is_none());

    let (_, page) = call(&app, Method::GET, "/u/anna", Some(&anna.token), None).await;
    assert!(page.get("profile").is_some());

    let (status, _) = call(
        &app,
        Method::PATCH,
        "/profile",
        Some(&anna.token),
        Some(json!({ "restrictedTo": "all", "bio": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, page) = call(&app, Method::GET, "/u/anna", Some(&bobby.token), None).await;
    assert_eq!(page["profile"]["bio"], json!("hi"));

    let (status, body) = call(&app, Method::PATCH, "/manageuser", Some(&anna.token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code(&body), "NO_CHANGES");
}

#[tokio::test]
async fn nested_content_is_redacted_per_requester() {
    let app = test_app();
    let anna = sign_up(&app, "anna").await;
    let bobby = sign_up(&app, "bobby").await;
    let post = new_post(&app, &anna, "all").await;
    let uri = format!("/posts/{post}");

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("{uri}/comments"),
        Some(&bobby.token),
        Some(json!({ "content": "just for me", "restrictedTo": "owner" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, seen) = call(&app, Method::GET, &uri, Some(&anna.token), None).await;
    assert_eq!(seen["comments"], json!([]));
    let (_, seen) = call(&app, Method::GET, &uri, Some(&bobby.token), None).await;
    assert_eq!(seen["comments"].as_array().unwrap().len(), 1);

    let (status, _) = call(
        &app,
        Method::PATCH,
        &uri,
        Some(&anna.token),
        Some(json!({ "content": "draft", "editRestrictedTo": "owner" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, seen) = call(&app, Method::GET, &uri, Some(&bobby.token), None).await;
    assert_eq!(seen["content"].as_array().unwrap().len(), 1);
    let (_, seen) = call(&app, Method::GET, &uri, Some(&anna.token), None).await;
    assert_eq!(seen["content"].as_array().unwrap().len(), 2);

    let (status, body) = call(
        &app,
        Method::PATCH,
        &uri,
        Some(&anna.token),
        Some(json!({ "content": "draft" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code(&body), "NO_CHANGES");

    let (status, _) = call(
        &app,
        Method::PATCH,
        &uri,
        Some(&bobby.token),
        Some(json!({ "restrictedTo": "owner" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, liked) = call(&app, Method::POST, &format!("{uri}/like"), Some(&bobby.token), None).await;
    assert_eq!(liked["likes"], json!(1));
    let (status, _) = call(&app, Method::POST, &format!("{uri}/like"), Some(&bobby.token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_revokes_the_refresh_token() {
    let app = test_app();
    let anna = sign_up(&app, "anna").await;
    let refresh = json!({ "refreshToken": anna.refresh_token });

    let (status, pair) = call(&app, Method::POST, "/refresh", None, Some(refresh.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(pair["token"].is_string());

    let (status, _) = call(&app, Method::DELETE, "/logout", None, Some(refresh.clone())).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, Method::POST, "/refresh", None, Some(refresh)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), "INVALID_REFRESH_TOKEN");
}

#[tokio::test]
async fn dms_are_for_their_participants() {
    let app = test_app();
    let anna = sign_up(&app, "anna").await;
    let bobby = sign_up(&app, "bobby").await;
    let carol = sign_up(&app, "carol").await;

    let (status, dm) = call(
        &app,
        Method::POST,
        "/dms",
        Some(&anna.token),
        Some(json!({ "to": "bobby", "content": "psst" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(dm["read"], json!(false));
    let uri = format!("/dms/{}", dm["_id"].as_str().unwrap());

    let (status, _) = call(&app, Method::GET, &uri, Some(&carol.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, seen) = call(&app, Method::GET, &uri, Some(&anna.token), None).await;
    assert_eq!(seen["read"], json!(false));

    let (_, seen) = call(&app, Method::GET, &uri, Some(&bobby.token), None).await;
    assert_eq!(seen["read"], json!(true));
    assert_eq!(seen["content"][0]["value"], json!("psst"));

    let (_, seen) = call(&app, Method::GET, &uri, Some(&anna.token), None).await;
    assert_eq!(seen["read"], json!(true));

    let (status, expiring) = call(
        &app,
        Method::POST,
        "/dms",
        Some(&anna.token),
        Some(json!({ "to": "bobby", "content": "soon gone", "expiresInSecs": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/dms/{}", expiring["_id"].as_str().unwrap());

    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    let (status, _) = call(&app, Method::GET, &uri, Some(&bobby.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dm_expiry_must_be_positive_and_in_range() {
    let app = test_app();
    let anna = sign_up(&app, "anna").await;
    sign_up(&app, "bobby").await;

    for secs in [json!(-1), json!(0), json!(9_000_000_000_000_i64), json!(i64::MAX)] {
        let (status, body) = call(
            &app,
            Method::POST,
            "/dms",
            Some(&anna.token),
            Some(json!({ "to": "bobby", "content": "hi", "expiresInSecs": secs })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "expiresInSecs {secs}");
        assert_eq!(code(&body), "INVALID_EXPIRY");
    }
}

#[tokio::test]
async fn refreshed_tokens_carry_the_current_username() {
    let (app, tokens) = app_with_tokens();
    let anna = sign_up(&app, "anna").await;

    let (status, _) = call(
        &app,
        Method::PATCH,
        "/manageuser",
        Some(&anna.token),
        Some(json!({ "username": "annabel" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let refresh = json!({ "refreshToken": anna.refresh_token });
    let (status, pair) = call(&app, Method::POST, "/refresh", None, Some(refresh.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let access = pair["token"].as_str().unwrap();
    let claims = tokens.verify(access, TokenKind::Access).await.unwrap();
    assert_eq!(claims.username, "annabel");

    let (status, _) = call(
        &app,
        Method::DELETE,
        "/manageuser",
        None,
        Some(json!({ "username": "annabel", "pass": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, Method::POST, "/refresh", None, Some(refresh)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), "INVALID_REFRESH_TOKEN");
}

#[tokio::test]
async fn deleted_accounts_cannot_log_in() {
    let app = test_app();
    sign_up(&app, "anna").await;

    let (status, _) = call(
        &app,
        Method::DELETE,
        "/manageuser",
        None,
        Some(json!({ "username": "anna", "pass": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(
        &app,
        Method::DELETE,
        "/manageuser",
        None,
        Some(json!({ "username": "anna", "pass": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "username": "anna", "pass": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
