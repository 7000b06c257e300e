//! Integration tests: build the router over in-memory stores and drive it
//! with `oneshot` requests.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use dbo_api::{AppState, config::ApiConfig};
use dbo_core::store::Stores;
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_config() -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        database_url: String::new(),
        jwt_secret: "test-secret".into(),
    }
}

/// Router over empty in-memory stores.
fn empty_app() -> Router {
    dbo_api::router(AppState::new(Stores::in_memory(), test_config()))
}

/// Router whose first registered credential is the admin `root` / `toor`.
async fn app() -> Router {
    let app = empty_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({ "username": "root", "password": "toor", "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin bootstrap failed: {body}");
    app
}

/// Register a customer and return its token and account id.
async fn customer(app: &Router, username: &str) -> (String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({ "username": username, "password": "p1", "role": "customer" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register {username} failed: {body}");
    let account_id = body["data"]["customerId"]
        .as_str()
        .expect("account link")
        .to_string();
    (login(app, username, "p1").await, account_id)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("response");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    assert_eq!(body["message"], "success login");
    body["data"]["token"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn health_is_public() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/order", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "missing authorization");

    let (status, _) = send(&app, Method::GET, "/api/order", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_login_is_unauthorized() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "root", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "username or password invalid");

    let (status, body) = send(&app, Method::POST, "/api/login", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("mandatory field is missing")
    );
}

#[tokio::test]
async fn customer_flow_register_login_and_order() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({ "username": "alice", "password": "p1", "role": "customer" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["id"], "alice");
    assert!(body["data"].get("passwordHash").is_none());
    let account_id = body["data"]["customerId"]
        .as_str()
        .expect("account link")
        .to_string();

    let token = login(&app, "alice", "p1").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/order",
        Some(&token),
        Some(json!({ "customerId": account_id, "name": "widget", "qty": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "success create data");

    let (status, body) = send(&app, Method::GET, "/api/order?limit=10", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalPage"], 1);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["data"][0]["name"], "widget");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/account/{account_id}"),
        Some(&token),
        Some(json!({ "name": "Alice Ltd" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/api/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "this user doesn't have access to this endpoint");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/account/{account_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn customer_cannot_rename_another_account() {
    let app = app().await;
    let admin = login(&app, "root", "toor").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/account",
        Some(&admin),
        Some(json!({ "name": "other" })),
    )
    .await;
    let other = body["id"].as_str().expect("account id").to_string();

    send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({ "username": "bob", "password": "p1", "role": "customer" })),
    )
    .await;
    let token = login(&app, "bob", "p1").await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/account/{other}"),
        Some(&token),
        Some(json!({ "name": "mine now" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_refuses_admin_role() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({ "username": "mallory", "password": "p1", "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn admin_errors_map_to_status_codes() {
    let app = app().await;
    let admin = login(&app, "root", "toor").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/order",
        Some(&admin),
        Some(json!({ "customerId": "ghost", "name": "widget", "qty": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "no account found with id ghost");

    let (status, _) = send(&app, Method::GET, "/api/account/ghost", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/account?limit=10&page=2",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "page 2 greater than totalPage 1");

    let (status, _) = send(&app, Method::GET, "/api/account?limit=abc", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/account")
                .header(header::AUTHORIZATION, format!("Bearer {admin}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_manages_users() {
    let app = app().await;
    let admin = login(&app, "root", "toor").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/user",
        Some(&admin),
        Some(json!({ "username": "ops", "password": "p1", "role": "warehouse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = send(&app, Method::GET, "/api/user?keyword=OP", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["role"], "warehouse");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/user",
        Some(&admin),
        Some(json!({ "username": "ops", "password": "p1", "role": "warehouse" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "username ops already exists");

    let (status, body) = send(&app, Method::DELETE, "/api/user/ops", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "success delete data");

    let (status, _) = send(&app, Method::GET, "/api/user/ops", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn first_registration_bootstraps_the_admin() {
    let app = empty_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({ "username": "root", "password": "toor", "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["data"].get("customerId").is_none());

    let admin = login(&app, "root", "toor").await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/account",
        Some(&admin),
        Some(json!({ "name": "acme" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, "/api/user", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({ "username": "second", "password": "p1", "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn users_named_after_resources_stay_admin_only() {
    let app = app().await;
    customer(&app, "orders").await;
    customer(&app, "account").await;
    let (mallory, _) = customer(&app, "mallory").await;

    for id in ["orders", "account"] {
        let uri = format!("/api/user/{id}");
        let (status, body) = send(&app, Method::GET, &uri, Some(&mallory), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "GET {uri}: {body}");

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&mallory), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "DELETE {uri}");

        let (status, _) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&mallory),
            Some(json!({ "password": "x", "role": "customer" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "PUT {uri}");
    }

    let admin = login(&app, "root", "toor").await;
    let (status, body) = send(&app, Method::GET, "/api/user/orders", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "orders");
}

#[tokio::test]
async fn admin_updates_a_user_password() {
    let app = app().await;
    let (_, account_id) = customer(&app, "alice").await;
    let admin = login(&app, "root", "toor").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/user/alice",
        Some(&admin),
        Some(json!({ "password": "p2", "role": "customer", "customerId": account_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "success update data");
    assert_eq!(body["id"], "alice");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "alice", "password": "p1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    login(&app, "alice", "p2").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/user/alice",
        Some(&admin),
        Some(json!({ "password": "p3", "role": "customer", "customerId": "ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/user/alice",
        Some(&admin),
        Some(json!({ "role": "customer" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn customer_cannot_update_own_user_record() {
    let app = app().await;
    let (token, account_id) = customer(&app, "alice").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/user/alice",
        Some(&token),
        Some(json!({ "password": "p2", "role": "admin", "customerId": account_id })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "this user doesn't have access to this endpoint");
    login(&app, "alice", "p1").await;
}

#[tokio::test]
async fn huge_limit_is_a_single_page() {
    let app = app().await;
    let admin = login(&app, "root", "toor").await;
    for name in ["a", "b"] {
        send(
            &app,
            Method::POST,
            "/api/account",
            Some(&admin),
            Some(json!({ "name": name })),
        )
        .await;
    }

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/account?limit=9223372036854775807",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["totalPage"], 1);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}
