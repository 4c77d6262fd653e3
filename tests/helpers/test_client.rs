// Test HTTP Client Helpers
//
// Thin wrappers over the awc client of a `TestServer` for authenticated JSON
// calls.

use actix_test::TestServer;
use actix_web::http::{header, Method, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};

use super::test_server::{ADMIN_PASSWORD, ADMIN_USERNAME};

pub const DEFAULT_PASSWORD: &str = "password123";

/// Status and parsed body; `Value::Null` for empty bodies
pub async fn read_response<S>(mut response: awc::ClientResponse<S>) -> (StatusCode, Value)
where
    S: futures_util::Stream<Item = Result<actix_web::web::Bytes, awc::error::PayloadError>>
        + Unpin,
{
    let status = response.status();
    let body = response.body().await.expect("response body");
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON response body")
    };

    (status, value)
}

/// Send a request with an optional bearer token and JSON body
pub async fn call(
    srv: &TestServer,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<&Value>,
) -> (StatusCode, Value) {
    let mut request = srv.request(method, srv.url(path));
    if let Some(token) = token {
        request = request.insert_header((header::AUTHORIZATION, format!("Bearer {}", token)));
    }

    let response = match body {
        Some(body) => request.send_json(body).await,
        None => request.send().await,
    }
    .expect("request should reach the test server");

    read_response(response).await
}

pub async fn get_json(srv: &TestServer, path: &str, token: &str) -> (StatusCode, Value) {
    call(srv, Method::GET, path, Some(token), None).await
}

pub async fn post_json<T: Serialize>(
    srv: &TestServer,
    path: &str,
    token: Option<&str>,
    body: &T,
) -> (StatusCode, Value) {
    let body = serde_json::to_value(body).expect("serializable body");
    call(srv, Method::POST, path, token, Some(&body)).await
}

pub async fn register(srv: &TestServer, username: &str, password: &str) -> (StatusCode, Value) {
    post_json(
        srv,
        "/register",
        None,
        &json!({ "username": username, "password": password }),
    )
    .await
}

pub async fn login(srv: &TestServer, username: &str, password: &str) -> (StatusCode, Value) {
    post_json(
        srv,
        "/login",
        None,
        &json!({ "username": username, "password": password }),
    )
    .await
}

/// Session token of the bootstrap admin
pub async fn admin_token(srv: &TestServer) -> String {
    let (status, body) = login(srv, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK, "admin login failed: {}", body);
    body["token"].as_str().expect("token").to_string()
}

/// Register a `user`-role account and return its session token
pub async fn user_token(srv: &TestServer, username: &str) -> String {
    let (status, body) = register(srv, username, DEFAULT_PASSWORD).await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);

    let (status, body) = login(srv, username, DEFAULT_PASSWORD).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().expect("token").to_string()
}

/// Create an entry and return the stored representation
pub async fn create_entry(srv: &TestServer, token: &str, payload: &Value) -> Value {
    let (status, body) = post_json(srv, "/revenue-entries", Some(token), payload).await;
    assert_eq!(status, StatusCode::CREATED, "entry creation failed: {}", body);
    body
}
