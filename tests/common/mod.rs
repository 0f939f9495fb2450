#![allow(dead_code)]

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{header::AUTHORIZATION, StatusCode},
    test,
};
use serde_json::{json, Value};
use taskvault::{auth::AuthResponse, db, models::TaskResponse, AppState, Config};

pub const SECRET: &str = "integration_test_secret";

/// Fresh in-memory database and the cheapest bcrypt cost.
pub async fn test_state() -> AppState {
    let config = Config::from_source(|key| match key {
        "SECRET_KEY" => Some(SECRET.to_string()),
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "BCRYPT_COST" => Some("4".to_string()),
        _ => None,
    })
    .expect("test config");
    let pool = db::connect(&config.database_url)
        .await
        .expect("Failed to open in-memory database");
    AppState::new(pool, config)
}

pub async fn send(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    req: test::TestRequest,
) -> (StatusCode, Value) {
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

pub fn authed(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header((AUTHORIZATION, token.to_string()))
}

pub async fn register(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    username: &str,
    password: &str,
    role: &str,
) -> AuthResponse {
    let (status, body) = send(
        app,
        test::TestRequest::post().uri("/register").set_json(json!({
            "username": username,
            "password": password,
            "role": role
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    serde_json::from_value(body).expect("Failed to parse registration response")
}

pub async fn create_task(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    token: &str,
    payload: Value,
) -> TaskResponse {
    let (status, body) = send(
        app,
        authed(test::TestRequest::post().uri("/tasks"), token).set_json(payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create task failed: {}", body);
    serde_json::from_value(body).expect("Failed to parse task response")
}
