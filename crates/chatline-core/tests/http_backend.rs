use std::collections::HashMap;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chatline_core::{ApiError, ChatBackend, HttpBackend};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn healthy_backend() -> Router {
    Router::new()
        .route(
            "/api/health",
            get(|| async {
                Json(json!({
                    "status": "healthy",
                    "timestamp": "2024-05-01T10:00:00",
                    "database_connected": true,
                    "ai_available": false,
                }))
            }),
        )
        .route(
            "/api/history",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let limit: usize = params
                    .get("limit")
                    .and_then(|l| l.parse().ok())
                    .unwrap_or(10);
                let messages: Vec<Value> = (0..3)
                    .rev()
                    .take(limit)
                    .map(|i| {
                        json!({
                            "id": i,
                            "user_message": format!("question {}", i),
                            "ai_response": format!("answer {}", i),
                            "timestamp": "2024-05-01T10:00:00",
                        })
                    })
                    .collect();
                Json(json!({ "messages": messages }))
            }),
        )
        .route(
            "/api/chat",
            post(|Json(body): Json<Value>| async move {
                let message = body["message"].as_str().unwrap_or_default().to_string();
                if message.trim().is_empty() {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "error": "Message cannot be empty" })),
                    );
                }
                (
                    StatusCode::OK,
                    Json(json!({
                        "user_message": message,
                        "ai_response": format!("echo: {}", message),
                    })),
                )
            }),
        )
}

#[tokio::test]
async fn reads_health() {
    let backend = HttpBackend::new(&serve(healthy_backend()).await).unwrap();

    let health = backend.health().await.unwrap();
    assert!(health.database_connected);
    assert!(!health.ai_available);
}

#[tokio::test]
async fn passes_history_limit() {
    let backend = HttpBackend::new(&serve(healthy_backend()).await).unwrap();

    let messages = backend.history(2).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].user_message, "question 2");
    assert_eq!(messages[1].ai_response, "answer 1");
}

#[tokio::test]
async fn posts_chat_message() {
    let backend = HttpBackend::new(&serve(healthy_backend()).await).unwrap();

    let reply = backend.send_chat("hello there").await.unwrap();
    assert_eq!(reply, "echo: hello there");
}

#[tokio::test]
async fn surfaces_server_error_message() {
    let backend = HttpBackend::new(&serve(healthy_backend()).await).unwrap();

    match backend.send_chat(" ").await {
        Err(ApiError::Api { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message.as_deref(), Some("Message cannot be empty"));
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn error_status_without_message() {
    let router = Router::new().route(
        "/api/chat",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))) }),
    );
    let backend = HttpBackend::new(&serve(router).await).unwrap();

    match backend.send_chat("hi").await {
        Err(ApiError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, None);
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn unknown_route_is_an_error() {
    let backend = HttpBackend::new(&serve(Router::new()).await).unwrap();

    // axum's default 404 has an empty body, which cannot be decoded
    assert!(matches!(backend.health().await, Err(ApiError::Http(_))));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::new(&format!("http://{}", addr)).unwrap();
    assert!(matches!(backend.health().await, Err(ApiError::Http(_))));
}
