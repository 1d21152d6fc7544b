use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::config::ServerConfig;
use crate::server::handlers::{health, page, session};
use crate::server::ws::handler::ws_handler;
use crate::state::AppState;

/// Creates the application router: the chat page, the event socket, a
/// health check and a JSON snapshot of the session.
pub fn router(state: Arc<AppState>) -> Router {
    let cors_layer = build_cors_layer(&state.config.server);
    Router::new()
        .route("/", get(page::index))
        .route("/health", get(health::health))
        .route("/api/state", get(session::get_state))
        .route("/ws", get(ws_handler))
        .with_state(state)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
}

fn build_cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins = allowed_origins(server)
        .into_iter()
        .filter_map(|origin| HeaderValue::from_str(&origin).ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
}

/// Configured origins, or the local addresses the server itself listens on.
pub(crate) fn allowed_origins(server: &ServerConfig) -> Vec<String> {
    let origins = server
        .cors_allowed_origins
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_string())
        .collect::<Vec<_>>();

    if origins.is_empty() {
        return default_local_origins(server.port);
    }

    origins
}

fn default_local_origins(port: u16) -> Vec<String> {
    vec![
        "http://localhost".to_string(),
        format!("http://localhost:{}", port),
        "http://127.0.0.1".to_string(),
        format!("http://127.0.0.1:{}", port),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AppConfig;
    use crate::test_support::ScriptedChain;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        AppState::with_chain(AppConfig::default(), Box::new(ScriptedChain::new()))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = get_json(router(test_state()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["title"], "Lecture Chat");
    }

    #[tokio::test]
    async fn state_endpoint_returns_greeting_snapshot() {
        let (status, body) = get_json(router(test_state()), "/api/state").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transcript"].as_array().unwrap().len(), 2);
        assert_eq!(body["transcript"][0]["style"], "user_message");
        assert_eq!(body["transcript"][1]["style"], "gpt_message");
        assert_eq!(body["selected_row"], 1);
        assert!(body["archive"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn state_endpoint_answers_while_a_message_is_in_flight() {
        let (chain, gate) = ScriptedChain::new().answer("Recursion.").gated();
        let state = AppState::with_chain(AppConfig::default(), Box::new(chain));

        let sending = tokio::spawn({
            let state = state.clone();
            async move { state.session.send_message("What is lecture 3 about?").await }
        });

        let body = tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                let (status, body) = get_json(router(state.clone()), "/api/state").await;
                assert_eq!(status, StatusCode::OK);
                if body["pending_message"] == "What is lecture 3 about?" {
                    return body;
                }
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("/api/state blocked by the in-flight chain call");
        assert_eq!(body["transcript"].as_array().unwrap().len(), 2);

        gate.notify_one();
        sending.await.unwrap();
        let (_, body) = get_json(router(state), "/api/state").await;
        assert_eq!(body["transcript"].as_array().unwrap().len(), 4);
        assert_eq!(body["transcript"][3]["text"], "Recursion.");
        assert_eq!(body["pending_message"], "");
    }

    #[tokio::test]
    async fn index_serves_the_chat_page() {
        let response = router(test_state())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("New Conversation"));
    }

    #[test]
    fn configured_origins_replace_defaults() {
        let server = ServerConfig {
            cors_allowed_origins: vec![" https://chat.example.edu ".to_string(), String::new()],
            ..ServerConfig::default()
        };
        assert_eq!(allowed_origins(&server), vec!["https://chat.example.edu".to_string()]);
        assert!(allowed_origins(&ServerConfig::default())
            .contains(&"http://127.0.0.1:5001".to_string()));
    }
}
