//! HTTP status endpoints.
//!
//! Small read-only surface for health checks and monitoring.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsResponse {
    /// Chats with a session in memory
    pub sessions: usize,
    /// Chats with a word currently hidden
    pub active_rounds: usize,
    /// Size of the word list
    pub words: usize,
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}

/// GET /api/stats
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        sessions: state.sessions.len().await,
        active_rounds: state.sessions.active_rounds().await,
        words: state.controller.word_count(),
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/stats", get(stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::InboundEvent;
    use crate::text::{Locale, Messages};
    use crate::types::{Actor, GameConfig};
    use crate::words::WordBank;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(
            GameConfig::default(),
            Arc::new(WordBank::new(["apple", "river", "cloud"]).unwrap()),
            Messages::new(Locale::En),
        ))
    }

    #[tokio::test]
    async fn test_healthz() {
        let response = router(state())
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_stats_counts_sessions() {
        let state = state();
        crate::bot::handle_event(
            InboundEvent::RevealRequest {
                chat_id: -1,
                actor: Actor::new(1, "Alice"),
            },
            &state,
        )
        .await;
        state.sessions.get_or_create(-2).await;

        let response = router(state)
            .oneshot(Request::builder().uri("/api/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["sessions"], 2);
        assert_eq!(json["active_rounds"], 1);
        assert_eq!(json["words"], 3);
    }
}
