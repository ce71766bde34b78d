//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - REST-ish API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers); tighten for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/rules", get(http::http_get_rules))
        .route("/api/v1/pool", get(http::http_get_pool))
        .route("/api/v1/games", post(http::http_post_game))
        .route(
            "/api/v1/games/:id",
            get(http::http_get_game).delete(http::http_delete_game),
        )
        .route("/api/v1/games/:id/answer", post(http::http_post_answer))
        .route("/api/v1/games/:id/replay", post(http::http_post_replay))
        .route("/api/v1/highscore", get(http::http_get_high_score))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::TriviaConfig;
    use crate::seeds::seed_countries;

    fn app(countries: Vec<crate::domain::Country>) -> Router {
        let cfg = TriviaConfig { feedback_delay_ms: 50, ..TriviaConfig::default() };
        build_router(Arc::new(AppState::new(cfg, countries)))
    }

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, json)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_loaded_countries() {
        let (status, json) = call(app(seed_countries()), Request::get("/api/v1/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
        assert_eq!(json["countries"], 24);
    }

    #[tokio::test]
    async fn rules_list_scoring_constants_and_filters() {
        let (status, json) = call(app(seed_countries()), Request::get("/api/v1/rules").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["perfectScore"], 100);
        assert_eq!(json["feedbackDelayMs"], 50);
        assert_eq!(json["regions"].as_array().unwrap().len(), 6);
        assert_eq!(json["difficulties"].as_array().unwrap().len(), 4);
        assert_eq!(json["difficulties"][0]["minPopulation"], 20_000_000);
    }

    #[tokio::test]
    async fn start_game_without_data_is_a_conflict() {
        let (status, json) = call(app(Vec::new()), post_json("/api/v1/games", r#"{"region":"World","difficulty":"hard"}"#)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], "insufficient_pool");
        assert_eq!(json["available"], 0);
    }

    #[tokio::test]
    async fn empty_body_starts_default_game() {
        let req = Request::post("/api/v1/games").body(Body::empty()).unwrap();
        let (status, game) = call(app(seed_countries()), req).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(game["region"], "World");
        assert_eq!(game["difficulty"], "hard");
    }

    #[tokio::test]
    async fn mistyped_filters_are_rejected() {
        for body in [r#"{"difficulty":5}"#, r#"{"region":"#] {
            let (status, json) = call(app(seed_countries()), post_json("/api/v1/games", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(json["code"], "invalid_json");
        }
    }

    #[tokio::test]
    async fn unknown_region_is_a_bad_request() {
        let req = Request::get("/api/v1/pool?region=Narnia").body(Body::empty()).unwrap();
        let (status, json) = call(app(seed_countries()), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "unknown_region");
    }

    #[tokio::test]
    async fn game_flow_over_http() {
        let app = app(seed_countries());

        let (status, game) = call(app.clone(), post_json("/api/v1/games", r#"{"difficulty":"easy"}"#)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(game["region"], "World");
        assert_eq!(game["difficulty"], "easy");
        assert_eq!(game["question"]["kind"], "flag");
        assert!(game["question"].get("correct").is_none());
        let id = game["id"].as_str().unwrap().to_string();

        let answer_uri = format!("/api/v1/games/{}/answer", id);
        let (status, feedback) = call(app.clone(), post_json(&answer_uri, r#"{"answer":{"type":"choice","option":0}}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(feedback["expected"].is_string());

        // second submission while feedback is showing
        let (status, json) = call(app.clone(), post_json(&answer_uri, r#"{"answer":{"type":"choice","option":0}}"#)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], "input_locked");

        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        let get = Request::get(format!("/api/v1/games/{}", id)).body(Body::empty()).unwrap();
        let (_, game) = call(app.clone(), get).await;
        assert_eq!(game["phase"], "awaiting_answer");
        assert_eq!(game["question"]["kind"], "capital");

        let delete = Request::delete(format!("/api/v1/games/{}", id)).body(Body::empty()).unwrap();
        let (status, _) = call(app.clone(), delete).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let get = Request::get(format!("/api/v1/games/{}", id)).body(Body::empty()).unwrap();
        let (status, json) = call(app, get).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "session_not_found");
    }
}
