//! Meal Poll HTTP Server
//!
//! Dashboard page and JSON API, built with Axum.
//!
//! # Endpoints
//!
//! ## Page
//! - `GET /` - Dashboard (trend chart, vote form, tally chart)
//! - `POST /vote` - Vote form submit
//!
//! ## API
//! - `GET /api/v1/dashboard` - Render pass as JSON
//! - `GET /api/v1/meals` - Loaded meal records
//! - `GET /api/v1/dishes` - Distinct dish names
//! - `GET /api/v1/votes` - Session tally
//! - `POST /api/v1/votes` - Vote for a dish
//! - `GET /api/v1/charts/trend` - Calorie trend (json or svg)
//! - `GET /api/v1/charts/tally` - Vote tally (json or svg)
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,no_run
//! use meal_poll::api::{serve, AppState};
//! use meal_poll::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let state = AppState::new(&config)?;
//!     serve(state, &config.api).await?;
//!     Ok(())
//! }
//! ```

pub mod cookie;
pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ApiConfig;

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route("/", get(routes::dashboard::index))
        .route("/vote", post(routes::dashboard::submit_vote));

    let api_routes = Router::new()
        .route("/dashboard", get(routes::dashboard::dashboard_json))
        .route("/meals", get(routes::meals::list_meals))
        .route("/dishes", get(routes::meals::list_dishes))
        .route("/votes", get(routes::votes::list).post(routes::votes::cast))
        .route("/charts/trend", get(routes::charts::trend))
        .route("/charts/tally", get(routes::charts::tally));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .merge(page_routes)
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the HTTP server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let sweeper = state.sessions.start_background_sweep();
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Meal poll listening on {}", addr);

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)));

    sweeper.abort();
    tracing::info!("Meal poll shut down gracefully");
    result
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use tempfile::tempdir;
    use tower::util::ServiceExt;

    const SAMPLE: &str = "급식일자,요리명,칼로리정보(Kcal)
2024-03-01,Bibimbap,550
2024-03-01,Kimchi Soup,300
2024-03-02,Bibimbap,560
";

    fn create_test_app(contents: Option<&str>) -> (Router, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meals_data.csv");
        if let Some(contents) = contents {
            std::fs::write(&path, contents).unwrap();
        }

        let mut config = Config::default();
        config.dataset.path = path.to_string_lossy().to_string();
        let state = AppState::new(&config).unwrap();

        (build_router(state), dir)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn session_cookie(response: &Response) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    fn post_json(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _dir) = create_test_app(None);

        let response = app
            .oneshot(Request::builder().uri("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready_follows_dataset() {
        let (app, _dir) = create_test_app(None);
        let response = app
            .oneshot(Request::builder().uri("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let (app, _dir) = create_test_app(Some(SAMPLE));
        let response = app
            .oneshot(Request::builder().uri("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full_reports_missing() {
        let (app, _dir) = create_test_app(None);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["dataset"], "missing");
    }

    #[tokio::test]
    async fn test_index_sets_session_cookie() {
        let (app, _dir) = create_test_app(Some(SAMPLE));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(session_cookie(&response).starts_with("meal_poll_session="));
        let html = body_text(response).await;
        assert!(html.contains("<form method=\"post\" action=\"/vote\">"));
    }

    #[tokio::test]
    async fn test_index_without_dataset_shows_warning() {
        let (app, _dir) = create_test_app(None);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("notice warning"));
        assert!(!html.contains("<form"));
    }

    #[tokio::test]
    async fn test_votes_accumulate_per_session() {
        let (app, _dir) = create_test_app(Some(SAMPLE));

        let first = app
            .clone()
            .oneshot(post_json("/api/v1/votes", None, r#"{"dish": "Bibimbap"}"#))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);
        let cookie = session_cookie(&first);

        app.clone()
            .oneshot(post_json("/api/v1/votes", Some(&cookie), r#"{"dish": "Bibimbap"}"#))
            .await
            .unwrap();
        let third = app
            .clone()
            .oneshot(post_json("/api/v1/votes", Some(&cookie), r#"{"dish": "Kimchi Soup"}"#))
            .await
            .unwrap();

        assert!(third.headers().get(header::SET_COOKIE).is_none());
        let json = body_json(third).await;
        assert_eq!(json["count"], 1);
        assert_eq!(json["tally"][0]["dish"], "Bibimbap");
        assert_eq!(json["tally"][0]["count"], 2);
        assert_eq!(json["tally"][1]["dish"], "Kimchi Soup");
        assert_eq!(json["tally"][1]["count"], 1);

        // A new visitor starts from zero
        let other = app
            .oneshot(Request::builder().uri("/api/v1/votes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(other).await;
        assert_eq!(json["total_votes"], 0);
    }

    #[tokio::test]
    async fn test_vote_unknown_dish() {
        let (app, _dir) = create_test_app(Some(SAMPLE));

        let response = app
            .oneshot(post_json("/api/v1/votes", None, r#"{"dish": "Ramen"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "UNKNOWN_DISH");
    }

    #[tokio::test]
    async fn test_rejected_vote_keeps_session_reachable() {
        let (app, _dir) = create_test_app(Some(SAMPLE));

        let rejected = app
            .clone()
            .oneshot(post_json("/api/v1/votes", None, r#"{"dish": "Ramen"}"#))
            .await
            .unwrap();
        assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
        let cookie = session_cookie(&rejected);

        let accepted = app
            .clone()
            .oneshot(post_json("/api/v1/votes", Some(&cookie), r#"{"dish": "Bibimbap"}"#))
            .await
            .unwrap();
        assert_eq!(accepted.status(), StatusCode::CREATED);
        assert!(accepted.headers().get(header::SET_COOKIE).is_none());

        let health = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(health).await;
        assert_eq!(json["sessions"], 1);
    }

    #[tokio::test]
    async fn test_vote_without_dataset() {
        let (app, _dir) = create_test_app(None);

        let response = app
            .oneshot(post_json("/api/v1/votes", None, r#"{"dish": "Bibimbap"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_form_vote_shows_acknowledgment() {
        let (app, _dir) = create_test_app(Some(SAMPLE));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/vote")
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(Body::from("dish=Kimchi+Soup"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(crate::tally::VOTE_ACK_MESSAGE));
        assert!(html.contains("value=\"Kimchi Soup\" checked"));
    }

    #[tokio::test]
    async fn test_form_vote_unknown_dish_shows_error() {
        let (app, _dir) = create_test_app(Some(SAMPLE));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/vote")
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(Body::from("dish=Ramen"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::SET_COOKIE).is_some());
        let html = body_text(response).await;
        let error_at = html.find("<div class=\"notice error\"").unwrap();
        assert_eq!(html.find("<div class=\"notice "), Some(error_at));
        assert!(html[error_at..].contains("Unknown dish: Ramen"));
        assert!(!html.contains(crate::tally::VOTE_ACK_MESSAGE));
    }

    #[tokio::test]
    async fn test_meals_and_dishes() {
        let (app, _dir) = create_test_app(Some(SAMPLE));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/v1/meals").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["total"], 3);
        assert_eq!(json["encoding"], "UTF-8");
        assert_eq!(json["records"][2]["date"], "2024-03-02");

        let response = app
            .oneshot(Request::builder().uri("/api/v1/dishes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["dishes"], serde_json::json!(["Bibimbap", "Kimchi Soup"]));
    }

    #[tokio::test]
    async fn test_trend_chart_svg() {
        let (app, _dir) = create_test_app(Some(SAMPLE));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/charts/trend?format=svg")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/svg+xml; charset=utf-8"
        );
        let svg = body_text(response).await;
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[tokio::test]
    async fn test_chart_bad_format() {
        let (app, _dir) = create_test_app(Some(SAMPLE));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/charts/tally?format=png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
