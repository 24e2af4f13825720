use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;

use auth::rate_limit::RateLimitState;
use config::Config;
use db::reflections::PgReflectionStore;
use services::entries::EntryLocks;

const HOUSEKEEPING_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub store: PgReflectionStore,
    pub config: Arc<Config>,
    pub rate_limiter: RateLimitState,
    pub entry_locks: EntryLocks,
}

impl AppState {
    pub fn new(db: PgPool, config: Arc<Config>) -> Self {
        let rate_limiter = RateLimitState::new(
            config.auth_rate_limit,
            Duration::from_secs(config.auth_rate_window_secs),
        );
        Self {
            store: PgReflectionStore::new(db.clone()),
            db,
            config,
            rate_limiter,
            entry_locks: EntryLocks::new(),
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reflecta_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    let db = db::create_pool(&config.database_url, config.db_max_connections).await;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations applied");

    let state = AppState::new(db, config.clone());

    spawn_housekeeping(state.clone());

    let app = build_router(state)
        .layer(cors_layer(&config))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    // Connect info feeds the per-IP rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .expect("Server error");
}

fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::rate_limit_auth,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .merge(auth_routes);

    let protected_routes = Router::new()
        .route("/api/auth/profile", get(handlers::auth::profile))
        .route("/api/user/me", get(handlers::auth::profile))
        .route(
            "/api/reflections",
            post(handlers::reflections::create_reflection)
                .get(handlers::reflections::list_reflections),
        )
        .route(
            "/api/reflections/weekly",
            get(handlers::reflections::weekly_summary),
        )
        .route(
            "/api/reflections/insights",
            get(handlers::reflections::personal_insights),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let mut origins = vec![config
        .frontend_url
        .parse::<axum::http::HeaderValue>()
        .expect("FRONTEND_URL must be a valid origin")];
    if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
        origins.extend(
            extra
                .split(',')
                .filter_map(|o| o.trim().parse::<axum::http::HeaderValue>().ok()),
        );
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
}

/// Periodically drops idle per-user locks and stale rate-limit windows.
fn spawn_housekeeping(state: AppState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(HOUSEKEEPING_INTERVAL);
        loop {
            interval.tick().await;
            let locks = state.entry_locks.prune().await;
            let windows = state.rate_limiter.cleanup().await;
            tracing::debug!(locks, windows, "Housekeeping pass finished");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    // The pool never connects: every request below is answered before storage
    fn test_app() -> (Router, Arc<Config>) {
        let config = Arc::new(Config::for_tests());
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        (build_router(AppState::new(db, config.clone())), config)
    }

    fn bearer(config: &Config) -> String {
        let issued =
            auth::jwt::create_access_token(Uuid::new_v4(), "ada@example.com", config).unwrap();
        format!("Bearer {}", issued.token)
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _) = test_app();
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "reflecta-api");
    }

    #[tokio::test]
    async fn test_weekly_summary_requires_token() {
        let (app, _) = test_app();
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/reflections/weekly")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], 401);
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected() {
        let (app, _) = test_app();
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/reflections/insights")
                    .header(header::AUTHORIZATION, "Bearer not-a-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_reflection_rejects_bad_mood() {
        let (app, config) = test_app();
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/reflections")
                    .header(header::AUTHORIZATION, bearer(&config))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"mood":9,"note":"hm"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["message"], "Mood must be between 1 and 5");
    }

    #[tokio::test]
    async fn test_create_reflection_rejects_long_note() {
        let (app, config) = test_app();
        let body = serde_json::json!({ "mood": 3, "note": "n".repeat(501) });
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/reflections")
                    .header(header::AUTHORIZATION, bearer(&config))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["message"], "Note must be 500 characters or less");
    }
}
