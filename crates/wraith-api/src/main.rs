//! WraithNet 대시보드 API 서버.
//!
//! 설정을 로드하고 DB에 연결한 뒤 REST API와 텔레메트리 WebSocket을 제공합니다.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{http::StatusCode, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use wraith_api::metrics::setup_metrics_recorder;
use wraith_api::middleware::metrics_layer;
use wraith_api::openapi::swagger_ui_router;
use wraith_api::routes::create_api_router;
use wraith_api::state::{AppState, Stores};
use wraith_core::{init_logging, AppConfig, LogConfig};

/// JWT 비밀 키 미설정 시 사용하는 개발용 기본값.
const DEV_JWT_SECRET: &str = "wraithnet-dev-secret-change-me-in-production";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일이 없어도 무시
    let _ = dotenvy::dotenv();

    let config = AppConfig::load_default().context("Failed to load configuration")?;

    init_logging(LogConfig::from_settings(&config.logging))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting WraithNet API server");

    let metrics_handle = setup_metrics_recorder().context("Failed to install Prometheus recorder")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connection_timeout_secs))
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Database connected"
    );

    if config.database.run_migrations {
        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;
        info!("Database migrations applied");
    }

    let jwt_secret = match config.auth.jwt_secret.clone() {
        Some(secret) if !secret.is_empty() => secret,
        _ => {
            warn!("WRAITH__AUTH__JWT_SECRET not set, using development secret");
            DEV_JWT_SECRET.to_string()
        }
    };

    let shutdown_token = CancellationToken::new();
    let state = Arc::new(
        AppState::new(
            Stores::postgres(&pool),
            &config,
            jwt_secret,
            shutdown_token.clone(),
        )
        .with_db_pool(pool),
    );

    let app = create_router(state, metrics_handle, &config.server.cors_origins);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "API server listening");
    info!("Swagger UI: http://{addr}/swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// CORS 레이어 생성.
///
/// origin 목록이 비어 있으면 개발 모드로 간주하여 모든 origin을 허용합니다.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<_> = origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let allow_origin = if parsed.is_empty() {
        if !origins.is_empty() {
            warn!("server.cors_origins contains no valid origins, allowing any");
        } else {
            warn!("server.cors_origins not set, allowing any origin (development mode)");
        }
        AllowOrigin::any()
    } else {
        info!("CORS configured with {} allowed origins", parsed.len());
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600))
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> String {
    handle.render()
}

/// 전체 라우터 생성.
fn create_router(
    state: Arc<AppState>,
    metrics_handle: PrometheusHandle,
    cors_origins: &[String],
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    Router::new()
        .merge(metrics_router)
        .merge(create_api_router().with_state(state))
        .merge(swagger_ui_router())
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer(cors_origins))
}

/// Ctrl+C 또는 SIGTERM 대기 후 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    // 텔레메트리 스트림 등 장기 실행 태스크에 종료 전파
    shutdown_token.cancel();
    info!("Shutdown signal propagated to background tasks");
}
