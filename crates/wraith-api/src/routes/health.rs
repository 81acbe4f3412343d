//! 헬스 체크 endpoint.
//!
//! - `GET /` - 서비스 안내 메시지
//! - `GET /health` - 서버 및 DB 연결 상태

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

/// 루트 안내 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WelcomeResponse {
    pub message: String,
}

/// 헬스 체크 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// 전체 상태 ("healthy" | "unhealthy")
    pub status: String,
    /// DB 상태 ("connected" | "disconnected" | "not_configured")
    pub database: String,
    /// API 버전
    pub version: String,
    /// 서버 업타임(초)
    pub uptime_secs: i64,
}

/// 서비스 안내.
///
/// GET /
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "서비스 실행 중", body = WelcomeResponse)
    )
)]
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to WraithNet Core Dashboard API is running".to_string(),
    })
}

/// 헬스 체크.
///
/// DB에 `SELECT 1`을 실행해 연결을 확인합니다.
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "정상", body = HealthResponse),
        (status = 503, description = "DB 연결 실패", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status_code, status, database) = match state.is_db_healthy().await {
        Some(true) => (StatusCode::OK, "healthy", "connected"),
        Some(false) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "disconnected"),
        None => (StatusCode::OK, "healthy", "not_configured"),
    };

    let response = HealthResponse {
        status: status.to_string(),
        database: database.to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
    };

    (status_code, Json(response))
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}
