//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/`, `/health` - 안내 메시지 및 헬스 체크
//! - `/auth` - 가입, 로그인, 프로필
//! - `/events` - 보안 이벤트
//! - `/api/security/policies` - 보안 정책
//! - `/defense`, `/settings` - 대시보드 정보
//! - `/telemetry/ws` - 텔레메트리 WebSocket

pub mod auth;
pub mod dashboard;
pub mod events;
pub mod health;
pub mod policies;
#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{auth_router, LoginRequest, RegisterRequest, UserProfile};
pub use dashboard::{dashboard_router, AgentStatus, DefenseAgent, DefenseSummary, SettingsResponse};
pub use events::{events_router, EventRequest, EventResponse};
pub use health::{health_router, HealthResponse, WelcomeResponse};
pub use policies::{policies_router, PolicyRequest, PolicyResponse};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;
use crate::websocket::telemetry_router;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 명시적으로 조합합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health_router())
        .merge(dashboard_router())
        .nest("/auth", auth_router())
        .nest("/events", events_router())
        .nest("/api/security/policies", policies_router())
        .nest("/telemetry", telemetry_router())
}
