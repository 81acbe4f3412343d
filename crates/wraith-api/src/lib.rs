//! WraithNet 대시보드 REST API 및 텔레메트리 WebSocket 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - JWT 인증 및 역할 기반 권한 검사
//! - 보안 정책/이벤트용 제네릭 리소스 레지스트리
//! - 텔레메트리 WebSocket 스트림
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 가입, 로그인, 토큰 인증
//! - [`repository`]: 리소스 레지스트리와 저장소
//! - [`websocket`]: 텔레메트리 WebSocket 스트림
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod state;
pub mod websocket;

pub use auth::{AuthService, CurrentUser, IssuedToken, TokenIssuer};
pub use error::{ApiErrorResponse, ApiResult, ServiceError, ServiceResult};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use repository::{Page, Registry, ResourceStore};
pub use routes::create_api_router;
pub use state::{AppState, Stores};
pub use websocket::{stream_telemetry, telemetry_router, TelemetryFrame};

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
