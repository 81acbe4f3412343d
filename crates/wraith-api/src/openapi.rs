//! OpenAPI 문서화 설정.
//!
//! utoipa로 REST API의 OpenAPI 3.0 문서를 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;
use wraith_core::{Role, Severity};

use crate::auth::IssuedToken;
use crate::error::ApiErrorResponse;
use crate::routes::{
    AgentStatus, DefenseAgent, DefenseSummary, EventRequest, EventResponse, HealthResponse,
    LoginRequest, PolicyRequest, PolicyResponse, RegisterRequest, SettingsResponse, UserProfile,
    WelcomeResponse,
};

/// `bearer_auth` 보안 스킴 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// WraithNet API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "WraithNet Core Dashboard API",
        description = r#"
# WraithNet Core Dashboard REST API

보안 정책/보안 이벤트 관리와 텔레메트리 스트림을 위한 API입니다.

## 인증

`/auth/register` 또는 `/auth/login`으로 토큰을 발급받은 뒤
`Authorization: Bearer <token>` 헤더를 포함하세요.

## 텔레메트리

`ws://<host>/telemetry/ws`에 연결하면 2초마다 CPU/메모리 사용률 프레임을 수신합니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    servers(
        (url = "http://localhost:8000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 가입, 로그인, 프로필"),
        (name = "policies", description = "보안 정책 - CRUD 및 활성화 토글"),
        (name = "events", description = "보안 이벤트 - 기록 및 조회"),
        (name = "dashboard", description = "대시보드 - 에이전트 요약 및 설정")
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            // ===== Common =====
            ApiErrorResponse,

            // ===== Auth =====
            RegisterRequest,
            LoginRequest,
            IssuedToken,
            UserProfile,
            Role,

            // ===== Policies =====
            PolicyRequest,
            PolicyResponse,

            // ===== Events =====
            EventRequest,
            EventResponse,
            Severity,

            // ===== Health / Dashboard =====
            WelcomeResponse,
            HealthResponse,
            DefenseSummary,
            DefenseAgent,
            AgentStatus,
            SettingsResponse,
        )
    ),
    paths(
        // ===== Health =====
        crate::routes::health::root,
        crate::routes::health::health_check,

        // ===== Auth =====
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,

        // ===== Policies =====
        crate::routes::policies::list_policies,
        crate::routes::policies::create_policy,
        crate::routes::policies::get_policy,
        crate::routes::policies::update_policy,
        crate::routes::policies::delete_policy,
        crate::routes::policies::toggle_policy,

        // ===== Events =====
        crate::routes::events::list_events,
        crate::routes::events::create_event,
        crate::routes::events::get_event,
        crate::routes::events::update_event,
        crate::routes::events::delete_event,

        // ===== Dashboard =====
        crate::routes::dashboard::get_defense,
        crate::routes::dashboard::get_settings,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let json = serde_json::to_string_pretty(&ApiDoc::openapi()).unwrap();

        assert!(json.contains("WraithNet Core Dashboard API"));
        assert!(json.contains("/auth/register"));
        assert!(json.contains("/api/security/policies/{id}/toggle"));
        assert!(json.contains("/events/{id}"));
        assert!(json.contains("bearer_auth"));
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

        assert!(json.contains("PolicyResponse"));
        assert!(json.contains("EventRequest"));
        assert!(json.contains("IssuedToken"));
        assert!(json.contains("ApiErrorResponse"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }
}
