//! API 에러 타입 및 응답 형식.
//!
//! 인증 코어와 리소스 레지스트리는 [`ServiceError`]를 반환하고,
//! 핸들러 경계에서 고정된 HTTP 상태 코드와 [`ApiErrorResponse`] 본문으로 변환됩니다.
//!
//! | 에러 | 상태 코드 |
//! |------|-----------|
//! | `Conflict`, `Invalid` | 400 |
//! | `Unauthorized` | 401 |
//! | `Forbidden` | 403 |
//! | `NotFound` | 404 |
//! | `Internal` | 500 |
//! | `Unavailable` | 503 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

/// 통합 API 에러 응답.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "policy 42 not found",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "UNAUTHORIZED", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// 인증 코어 / 레지스트리 작업 에러.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// 유일성 위반 (이미 등록된 이메일 등)
    #[error("{0}")]
    Conflict(String),
    /// 잘못된 입력
    #[error("{0}")]
    Invalid(String),
    /// 인증 실패 (토큰 누락/만료/위조, 잘못된 자격증명)
    #[error("인증에 실패했습니다")]
    Unauthorized,
    /// 역할 부족
    #[error("권한이 부족합니다")]
    Forbidden,
    /// 리소스 없음
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },
    /// 저장소 연결 불가
    #[error("서비스를 일시적으로 사용할 수 없습니다")]
    Unavailable(String),
    /// 내부 오류
    #[error("내부 오류가 발생했습니다")]
    Internal(String),
}

/// 서비스 계층 Result 타입.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// 리소스 없음 에러 생성.
    pub fn not_found(resource: &'static str, id: i64) -> Self {
        ServiceError::NotFound { resource, id }
    }

    /// HTTP 상태 코드.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Conflict(_) | ServiceError::Invalid(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden => StatusCode::FORBIDDEN,
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 응답 본문의 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Conflict(_) => "CONFLICT",
            ServiceError::Invalid(_) => "INVALID_INPUT",
            ServiceError::Unauthorized => "UNAUTHORIZED",
            ServiceError::Forbidden => "FORBIDDEN",
            ServiceError::NotFound { .. } => "NOT_FOUND",
            ServiceError::Unavailable(_) => "SERVICE_UNAVAILABLE",
            ServiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => ServiceError::Unavailable(err.to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ServiceError::Conflict("이미 존재하는 값입니다".to_string())
            }
            _ => ServiceError::Internal(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::Invalid(err.to_string())
    }
}

impl From<ServiceError> for (StatusCode, Json<ApiErrorResponse>) {
    fn from(err: ServiceError) -> Self {
        // 내부 상세는 로그에만 남기고 클라이언트에는 일반 메시지만 전달
        match &err {
            ServiceError::Internal(detail) => error!(detail = %detail, "Internal service error"),
            ServiceError::Unavailable(detail) => error!(detail = %detail, "Store unavailable"),
            _ => {}
        }

        (
            err.status_code(),
            Json(ApiErrorResponse::new(err.code(), err.to_string())),
        )
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        <(StatusCode, Json<ApiErrorResponse>)>::from(self).into_response()
    }
}

/// API 핸들러 Result 타입 별칭.
///
/// 서비스 계층의 [`ServiceError`]는 `?`로 자동 변환됩니다.
///
/// ```ignore
/// async fn get_policy(
///     State(state): State<Arc<AppState>>,
///     CurrentUser(user): CurrentUser,
///     Path(id): Path<i64>,
/// ) -> ApiResult<Json<PolicyResponse>> {
///     let policy = state.policies.get(&user, id).await?;
///     Ok(Json(policy.into()))
/// }
/// ```
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;
