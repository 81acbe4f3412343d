//! Axum용 인증 추출기.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use wraith_core::User;

use crate::error::{ApiErrorResponse, ServiceError};
use crate::state::AppState;

/// 인증된 사용자 추출기.
///
/// `Authorization: Bearer <token>` 헤더를 검증하고 토큰 subject를 사용자 레코드로 해석합니다.
///
/// ```rust,ignore
/// async fn me(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
///     Json(user.into())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// 인증 추출 실패.
#[derive(Debug, thiserror::Error)]
pub enum AuthRejection {
    #[error("인증 토큰이 필요합니다")]
    MissingToken,
    #[error("잘못된 Authorization 헤더 형식")]
    InvalidAuthHeader,
    #[error("유효하지 않은 토큰")]
    InvalidToken,
    #[error("서비스를 일시적으로 사용할 수 없습니다")]
    Unavailable,
    #[error("내부 오류가 발생했습니다")]
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AuthRejection::MissingToken | AuthRejection::InvalidAuthHeader => {
                (StatusCode::UNAUTHORIZED, "MISSING_TOKEN")
            }
            AuthRejection::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            AuthRejection::Unavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            AuthRejection::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        (status, Json(ApiErrorResponse::new(code, self.to_string()))).into_response()
    }
}

impl From<ServiceError> for AuthRejection {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthorized => AuthRejection::InvalidToken,
            ServiceError::Unavailable(detail) => {
                tracing::error!(detail = %detail, "Store unavailable during authentication");
                AuthRejection::Unavailable
            }
            other => {
                tracing::error!(error = ?other, "Unexpected authentication failure");
                AuthRejection::Internal
            }
        }
    }
}

/// `Authorization` 헤더에서 Bearer 토큰 추출.
fn bearer_token(parts: &Parts) -> Result<&str, AuthRejection> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthRejection::MissingToken)?
        .to_str()
        .map_err(|_| AuthRejection::InvalidAuthHeader)?;

    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .ok_or(AuthRejection::InvalidAuthHeader)?;

    if token.is_empty() {
        return Err(AuthRejection::MissingToken);
    }

    Ok(token)
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user = state.auth.authenticate(token).await?;
        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/auth/me");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer abc"))).unwrap(), "abc");
        assert_eq!(bearer_token(&parts_with(Some("bearer abc"))).unwrap(), "abc");
        assert!(matches!(
            bearer_token(&parts_with(None)),
            Err(AuthRejection::MissingToken)
        ));
        assert!(matches!(
            bearer_token(&parts_with(Some("Basic dXNlcjpwdw=="))),
            Err(AuthRejection::InvalidAuthHeader)
        ));
        assert!(matches!(
            bearer_token(&parts_with(Some("Bearer "))),
            Err(AuthRejection::MissingToken)
        ));
    }

    #[test]
    fn test_rejection_status_codes() {
        let cases = [
            (AuthRejection::MissingToken, StatusCode::UNAUTHORIZED),
            (AuthRejection::InvalidAuthHeader, StatusCode::UNAUTHORIZED),
            (AuthRejection::InvalidToken, StatusCode::UNAUTHORIZED),
            (AuthRejection::Unavailable, StatusCode::SERVICE_UNAVAILABLE),
            (AuthRejection::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (rejection, expected) in cases {
            assert_eq!(rejection.into_response().status(), expected);
        }
    }

    #[test]
    fn test_service_error_conversion() {
        assert!(matches!(
            AuthRejection::from(ServiceError::Unauthorized),
            AuthRejection::InvalidToken
        ));
        assert!(matches!(
            AuthRejection::from(ServiceError::Unavailable("down".into())),
            AuthRejection::Unavailable
        ));
    }

    #[tokio::test]
    async fn test_internal_failure_is_server_error() {
        let rejection = AuthRejection::from(ServiceError::Internal("decode failed".into()));
        assert!(matches!(rejection, AuthRejection::Internal));

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ApiErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.code, "INTERNAL_ERROR");
        assert!(!body.message.contains("decode"));
    }
}
