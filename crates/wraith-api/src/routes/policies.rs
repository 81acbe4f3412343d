//! 보안 정책 endpoint.
//!
//! # 엔드포인트
//!
//! - `GET /api/security/policies` - 정책 목록 (skip, limit)
//! - `POST /api/security/policies` - 정책 생성
//! - `GET /api/security/policies/{id}` - 정책 조회
//! - `PUT /api/security/policies/{id}` - 정책 수정
//! - `DELETE /api/security/policies/{id}` - 정책 삭제
//! - `PUT /api/security/policies/{id}/toggle` - 활성화 상태 반전
//!
//! 모든 작업은 인증된 사용자에게 허용됩니다.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;
use wraith_core::{PolicyDraft, SecurityPolicy};

use crate::auth::CurrentUser;
use crate::error::{ApiErrorResponse, ApiResult, ServiceError};
use crate::repository::Page;
use crate::state::AppState;

/// 정책 생성/수정 요청.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PolicyRequest {
    /// 정책 이름 (1~255자)
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// 정책 설명 (최대 500자)
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// 활성화 여부 (기본값: true)
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl From<PolicyRequest> for PolicyDraft {
    fn from(request: PolicyRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            enabled: request.enabled,
        }
    }
}

/// 정책 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PolicyResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SecurityPolicy> for PolicyResponse {
    fn from(policy: SecurityPolicy) -> Self {
        Self {
            id: policy.id,
            name: policy.name,
            description: policy.description,
            enabled: policy.enabled,
            created_at: policy.created_at,
            updated_at: policy.updated_at,
        }
    }
}

fn validated(request: PolicyRequest) -> Result<PolicyDraft, ServiceError> {
    request.validate()?;
    Ok(request.into())
}

/// 정책 목록 조회.
///
/// GET /api/security/policies
#[utoipa::path(
    get,
    path = "/api/security/policies",
    tag = "policies",
    params(Page),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "정책 목록 (ID 오름차순)", body = Vec<PolicyResponse>),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    )
)]
pub async fn list_policies(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<Page>,
) -> ApiResult<Json<Vec<PolicyResponse>>> {
    let policies = state.policies.list(&user, page).await?;
    Ok(Json(policies.into_iter().map(PolicyResponse::from).collect()))
}

/// 정책 생성.
///
/// POST /api/security/policies
#[utoipa::path(
    post,
    path = "/api/security/policies",
    tag = "policies",
    request_body = PolicyRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "생성된 정책", body = PolicyResponse),
        (status = 400, description = "잘못된 입력", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    )
)]
pub async fn create_policy(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<PolicyRequest>,
) -> ApiResult<Json<PolicyResponse>> {
    let policy = state.policies.create(&user, validated(request)?).await?;
    Ok(Json(policy.into()))
}

/// 정책 조회.
///
/// GET /api/security/policies/{id}
#[utoipa::path(
    get,
    path = "/api/security/policies/{id}",
    tag = "policies",
    params(("id" = i64, Path, description = "정책 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "정책", body = PolicyResponse),
        (status = 404, description = "정책 없음", body = ApiErrorResponse)
    )
)]
pub async fn get_policy(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<PolicyResponse>> {
    let policy = state.policies.get(&user, id).await?;
    Ok(Json(policy.into()))
}

/// 정책 수정.
///
/// PUT /api/security/policies/{id}
#[utoipa::path(
    put,
    path = "/api/security/policies/{id}",
    tag = "policies",
    params(("id" = i64, Path, description = "정책 ID")),
    request_body = PolicyRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "수정된 정책", body = PolicyResponse),
        (status = 400, description = "잘못된 입력", body = ApiErrorResponse),
        (status = 404, description = "정책 없음", body = ApiErrorResponse)
    )
)]
pub async fn update_policy(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<PolicyRequest>,
) -> ApiResult<Json<PolicyResponse>> {
    let policy = state.policies.update(&user, id, validated(request)?).await?;
    Ok(Json(policy.into()))
}

/// 정책 삭제.
///
/// DELETE /api/security/policies/{id}
#[utoipa::path(
    delete,
    path = "/api/security/policies/{id}",
    tag = "policies",
    params(("id" = i64, Path, description = "정책 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "삭제됨"),
        (status = 404, description = "정책 없음", body = ApiErrorResponse)
    )
)]
pub async fn delete_policy(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.policies.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 정책 활성화 상태 반전.
///
/// PUT /api/security/policies/{id}/toggle
#[utoipa::path(
    put,
    path = "/api/security/policies/{id}/toggle",
    tag = "policies",
    params(("id" = i64, Path, description = "정책 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "반전된 정책", body = PolicyResponse),
        (status = 404, description = "정책 없음", body = ApiErrorResponse)
    )
)]
pub async fn toggle_policy(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<PolicyResponse>> {
    let policy = state.policies.toggle(&user, id).await?;
    Ok(Json(policy.into()))
}

/// 보안 정책 라우터 생성.
pub fn policies_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_policies).post(create_policy))
        .route(
            "/{id}",
            get(get_policy).put(update_policy).delete(delete_policy),
        )
        .route("/{id}/toggle", put(toggle_policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::routes::test_support::{body_json, empty_request, json_request, register};
    use crate::routes::auth_router;
    use crate::state::create_test_state;

    const BASE: &str = "/api/security/policies";

    fn app() -> Router {
        Router::new()
            .nest("/auth", auth_router())
            .nest(BASE, policies_router())
            .with_state(Arc::new(create_test_state()))
    }

    async fn create(app: &Router, token: &str, name: &str) -> serde_json::Value {
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                BASE,
                Some(token),
                json!({"name": name, "description": "Detect and block network port scans"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let response = app()
            .oneshot(empty_request(Method::GET, BASE, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_list_get() {
        let app = app();
        let token = register(&app, "alice", "a@x.com").await;

        let created = create(&app, &token, "Block Port Scans").await;
        assert_eq!(created["enabled"], true);
        let id = created["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, BASE, Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let list = body_json(response).await;
        assert_eq!(list.as_array().unwrap().len(), 1);

        let response = app
            .oneshot(empty_request(Method::GET, &format!("{BASE}/{id}"), Some(&token)))
            .await
            .unwrap();
        assert_eq!(body_json(response).await, created);
    }

    #[tokio::test]
    async fn test_toggle_inverts_and_restores() {
        let app = app();
        let token = register(&app, "alice", "a@x.com").await;
        let id = create(&app, &token, "p").await["id"].as_i64().unwrap();
        let uri = format!("{BASE}/{id}/toggle");

        let response = app
            .clone()
            .oneshot(empty_request(Method::PUT, &uri, Some(&token)))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["enabled"], false);

        let response = app
            .oneshot(empty_request(Method::PUT, &uri, Some(&token)))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["enabled"], true);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let app = app();
        let token = register(&app, "alice", "a@x.com").await;
        let id = create(&app, &token, "p").await["id"].as_i64().unwrap();
        let uri = format!("{BASE}/{id}");

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                &uri,
                Some(&token),
                json!({"name": "renamed", "enabled": false}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["name"], "renamed");
        assert_eq!(updated["description"], serde_json::Value::Null);

        let response = app
            .clone()
            .oneshot(empty_request(Method::DELETE, &uri, Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(empty_request(Method::GET, &uri, Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_policy_is_not_found() {
        let app = app();
        let token = register(&app, "alice", "a@x.com").await;

        for (method, uri) in [
            (Method::PUT, format!("{BASE}/999/toggle")),
            (Method::DELETE, format!("{BASE}/999")),
        ] {
            let response = app
                .clone()
                .oneshot(empty_request(method, &uri, Some(&token)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn test_invalid_name_rejected() {
        let app = app();
        let token = register(&app, "alice", "a@x.com").await;

        let response = app
            .oneshot(json_request(
                Method::POST,
                BASE,
                Some(&token),
                json!({"name": "x".repeat(256)}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
