//! 인증 endpoint.
//!
//! # 엔드포인트
//!
//! - `POST /auth/register` - 가입 후 토큰 발급
//! - `POST /auth/login` - 로그인 후 토큰 발급
//! - `GET /auth/me` - 현재 사용자 프로필

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;
use wraith_core::{Role, User};

use crate::auth::{CurrentUser, IssuedToken};
use crate::error::{ApiErrorResponse, ApiResult, ServiceError};
use crate::state::AppState;

/// 가입 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// 사용자 이름 (앞뒤 공백 제외 1~50자)
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    /// 이메일
    #[validate(email)]
    pub email: String,
    /// 비밀번호
    #[validate(length(min = 1))]
    pub password: String,
}

/// 로그인 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 사용자 프로필 (비밀번호 해시 제외).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// 가입.
///
/// POST /auth/register
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "가입 성공, 토큰 발급", body = IssuedToken),
        (status = 400, description = "이미 등록된 이메일 또는 잘못된 입력", body = ApiErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Json<IssuedToken>> {
    request.validate().map_err(ServiceError::from)?;

    let token = state
        .auth
        .register(&request.username, &request.email, &request.password)
        .await?;

    Ok(Json(token))
}

/// 로그인.
///
/// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공, 토큰 발급", body = IssuedToken),
        (status = 401, description = "이메일 또는 비밀번호 불일치", body = ApiErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<IssuedToken>> {
    let token = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(token))
}

/// 현재 사용자 프로필.
///
/// GET /auth/me
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "현재 사용자", body = UserProfile),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    )
)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(user.into())
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::state::create_test_state;

    fn app() -> Router {
        Router::new()
            .nest("/auth", auth_router())
            .with_state(Arc::new(create_test_state()))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_register_login_me_flow() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/auth/register",
                json!({"username": "alice", "email": "a@x.com", "password": "pw123"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let t1 = body_json(response).await;
        assert_eq!(t1["token_type"], "bearer");
        assert_eq!(t1["expires_in"], 3600);

        let response = app
            .clone()
            .oneshot(post_json(
                "/auth/login",
                json!({"email": "a@x.com", "password": "pw123"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let t2 = body_json(response).await;
        assert_ne!(t1["access_token"], t2["access_token"]);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/auth/me")
                    .header(
                        header::AUTHORIZATION,
                        format!("Bearer {}", t2["access_token"].as_str().unwrap()),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let profile = body_json(response).await;
        assert_eq!(profile["username"], "alice");
        assert_eq!(profile["role"], "user");
        assert!(profile.get("password_hash").is_none());

        let response = app
            .oneshot(post_json(
                "/auth/login",
                json!({"email": "a@x.com", "password": "wrong"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_bad_request() {
        let app = app();
        let body = json!({"username": "alice", "email": "a@x.com", "password": "pw123"});

        let first = app.clone().oneshot(post_json("/auth/register", body.clone())).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app.oneshot(post_json("/auth/register", body)).await.unwrap();
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(second).await["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_register_invalid_input() {
        let response = app()
            .oneshot(post_json(
                "/auth/register",
                json!({"username": "", "email": "not-an-email", "password": "pw"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_register_blank_username_rejected() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/auth/register",
                json!({"username": "   ", "email": "b@x.com", "password": "pw"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_INPUT");

        // 거부된 가입은 계정을 만들지 않음
        let response = app
            .oneshot(post_json(
                "/auth/login",
                json!({"email": "b@x.com", "password": "pw"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let response = app()
            .oneshot(Request::builder().uri("/auth/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "MISSING_TOKEN");
    }
}
