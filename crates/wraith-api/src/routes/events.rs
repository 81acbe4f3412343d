//! 보안 이벤트 endpoint.
//!
//! # 엔드포인트
//!
//! - `GET /events` - 이벤트 목록 (skip, limit)
//! - `POST /events` - 이벤트 기록 (researcher, admin)
//! - `GET /events/{id}` - 이벤트 조회
//! - `PUT /events/{id}` - 이벤트 수정 (admin)
//! - `DELETE /events/{id}` - 이벤트 삭제 (admin)

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;
use wraith_core::{Event, EventDraft, Severity};

use crate::auth::CurrentUser;
use crate::error::{ApiErrorResponse, ApiResult, ServiceError};
use crate::repository::Page;
use crate::state::AppState;

/// 이벤트 기록 요청.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EventRequest {
    /// 발생 출처 (센서, 호스트 등)
    #[validate(length(min = 1, max = 255))]
    pub source: String,
    /// 분류
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    /// 심각도
    pub severity: Severity,
    /// 메시지
    #[validate(length(min = 1))]
    pub message: String,
}

impl From<EventRequest> for EventDraft {
    fn from(request: EventRequest) -> Self {
        Self {
            source: request.source,
            category: request.category,
            severity: request.severity,
            message: request.message,
        }
    }
}

/// 이벤트 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub category: String,
    pub severity: Severity,
    pub message: String,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            timestamp: event.timestamp,
            source: event.source,
            category: event.category,
            severity: event.severity,
            message: event.message,
        }
    }
}

fn validated(request: EventRequest) -> Result<EventDraft, ServiceError> {
    request.validate()?;
    Ok(request.into())
}

/// 이벤트 목록 조회.
///
/// GET /events
#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    params(Page),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "이벤트 목록 (ID 오름차순)", body = Vec<EventResponse>),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    )
)]
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<Page>,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let events = state.events.list(&user, page).await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

/// 이벤트 기록.
///
/// POST /events
#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    request_body = EventRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "기록된 이벤트", body = EventResponse),
        (status = 400, description = "잘못된 입력", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "researcher 또는 admin 역할 필요", body = ApiErrorResponse)
    )
)]
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<EventRequest>,
) -> ApiResult<Json<EventResponse>> {
    let event = state.events.create(&user, validated(request)?).await?;
    Ok(Json(event.into()))
}

/// 이벤트 조회.
///
/// GET /events/{id}
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "이벤트 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "이벤트", body = EventResponse),
        (status = 404, description = "이벤트 없음", body = ApiErrorResponse)
    )
)]
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<EventResponse>> {
    let event = state.events.get(&user, id).await?;
    Ok(Json(event.into()))
}

/// 이벤트 수정.
///
/// PUT /events/{id}
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "이벤트 ID")),
    request_body = EventRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "수정된 이벤트", body = EventResponse),
        (status = 403, description = "admin 역할 필요", body = ApiErrorResponse),
        (status = 404, description = "이벤트 없음", body = ApiErrorResponse)
    )
)]
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<EventRequest>,
) -> ApiResult<Json<EventResponse>> {
    let event = state.events.update(&user, id, validated(request)?).await?;
    Ok(Json(event.into()))
}

/// 이벤트 삭제.
///
/// DELETE /events/{id}
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "이벤트 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "삭제됨"),
        (status = 403, description = "admin 역할 필요", body = ApiErrorResponse),
        (status = 404, description = "이벤트 없음", body = ApiErrorResponse)
    )
)]
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.events.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 보안 이벤트 라우터 생성.
pub fn events_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route(
            "/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}
