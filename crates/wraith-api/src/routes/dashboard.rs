//! 대시보드 정보 endpoint.
//!
//! - `GET /defense` - 방어 에이전트 요약 (데모 데이터)
//! - `GET /settings` - 시스템 설정 스냅샷

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// 에이전트 연결 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Online,
    Offline,
}

/// 방어 에이전트.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DefenseAgent {
    pub id: i64,
    pub name: String,
    pub status: AgentStatus,
    /// 마지막 응답 시점 (예: "2m ago")
    pub last_seen: String,
}

/// 방어 에이전트 요약.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DefenseSummary {
    pub count: usize,
    pub agents: Vec<DefenseAgent>,
}

/// 시스템 설정 스냅샷.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SettingsResponse {
    pub firewall_enabled: bool,
    pub auto_updates: bool,
    pub version: String,
    pub last_patch: String,
}

// 에이전트 레지스트리가 생기기 전까지 고정 목록
fn demo_agents() -> Vec<DefenseAgent> {
    [
        (1, "Agent Alpha", AgentStatus::Online, "2m ago"),
        (2, "Agent Beta", AgentStatus::Offline, "15m ago"),
        (3, "Agent Gamma", AgentStatus::Online, "1m ago"),
    ]
    .into_iter()
    .map(|(id, name, status, last_seen)| DefenseAgent {
        id,
        name: name.to_string(),
        status,
        last_seen: last_seen.to_string(),
    })
    .collect()
}

/// 방어 에이전트 요약.
///
/// GET /defense
#[utoipa::path(
    get,
    path = "/defense",
    tag = "dashboard",
    responses(
        (status = 200, description = "에이전트 요약", body = DefenseSummary)
    )
)]
pub async fn get_defense() -> Json<DefenseSummary> {
    let agents = demo_agents();
    Json(DefenseSummary {
        count: agents.len(),
        agents,
    })
}

/// 시스템 설정 조회.
///
/// GET /settings
#[utoipa::path(
    get,
    path = "/settings",
    tag = "dashboard",
    responses(
        (status = 200, description = "설정 스냅샷", body = SettingsResponse)
    )
)]
pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<SettingsResponse> {
    Json(SettingsResponse {
        firewall_enabled: state.dashboard.firewall_enabled,
        auto_updates: state.dashboard.auto_updates,
        version: state.version.clone(),
        last_patch: state.dashboard.last_patch.clone(),
    })
}

/// 대시보드 라우터 생성.
pub fn dashboard_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/defense", get(get_defense))
        .route("/settings", get(get_settings))
}
