//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! `Arc<AppState>`로 래핑되어 Axum의 State extractor를 통해 주입됩니다.
//! 레코드에 대한 프로세스 내 락은 없으며, 공유 가변 상태는 DB 연결 풀뿐입니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use wraith_core::{AppConfig, DashboardConfig, Event, SecurityPolicy, TelemetryConfig};

use crate::auth::{AuthService, TokenIssuer};
use crate::repository::{
    PgResourceStore, PgUserRepository, Registry, ResourceStore, UserStore, EVENT_ACCESS,
    POLICY_ACCESS,
};

/// 애플리케이션 공유 상태.
pub struct AppState {
    /// 인증 코어 - 가입, 로그인, 토큰 인증
    pub auth: AuthService,

    /// 보안 정책 레지스트리
    pub policies: Registry<SecurityPolicy>,

    /// 보안 이벤트 레지스트리
    pub events: Registry<Event>,

    /// 데이터베이스 연결 풀 (테스트 상태에서는 None)
    pub db_pool: Option<PgPool>,

    /// 전역 종료 토큰 - 텔레메트리 WebSocket 등 장기 실행 태스크에 종료 전파
    pub shutdown: CancellationToken,

    /// 텔레메트리 스트림 설정
    pub telemetry: TelemetryConfig,

    /// `/settings`로 노출되는 설정
    pub dashboard: DashboardConfig,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: DateTime<Utc>,

    /// API 버전
    pub version: String,
}

/// 상태 구성에 필요한 저장소 묶음.
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub policies: Arc<dyn ResourceStore<SecurityPolicy>>,
    pub events: Arc<dyn ResourceStore<Event>>,
}

impl Stores {
    /// PostgreSQL 기반 저장소.
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            policies: Arc::new(PgResourceStore::<SecurityPolicy>::new(pool.clone())),
            events: Arc::new(PgResourceStore::<Event>::new(pool.clone())),
        }
    }
}

impl AppState {
    /// 새로운 AppState 생성.
    ///
    /// # 인자
    /// * `stores` - 사용자/정책/이벤트 저장소
    /// * `config` - 애플리케이션 설정
    /// * `jwt_secret` - 토큰 서명 키
    /// * `shutdown` - 전역 종료 토큰
    pub fn new(
        stores: Stores,
        config: &AppConfig,
        jwt_secret: impl Into<String>,
        shutdown: CancellationToken,
    ) -> Self {
        let tokens = TokenIssuer::new(jwt_secret, config.auth.token_ttl_minutes);

        Self {
            auth: AuthService::new(stores.users, tokens, config.auth.admin_emails.clone())
                .with_researcher_emails(config.auth.researcher_emails.clone()),
            policies: Registry::new(stores.policies, POLICY_ACCESS),
            events: Registry::new(stores.events, EVENT_ACCESS),
            db_pool: None,
            shutdown,
            telemetry: config.telemetry.clone(),
            dashboard: config.dashboard.clone(),
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 데이터베이스 연결 풀 설정.
    pub fn with_db_pool(mut self, pool: PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// DB 연결 상태 확인.
    ///
    /// 풀이 없으면 `None`.
    pub async fn is_db_healthy(&self) -> Option<bool> {
        let pool = self.db_pool.as_ref()?;
        Some(sqlx::query("SELECT 1").execute(pool).await.is_ok())
    }

    /// 서버 업타임 (초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

/// 테스트용 JWT 서명 키.
#[cfg(any(test, feature = "test-utils"))]
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

/// 인메모리 저장소로 구성된 테스트 상태.
///
/// `admin@wraith.net`으로 가입한 사용자는 관리자, `researcher@wraith.net`은 연구원 역할을 받습니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use crate::repository::memory::{MemoryResourceStore, MemoryUserStore};

    let mut config = AppConfig::default();
    config.auth.admin_emails = vec!["admin@wraith.net".to_string()];
    config.auth.researcher_emails = vec!["researcher@wraith.net".to_string()];

    let stores = Stores {
        users: Arc::new(MemoryUserStore::new()),
        policies: Arc::new(MemoryResourceStore::<SecurityPolicy>::new()),
        events: Arc::new(MemoryResourceStore::<Event>::new()),
    };

    AppState::new(stores, &config, TEST_JWT_SECRET, CancellationToken::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_test_state() {
        let state = create_test_state();

        assert!(state.db_pool.is_none());
        assert_eq!(state.is_db_healthy().await, None);
        assert_eq!(state.version, env!("CARGO_PKG_VERSION"));
        assert!(state.uptime_secs() >= 0);
        assert!(!state.shutdown.is_cancelled());
    }
}
