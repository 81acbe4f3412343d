//! 제네릭 리소스 레지스트리.
//!
//! 보안 정책과 보안 이벤트는 같은 CRUD + 토글 패턴을 공유합니다.
//! [`ResourceStore`]가 저장소를 추상화하고, [`Registry`]가 그 위에 역할 게이트를 적용합니다.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;
use wraith_core::{Role, User};

use crate::auth::require_role;
use crate::error::{ServiceError, ServiceResult};

/// 레지스트리로 관리되는 레코드.
pub trait Resource: Clone + Send + Sync + 'static {
    /// 생성/수정 입력 타입 (서버 할당 필드 제외)
    type Draft: Send + Sync + 'static;

    /// 로그 및 에러 메시지에 쓰는 리소스 이름
    const NAME: &'static str;

    /// 토글 가능한 불리언 필드 (저장소 컬럼명과 동일)
    const TOGGLE_FIELD: Option<&'static str> = None;

    fn id(&self) -> i64;
}

/// 목록 조회 페이지 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Page {
    /// 건너뛸 레코드 수 (기본값: 0)
    #[serde(default)]
    pub skip: i64,
    /// 최대 레코드 수 (기본값: 50, 1..=500)
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    Page::DEFAULT_LIMIT
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 500;

    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }.clamped()
    }

    /// 음수 skip은 0으로, limit은 `1..=MAX_LIMIT`로 보정.
    pub fn clamped(self) -> Self {
        Self {
            skip: self.skip.max(0),
            limit: self.limit.clamp(1, Self::MAX_LIMIT),
        }
    }
}

/// 리소스 저장소.
///
/// 목록은 항상 `id` 오름차순(삽입 순)으로 반환합니다.
#[async_trait]
pub trait ResourceStore<R: Resource>: Send + Sync {
    async fn create(&self, draft: R::Draft) -> ServiceResult<R>;

    async fn list(&self, page: Page) -> ServiceResult<Vec<R>>;

    async fn get(&self, id: i64) -> ServiceResult<R>;

    async fn update(&self, id: i64, draft: R::Draft) -> ServiceResult<R>;

    async fn delete(&self, id: i64) -> ServiceResult<()>;

    /// 토글 필드를 원자적으로 반전하고 갱신된 레코드를 반환.
    async fn toggle(&self, id: i64) -> ServiceResult<R>;
}

/// 작업별 접근 조건.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// 인증된 사용자 누구나
    Authenticated,
    /// 나열된 역할 중 하나
    Roles(&'static [Role]),
}

impl Gate {
    fn check(&self, user: &User) -> ServiceResult<()> {
        match self {
            Gate::Authenticated => Ok(()),
            Gate::Roles(allowed) => require_role(user, allowed),
        }
    }
}

/// 레지스트리 접근 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    /// list / get
    pub read: Gate,
    /// create
    pub create: Gate,
    /// update / delete / toggle
    pub mutate: Gate,
}

impl AccessPolicy {
    /// 모든 작업을 인증된 사용자에게 허용.
    pub const OPEN: AccessPolicy = AccessPolicy {
        read: Gate::Authenticated,
        create: Gate::Authenticated,
        mutate: Gate::Authenticated,
    };
}

/// 역할 게이트가 적용된 리소스 레지스트리.
pub struct Registry<R: Resource> {
    store: Arc<dyn ResourceStore<R>>,
    access: AccessPolicy,
}

impl<R: Resource> Registry<R> {
    pub fn new(store: Arc<dyn ResourceStore<R>>, access: AccessPolicy) -> Self {
        Self { store, access }
    }

    pub async fn create(&self, user: &User, draft: R::Draft) -> ServiceResult<R> {
        self.access.create.check(user)?;

        let record = self.store.create(draft).await?;
        info!(resource = R::NAME, id = record.id(), user_id = user.id, "Resource created");
        Ok(record)
    }

    pub async fn list(&self, user: &User, page: Page) -> ServiceResult<Vec<R>> {
        self.access.read.check(user)?;
        self.store.list(page.clamped()).await
    }

    pub async fn get(&self, user: &User, id: i64) -> ServiceResult<R> {
        self.access.read.check(user)?;
        self.store.get(id).await
    }

    pub async fn update(&self, user: &User, id: i64, draft: R::Draft) -> ServiceResult<R> {
        self.access.mutate.check(user)?;

        let record = self.store.update(id, draft).await?;
        info!(resource = R::NAME, id, user_id = user.id, "Resource updated");
        Ok(record)
    }

    pub async fn delete(&self, user: &User, id: i64) -> ServiceResult<()> {
        self.access.mutate.check(user)?;

        self.store.delete(id).await?;
        info!(resource = R::NAME, id, user_id = user.id, "Resource deleted");
        Ok(())
    }

    pub async fn toggle(&self, user: &User, id: i64) -> ServiceResult<R> {
        self.access.mutate.check(user)?;

        let Some(field) = R::TOGGLE_FIELD else {
            return Err(ServiceError::Invalid(format!(
                "{} does not support toggle",
                R::NAME
            )));
        };

        let record = self.store.toggle(id).await?;
        info!(resource = R::NAME, id, field, user_id = user.id, "Resource toggled");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::MemoryResourceStore;
    use chrono::Utc;
    use proptest::prelude::*;
    use wraith_core::{Event, EventDraft, PolicyDraft, SecurityPolicy, Severity};

    fn user_with(role: Role) -> User {
        User {
            id: 1,
            username: "tester".to_string(),
            email: "tester@wraith.net".to_string(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
        }
    }

    fn policy_draft(name: &str) -> PolicyDraft {
        PolicyDraft {
            name: name.to_string(),
            description: None,
            enabled: true,
        }
    }

    fn policy_registry() -> Registry<SecurityPolicy> {
        Registry::new(Arc::new(MemoryResourceStore::new()), AccessPolicy::OPEN)
    }

    fn event_registry() -> Registry<Event> {
        Registry::new(
            Arc::new(MemoryResourceStore::new()),
            crate::repository::EVENT_ACCESS,
        )
    }

    #[test]
    fn test_page_defaults_and_clamp() {
        assert_eq!(Page::default(), Page { skip: 0, limit: 50 });
        assert_eq!(Page::new(-3, 0), Page { skip: 0, limit: 1 });
        assert_eq!(Page::new(10, 10_000), Page { skip: 10, limit: 500 });
    }

    proptest! {
        #[test]
        fn prop_clamped_page_in_bounds(skip in any::<i64>(), limit in any::<i64>()) {
            let page = Page::new(skip, limit);
            prop_assert!(page.skip >= 0);
            prop_assert!((1..=Page::MAX_LIMIT).contains(&page.limit));
        }
    }

    #[tokio::test]
    async fn test_create_then_get_returns_equal_record() {
        let registry = policy_registry();
        let user = user_with(Role::User);
        let draft = policy_draft("Block Port Scans");

        let created = registry.create(&user, draft.clone()).await.unwrap();
        let fetched = registry.get(&user, created.id).await.unwrap();

        assert_eq!(created, fetched);
        assert!(fetched.matches(&draft));
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_value() {
        let registry = policy_registry();
        let user = user_with(Role::User);
        let created = registry.create(&user, policy_draft("p")).await.unwrap();

        let once = registry.toggle(&user, created.id).await.unwrap();
        assert_eq!(once.enabled, !created.enabled);

        let twice = registry.toggle(&user, created.id).await.unwrap();
        assert_eq!(twice.enabled, created.enabled);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let registry = policy_registry();
        let user = user_with(Role::User);
        let created = registry.create(&user, policy_draft("p")).await.unwrap();

        registry.delete(&user, created.id).await.unwrap();

        assert!(matches!(
            registry.get(&user, created.id).await,
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(
            registry.delete(&user, created.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_is_insertion_ordered_and_paged() {
        let registry = policy_registry();
        let user = user_with(Role::User);
        for i in 0..5 {
            registry.create(&user, policy_draft(&format!("p{i}"))).await.unwrap();
        }

        let all = registry.list(&user, Page::default()).await.unwrap();
        let names: Vec<_> = all.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["p0", "p1", "p2", "p3", "p4"]);

        let page = registry.list(&user, Page::new(1, 2)).await.unwrap();
        let names: Vec<_> = page.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_event_gates() {
        let registry = event_registry();
        let draft = EventDraft {
            source: "ids-01".to_string(),
            category: "intrusion".to_string(),
            severity: Severity::High,
            message: "port scan detected".to_string(),
        };

        let plain = user_with(Role::User);
        assert!(matches!(
            registry.create(&plain, draft.clone()).await,
            Err(ServiceError::Forbidden)
        ));

        let researcher = user_with(Role::Researcher);
        let event = registry.create(&researcher, draft).await.unwrap();

        // 조회는 인증된 사용자 누구나
        assert_eq!(registry.get(&plain, event.id).await.unwrap(), event);
        assert!(matches!(
            registry.delete(&researcher, event.id).await,
            Err(ServiceError::Forbidden)
        ));

        let admin = user_with(Role::Admin);
        registry.delete(&admin, event.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_toggle_unsupported_resource() {
        let registry = event_registry();
        let admin = user_with(Role::Admin);

        assert!(matches!(
            registry.toggle(&admin, 1).await,
            Err(ServiceError::Invalid(_))
        ));
    }
}
