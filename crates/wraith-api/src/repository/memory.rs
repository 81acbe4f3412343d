//! 테스트용 인메모리 저장소.
//!
//! DB 없이 인증 코어와 레지스트리, 라우터를 검증하기 위한 대역입니다.
//! `test-utils` feature 또는 테스트 빌드에서만 컴파일됩니다.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use wraith_core::{Event, EventDraft, NewUser, PolicyDraft, SecurityPolicy, User};

use super::registry::{Page, Resource, ResourceStore};
use super::users::UserStore;
use crate::error::{ServiceError, ServiceResult};

/// 인메모리 저장이 가능한 리소스.
pub trait InMemoryRecord: Resource {
    fn from_draft(id: i64, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    fn apply_draft(&mut self, draft: Self::Draft, now: DateTime<Utc>);

    /// 토글 필드 반전. 토글 필드가 없으면 `false`.
    fn flip_flag(&mut self, _now: DateTime<Utc>) -> bool {
        false
    }
}

impl InMemoryRecord for SecurityPolicy {
    fn from_draft(id: i64, draft: PolicyDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            enabled: draft.enabled,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_draft(&mut self, draft: PolicyDraft, now: DateTime<Utc>) {
        self.name = draft.name;
        self.description = draft.description;
        self.enabled = draft.enabled;
        self.updated_at = now;
    }

    fn flip_flag(&mut self, now: DateTime<Utc>) -> bool {
        self.enabled = !self.enabled;
        self.updated_at = now;
        true
    }
}

impl InMemoryRecord for Event {
    fn from_draft(id: i64, draft: EventDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            timestamp: now,
            source: draft.source,
            category: draft.category,
            severity: draft.severity,
            message: draft.message,
        }
    }

    fn apply_draft(&mut self, draft: EventDraft, _now: DateTime<Utc>) {
        self.source = draft.source;
        self.category = draft.category;
        self.severity = draft.severity;
        self.message = draft.message;
    }
}

struct Table<R> {
    rows: BTreeMap<i64, R>,
    next_id: i64,
}

/// 인메모리 리소스 저장소.
///
/// ID는 1부터 증가하며 삭제 후에도 재사용되지 않습니다.
pub struct MemoryResourceStore<R> {
    table: RwLock<Table<R>>,
}

impl<R> MemoryResourceStore<R> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl<R> Default for MemoryResourceStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: InMemoryRecord> ResourceStore<R> for MemoryResourceStore<R> {
    async fn create(&self, draft: R::Draft) -> ServiceResult<R> {
        let mut table = self.table.write().await;
        let id = table.next_id;
        table.next_id += 1;

        let record = R::from_draft(id, draft, Utc::now());
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn list(&self, page: Page) -> ServiceResult<Vec<R>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> ServiceResult<R> {
        let table = self.table.read().await;
        table
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found(R::NAME, id))
    }

    async fn update(&self, id: i64, draft: R::Draft) -> ServiceResult<R> {
        let mut table = self.table.write().await;
        let record = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| ServiceError::not_found(R::NAME, id))?;

        record.apply_draft(draft, Utc::now());
        Ok(record.clone())
    }

    async fn delete(&self, id: i64) -> ServiceResult<()> {
        let mut table = self.table.write().await;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found(R::NAME, id))
    }

    async fn toggle(&self, id: i64) -> ServiceResult<R> {
        let mut table = self.table.write().await;
        let record = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| ServiceError::not_found(R::NAME, id))?;

        if !record.flip_flag(Utc::now()) {
            return Err(ServiceError::Invalid(format!(
                "{} does not support toggle",
                R::NAME
            )));
        }
        Ok(record.clone())
    }
}

/// 인메모리 사용자 저장소.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
    unavailable: AtomicBool,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장소 연결 장애를 흉내냅니다.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> ServiceResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        self.check_available()?;
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<User>> {
        self.check_available()?;
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: NewUser) -> ServiceResult<User> {
        self.check_available()?;
        let mut users = self.users.write().await;

        // users.email UNIQUE 제약과 동일
        if users.iter().any(|u| u.email == user.email) {
            return Err(ServiceError::Conflict("이미 존재하는 값입니다".to_string()));
        }

        let created = User {
            id: users.len() as i64 + 1,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }
}
