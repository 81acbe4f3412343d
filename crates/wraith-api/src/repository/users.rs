//! 사용자 자격증명 저장소.

use async_trait::async_trait;
use sqlx::PgPool;
use wraith_core::{NewUser, User};

use crate::error::ServiceResult;

/// 사용자 레코드 저장소.
///
/// 이메일은 호출 측에서 정규화된 값으로 전달합니다.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>>;

    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<User>>;

    /// 새 사용자 저장. 이메일 유일성 위반은 `Conflict`로 변환됩니다.
    async fn insert(&self, user: NewUser) -> ServiceResult<User>;
}

/// PostgreSQL 사용자 저장소.
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> ServiceResult<User> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, role, created_at
            "#,
        )
        .bind(user.username)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
