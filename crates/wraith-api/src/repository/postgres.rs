//! PostgreSQL 기반 제네릭 리소스 저장소.
//!
//! 리소스마다 테이블/컬럼 메타데이터와 바인딩 함수만 제공하면
//! 동일한 SQL 템플릿으로 CRUD와 토글을 수행합니다.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    FromRow, PgPool, Postgres,
};

use super::registry::{Page, Resource, ResourceStore};
use crate::error::{ServiceError, ServiceResult};

/// `query_as` 빌더 타입 별칭.
pub type PgQueryAs<'q, R> = QueryAs<'q, Postgres, R, PgArguments>;

/// PostgreSQL 테이블에 매핑되는 리소스.
pub trait PgResource: Resource + for<'r> FromRow<'r, PgRow> + Unpin {
    /// 테이블명
    const TABLE: &'static str;

    /// 초안에서 채워지는 컬럼 (바인딩 순서와 동일)
    const COLUMNS: &'static [&'static str];

    /// 수정 시 `NOW()`로 갱신할 컬럼
    const TOUCH_COLUMN: Option<&'static str> = None;

    /// `COLUMNS` 순서대로 초안 값을 바인딩.
    fn bind_draft<'q>(draft: Self::Draft, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self>;
}

fn touch_clause<R: PgResource>() -> String {
    R::TOUCH_COLUMN
        .map(|column| format!(", {} = NOW()", column))
        .unwrap_or_default()
}

pub(crate) fn insert_sql<R: PgResource>() -> String {
    let placeholders: Vec<String> = (1..=R::COLUMNS.len()).map(|i| format!("${}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
        R::TABLE,
        R::COLUMNS.join(", "),
        placeholders.join(", ")
    )
}

pub(crate) fn list_sql<R: PgResource>() -> String {
    format!("SELECT * FROM {} ORDER BY id ASC OFFSET $1 LIMIT $2", R::TABLE)
}

pub(crate) fn get_sql<R: PgResource>() -> String {
    format!("SELECT * FROM {} WHERE id = $1", R::TABLE)
}

pub(crate) fn update_sql<R: PgResource>() -> String {
    let assignments: Vec<String> = R::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ${}", column, i + 1))
        .collect();
    format!(
        "UPDATE {} SET {}{} WHERE id = ${} RETURNING *",
        R::TABLE,
        assignments.join(", "),
        touch_clause::<R>(),
        R::COLUMNS.len() + 1
    )
}

pub(crate) fn delete_sql<R: PgResource>() -> String {
    format!("DELETE FROM {} WHERE id = $1", R::TABLE)
}

pub(crate) fn toggle_sql<R: PgResource>(field: &str) -> String {
    format!(
        "UPDATE {} SET {field} = NOT {field}{} WHERE id = $1 RETURNING *",
        R::TABLE,
        touch_clause::<R>()
    )
}

/// 제네릭 PostgreSQL 리소스 저장소.
pub struct PgResourceStore<R> {
    pool: PgPool,
    _marker: PhantomData<fn() -> R>,
}

impl<R> PgResourceStore<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<R: PgResource> ResourceStore<R> for PgResourceStore<R> {
    async fn create(&self, draft: R::Draft) -> ServiceResult<R> {
        let sql = insert_sql::<R>();
        let record = R::bind_draft(draft, sqlx::query_as::<_, R>(&sql))
            .fetch_one(&self.pool)
            .await?;

        Ok(record)
    }

    async fn list(&self, page: Page) -> ServiceResult<Vec<R>> {
        let sql = list_sql::<R>();
        let records = sqlx::query_as::<_, R>(&sql)
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn get(&self, id: i64) -> ServiceResult<R> {
        let sql = get_sql::<R>();
        sqlx::query_as::<_, R>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(R::NAME, id))
    }

    async fn update(&self, id: i64, draft: R::Draft) -> ServiceResult<R> {
        let sql = update_sql::<R>();
        R::bind_draft(draft, sqlx::query_as::<_, R>(&sql))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(R::NAME, id))
    }

    async fn delete(&self, id: i64) -> ServiceResult<()> {
        let sql = delete_sql::<R>();
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::not_found(R::NAME, id));
        }

        Ok(())
    }

    async fn toggle(&self, id: i64) -> ServiceResult<R> {
        let field = R::TOGGLE_FIELD.ok_or_else(|| {
            ServiceError::Invalid(format!("{} does not support toggle", R::NAME))
        })?;

        // 단일 UPDATE 문으로 읽기-수정-쓰기 경합 없이 반전
        let sql = toggle_sql::<R>(field);
        sqlx::query_as::<_, R>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(R::NAME, id))
    }
}
