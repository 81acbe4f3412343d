//! 데이터 접근 계층.
//!
//! - [`UserStore`]: 사용자 자격증명 저장소
//! - [`ResourceStore`] / [`Registry`]: 보안 정책·이벤트 공용 CRUD 레지스트리
//! - [`PgResourceStore`]: 레지스트리의 PostgreSQL 구현

mod events;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
mod policies;
pub mod postgres;
pub mod registry;
pub mod users;

pub use events::EVENT_ACCESS;
pub use policies::POLICY_ACCESS;
pub use postgres::{PgResource, PgResourceStore};
pub use registry::{AccessPolicy, Gate, Page, Registry, Resource, ResourceStore};
pub use users::{PgUserRepository, UserStore};
