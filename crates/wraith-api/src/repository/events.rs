//! 보안 이벤트 저장소 매핑.

use wraith_core::{Event, EventDraft, Role};

use super::postgres::{PgQueryAs, PgResource};
use super::registry::{AccessPolicy, Gate, Resource};

/// 조회는 인증된 사용자 누구나, 기록은 연구원 이상, 수정/삭제는 관리자만.
pub const EVENT_ACCESS: AccessPolicy = AccessPolicy {
    read: Gate::Authenticated,
    create: Gate::Roles(&[Role::Researcher, Role::Admin]),
    mutate: Gate::Roles(&[Role::Admin]),
};

impl Resource for Event {
    type Draft = EventDraft;

    const NAME: &'static str = "event";

    fn id(&self) -> i64 {
        self.id
    }
}

impl PgResource for Event {
    const TABLE: &'static str = "events";
    const COLUMNS: &'static [&'static str] = &["source", "category", "severity", "message"];

    fn bind_draft<'q>(draft: EventDraft, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(draft.source)
            .bind(draft.category)
            .bind(draft.severity.as_str())
            .bind(draft.message)
    }
}
