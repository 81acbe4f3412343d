//! 보안 정책 저장소 매핑.

use wraith_core::{PolicyDraft, SecurityPolicy};

use super::postgres::{PgQueryAs, PgResource};
use super::registry::{AccessPolicy, Resource};

/// 정책 작업은 인증된 사용자 모두에게 허용.
pub const POLICY_ACCESS: AccessPolicy = AccessPolicy::OPEN;

impl Resource for SecurityPolicy {
    type Draft = PolicyDraft;

    const NAME: &'static str = "policy";
    const TOGGLE_FIELD: Option<&'static str> = Some("enabled");

    fn id(&self) -> i64 {
        self.id
    }
}

impl PgResource for SecurityPolicy {
    const TABLE: &'static str = "security_policies";
    const COLUMNS: &'static [&'static str] = &["name", "description", "enabled"];
    const TOUCH_COLUMN: Option<&'static str> = Some("updated_at");

    fn bind_draft<'q>(draft: PolicyDraft, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(draft.name)
            .bind(draft.description)
            .bind(draft.enabled)
    }
}
