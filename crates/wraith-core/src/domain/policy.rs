//! 보안 정책 엔티티.

use chrono::{DateTime, Utc};

/// 저장된 보안 정책 레코드.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct SecurityPolicy {
    /// 정책 ID
    pub id: i64,
    /// 정책 이름
    pub name: String,
    /// 정책 설명
    pub description: Option<String>,
    /// 활성화 여부
    pub enabled: bool,
    /// 생성 시각
    pub created_at: DateTime<Utc>,
    /// 수정 시각
    pub updated_at: DateTime<Utc>,
}

/// 보안 정책 생성/수정 입력.
///
/// 서버가 할당하는 필드(ID, 타임스탬프)를 제외한 나머지 필드.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDraft {
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
}

impl SecurityPolicy {
    /// 서버 할당 필드를 제외한 내용이 초안과 같은지 확인.
    pub fn matches(&self, draft: &PolicyDraft) -> bool {
        self.name == draft.name
            && self.description == draft.description
            && self.enabled == draft.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_matches_draft() {
        let draft = PolicyDraft {
            name: "Block Port Scans".to_string(),
            description: Some("Detect and block network port scans".to_string()),
            enabled: true,
        };
        let now = Utc::now();
        let policy = SecurityPolicy {
            id: 1,
            name: draft.name.clone(),
            description: draft.description.clone(),
            enabled: true,
            created_at: now,
            updated_at: now,
        };

        assert!(policy.matches(&draft));
        assert!(!policy.matches(&PolicyDraft {
            enabled: false,
            ..draft
        }));
    }
}
