//! 보안 이벤트 엔티티.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 보안 이벤트 심각도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// 저장소/직렬화에 사용하는 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(CoreError::UnknownSeverity(s.to_string())),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// 저장된 보안 이벤트 레코드.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct Event {
    /// 이벤트 ID
    pub id: i64,
    /// 기록 시각 (서버 할당)
    pub timestamp: DateTime<Utc>,
    /// 발생 출처 (센서, 호스트 등)
    pub source: String,
    /// 분류
    pub category: String,
    /// 심각도
    #[cfg_attr(feature = "sqlx-support", sqlx(try_from = "String"))]
    pub severity: Severity,
    /// 메시지
    pub message: String,
}

/// 보안 이벤트 생성/수정 입력.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub source: String,
    pub category: String,
    pub severity: Severity,
    pub message: String,
}

impl Event {
    /// 서버 할당 필드를 제외한 내용이 초안과 같은지 확인.
    pub fn matches(&self, draft: &EventDraft) -> bool {
        self.source == draft.source
            && self.category == draft.category
            && self.severity == draft.severity
            && self.message == draft.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parse() {
        assert_eq!("HIGH".parse::<Severity>().unwrap(), Severity::High);
        assert_eq!("low".parse::<Severity>().unwrap(), Severity::Low);
        assert!("urgent".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_serialization() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        assert_eq!(
            Severity::try_from("medium".to_string()).unwrap(),
            Severity::Medium
        );
    }

    #[test]
    fn test_event_matches_draft() {
        let draft = EventDraft {
            source: "ids-01".to_string(),
            category: "intrusion".to_string(),
            severity: Severity::High,
            message: "port scan detected".to_string(),
        };
        let event = Event {
            id: 7,
            timestamp: Utc::now(),
            source: draft.source.clone(),
            category: draft.category.clone(),
            severity: draft.severity,
            message: draft.message.clone(),
        };

        assert!(event.matches(&draft));
        assert!(!event.matches(&EventDraft {
            severity: Severity::Low,
            ..draft
        }));
    }
}
