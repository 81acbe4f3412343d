//! 역할 기반 접근 제어 (RBAC)용 역할 정의.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 사용자 역할.
///
/// 사용자 레코드에 저장되며 보호된 작업의 접근 여부를 결정합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 일반 사용자 - 조회 및 정책 관리
    #[default]
    User,
    /// 연구원 - 보안 이벤트 기록 가능
    Researcher,
    /// 관리자 - 모든 권한 보유
    Admin,
}

impl Role {
    /// 모든 역할 목록.
    pub const ALL: [Role; 3] = [Role::User, Role::Researcher, Role::Admin];

    /// 저장소/직렬화에 사용하는 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Researcher => "researcher",
            Role::Admin => "admin",
        }
    }

    /// 문자열에서 역할 파싱 (대소문자 무시).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "user" => Some(Role::User),
            "researcher" => Some(Role::Researcher),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// 역할이 허용 목록에 포함되는지 확인.
    pub fn is_one_of(&self, allowed: &[Role]) -> bool {
        allowed.contains(self)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| CoreError::UnknownRole(s.to_string()))
    }
}

impl TryFrom<String> for Role {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("RESEARCHER"), Some(Role::Researcher));
        assert_eq!(Role::parse(" User "), Some(Role::User));
        assert_eq!(Role::parse("guest"), None);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Researcher).unwrap();
        assert_eq!(json, "\"researcher\"");

        let parsed: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Role::Researcher);
    }

    #[test]
    fn test_default_role_is_user() {
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_is_one_of() {
        let allowed = [Role::Researcher, Role::Admin];
        assert!(Role::Admin.is_one_of(&allowed));
        assert!(Role::Researcher.is_one_of(&allowed));
        assert!(!Role::User.is_one_of(&allowed));
        assert!(!Role::Admin.is_one_of(&[]));
    }

    proptest! {
        #[test]
        fn prop_display_parse_roundtrip(idx in 0usize..3) {
            let role = Role::ALL[idx];
            prop_assert_eq!(Role::try_from(role.to_string()).unwrap(), role);
        }
    }
}
