//! 사용자 계정 엔티티.

use chrono::{DateTime, Utc};

use super::Role;

/// 저장된 사용자 레코드.
///
/// `password_hash`는 PHC 형식 Argon2 해시이며 평문 비밀번호는 저장하지 않습니다.
/// 직렬화를 구현하지 않으므로 응답에는 별도의 프로필 타입을 사용해야 합니다.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct User {
    /// 사용자 ID (저장소에서 할당, 불변)
    pub id: i64,
    /// 사용자 이름
    pub username: String,
    /// 이메일 (전체 사용자 중 유일, 소문자 정규화)
    pub email: String,
    /// 비밀번호 해시
    pub password_hash: String,
    /// 역할
    #[cfg_attr(feature = "sqlx-support", sqlx(try_from = "String"))]
    pub role: Role,
    /// 생성 시각
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// 신규 사용자 입력.
///
/// 비밀번호는 이미 해싱된 상태로 전달됩니다.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// 이메일 정규화 (앞뒤 공백 제거 + 소문자).
///
/// 유일성 검사와 로그인 조회 모두 정규화된 값을 사용합니다.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
