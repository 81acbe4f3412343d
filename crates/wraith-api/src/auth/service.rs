//! 인증 코어.
//!
//! 가입/로그인/토큰 인증과 역할 검사를 담당합니다.
//! 로그인 실패 사유(이메일 없음/비밀번호 불일치)는 외부에 구분해서 드러내지 않습니다.

use std::sync::{Arc, OnceLock};

use tracing::{debug, info};
use wraith_core::{normalize_email, NewUser, Role, User};

use super::jwt::{IssuedToken, JwtError, TokenIssuer};
use super::password::{hash_password, verify_password};
use crate::error::{ServiceError, ServiceResult};
use crate::repository::UserStore;

/// 사용자 이름 최대 길이 (문자 수).
pub const MAX_USERNAME_CHARS: usize = 50;

// 알 수 없는 이메일 로그인에서 검증 비용을 맞추기 위한 비밀번호
const DUMMY_PASSWORD: &str = "wraithnet-login-timing-equalizer";

/// 인증 서비스.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenIssuer,
    admin_emails: Vec<String>,
    researcher_emails: Vec<String>,
    dummy_hash: OnceLock<String>,
}

impl AuthService {
    /// # Arguments
    ///
    /// * `admin_emails` - 가입 시 관리자 역할을 부여할 이메일 (정규화 후 비교)
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenIssuer, admin_emails: Vec<String>) -> Self {
        Self {
            users,
            tokens,
            admin_emails: admin_emails.iter().map(|e| normalize_email(e)).collect(),
            researcher_emails: Vec::new(),
            dummy_hash: OnceLock::new(),
        }
    }

    /// 가입 시 연구원 역할을 부여할 이메일 설정. 관리자 목록이 우선합니다.
    pub fn with_researcher_emails(mut self, emails: Vec<String>) -> Self {
        self.researcher_emails = emails.iter().map(|e| normalize_email(e)).collect();
        self
    }

    fn role_for(&self, email: &str) -> Role {
        if self.admin_emails.iter().any(|e| e == email) {
            Role::Admin
        } else if self.researcher_emails.iter().any(|e| e == email) {
            Role::Researcher
        } else {
            Role::default()
        }
    }

    fn dummy_hash(&self) -> &str {
        self.dummy_hash
            .get_or_init(|| hash_password(DUMMY_PASSWORD).unwrap_or_default())
    }

    fn issue(&self, user_id: i64) -> ServiceResult<IssuedToken> {
        self.tokens
            .issue(user_id.to_string())
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }

    /// 신규 사용자 등록 후 토큰 발급.
    ///
    /// 입력 형식 검증은 요청 타입에서 끝난 상태로 호출됩니다.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ServiceResult<IssuedToken> {
        let username = username.trim();
        let username_chars = username.chars().count();
        if username_chars == 0 || username_chars > MAX_USERNAME_CHARS {
            return Err(ServiceError::Invalid(format!(
                "사용자 이름은 1~{}자여야 합니다",
                MAX_USERNAME_CHARS
            )));
        }

        let email = normalize_email(email);

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::Conflict("이미 등록된 이메일입니다".to_string()));
        }

        let password_hash =
            hash_password(password).map_err(|e| ServiceError::Internal(e.to_string()))?;
        let role = self.role_for(&email);

        let user = self
            .users
            .insert(NewUser {
                username: username.to_string(),
                email,
                password_hash,
                role,
            })
            .await
            .map_err(|e| match e {
                // 동시 가입 경합에서 유일성 위반이 발생해도 같은 메시지
                ServiceError::Conflict(_) => {
                    ServiceError::Conflict("이미 등록된 이메일입니다".to_string())
                }
                other => other,
            })?;

        info!(user_id = user.id, role = %user.role, "User registered");
        self.issue(user.id)
    }

    /// 이메일/비밀번호 로그인.
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<IssuedToken> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            // 이메일 존재 여부가 응답 시간으로 드러나지 않도록 같은 검증 수행
            let _ = verify_password(password, self.dummy_hash());
            debug!("Login rejected: unknown email");
            return Err(ServiceError::Unauthorized);
        };

        if !verify_password(password, &user.password_hash) {
            debug!(user_id = user.id, "Login rejected: password mismatch");
            return Err(ServiceError::Unauthorized);
        }

        self.issue(user.id)
    }

    /// Bearer 토큰을 사용자로 해석.
    ///
    /// 저장소 연결 장애는 `Unauthorized`로 가리지 않고 그대로 전달합니다.
    pub async fn authenticate(&self, token: &str) -> ServiceResult<User> {
        let claims = self.tokens.verify(token).map_err(|e| {
            match e {
                JwtError::TokenExpired => debug!("Token rejected: expired"),
                other => debug!(error = %other, "Token rejected"),
            }
            ServiceError::Unauthorized
        })?;

        let Ok(user_id) = claims.sub.parse::<i64>() else {
            debug!("Token rejected: non-numeric subject");
            return Err(ServiceError::Unauthorized);
        };

        self.users.find_by_id(user_id).await?.ok_or_else(|| {
            debug!(user_id, "Token rejected: subject no longer exists");
            ServiceError::Unauthorized
        })
    }
}

/// 사용자 역할이 허용 목록에 포함되는지 검사.
pub fn require_role(user: &User, allowed: &[Role]) -> ServiceResult<()> {
    if user.role.is_one_of(allowed) {
        Ok(())
    } else {
        debug!(user_id = user.id, role = %user.role, "Role check failed");
        Err(ServiceError::Forbidden)
    }
}
