//! 인증 및 권한 부여.
//!
//! JWT 기반 인증과 역할 기반 접근 제어(RBAC)를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`TokenIssuer`]: HS256 Access Token 발급/검증
//! - [`hash_password`] / [`verify_password`]: Argon2id 비밀번호 처리
//! - [`AuthService`]: 가입, 로그인, 토큰 인증
//! - [`CurrentUser`]: Axum 핸들러용 인증 추출기
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
//!     format!("Hello, {}!", user.username)
//! }
//! ```

mod jwt;
mod middleware;
mod password;
mod service;

pub use jwt::{Claims, IssuedToken, JwtError, TokenIssuer};
pub use middleware::{AuthRejection, CurrentUser};
pub use password::{hash_password, verify_password, PasswordError};
pub use service::{require_role, AuthService};
pub use wraith_core::Role;
