//! JWT 토큰 처리.
//!
//! HS256 서명 Access Token 발급/검증 로직.
//! 토큰은 저장되지 않으며 만료 전까지 유효합니다 (갱신/폐기 없음).

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT Access Token 페이로드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 ID
    pub sub: String,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
    /// JWT ID - 같은 초에 발급된 토큰도 구분되도록 하는 고유 식별자
    pub jti: String,
}

impl Claims {
    fn new(subject: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.into(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// 토큰이 만료되었는지 확인 (`exp <= now`).
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// 발급된 토큰 응답.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IssuedToken {
    /// Access Token
    pub access_token: String,
    /// 토큰 타입 (항상 "bearer")
    pub token_type: String,
    /// 만료까지 남은 시간 (초)
    pub expires_in: i64,
}

/// JWT 토큰 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
    #[error("유효하지 않은 토큰")]
    InvalidToken,
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("잘못된 토큰 형식")]
    Malformed,
}

/// 토큰 발급/검증기.
///
/// 프로세스 전역 비밀 키 하나로 서명합니다.
pub struct TokenIssuer {
    secret: SecretString,
    ttl: Duration,
}

impl TokenIssuer {
    /// 새 발급기 생성.
    ///
    /// # Arguments
    ///
    /// * `secret` - HMAC 서명 키
    /// * `ttl_minutes` - 토큰 유효 시간 (분)
    pub fn new(secret: impl Into<String>, ttl_minutes: i64) -> Self {
        Self {
            secret: SecretString::from(secret.into()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// 설정된 유효 시간으로 토큰 발급.
    pub fn issue(&self, subject: impl Into<String>) -> Result<IssuedToken, JwtError> {
        self.issue_with_ttl(subject, self.ttl)
    }

    /// 지정한 유효 시간으로 토큰 발급.
    pub fn issue_with_ttl(
        &self,
        subject: impl Into<String>,
        ttl: Duration,
    ) -> Result<IssuedToken, JwtError> {
        let claims = Claims::new(subject, ttl);
        let access_token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )?;

        Ok(IssuedToken {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: ttl.num_seconds(),
        })
    }

    /// 토큰 디코딩 및 검증.
    ///
    /// 서명 비교는 jsonwebtoken의 HMAC 검증에 위임하며, 만료 판정에 여유 시간은 두지 않습니다.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => JwtError::InvalidToken,
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            _ => JwtError::Malformed,
        })?;

        // jsonwebtoken은 exp == now를 유효로 보므로 경계값을 직접 거부
        if data.claims.is_expired() {
            return Err(JwtError::TokenExpired);
        }

        Ok(data.claims)
    }
}
