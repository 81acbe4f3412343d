//! 도메인 에러 타입.
//!
//! 도메인 값 파싱 중 발생하는 에러를 정의합니다.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 알 수 없는 역할 문자열
    #[error("알 수 없는 역할: {0}")]
    UnknownRole(String),

    /// 알 수 없는 심각도 문자열
    #[error("알 수 없는 심각도: {0}")]
    UnknownSeverity(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownRole("root".to_string());
        assert_eq!(err.to_string(), "알 수 없는 역할: root");

        let err = CoreError::UnknownSeverity("urgent".to_string());
        assert!(err.to_string().contains("urgent"));
    }
}
