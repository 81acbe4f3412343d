//! # Wraith Core
//!
//! WraithNet 대시보드의 핵심 도메인 모델 및 공통 인프라를 제공합니다.
//!
//! - 사용자 및 역할 정의
//! - 보안 정책 / 보안 이벤트 엔티티
//! - 설정 관리
//! - 로깅 인프라
//! - 도메인 에러 타입

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
