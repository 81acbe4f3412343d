//! 대시보드 운영을 위한 도메인 모델.

mod event;
mod policy;
mod role;
mod user;

pub use event::*;
pub use policy::*;
pub use role::*;
pub use user::*;
