//! 텔레메트리 WebSocket.
//!
//! `/telemetry/ws`에 연결하면 서버가 주기적으로(기본 2초) CPU/메모리 사용률 프레임을 전송합니다.
//! 연결마다 독립된 태스크로 동작하며 클라이언트 종료, 소켓 에러, 서버 종료 시 멈춥니다.

pub mod handler;
pub mod telemetry;

pub use handler::{stream_telemetry, telemetry_router, telemetry_ws_handler, StreamEnd};
pub use telemetry::{TelemetryFrame, UsagePoint};
