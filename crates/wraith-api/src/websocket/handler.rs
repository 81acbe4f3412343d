//! 텔레메트리 WebSocket 연결 handler.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::telemetry::TelemetryFrame;
use crate::metrics::{decrement_websocket_connections, increment_websocket_connections};
use crate::state::AppState;

/// 스트림 종료 사유.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// 클라이언트가 Close 전송 또는 연결 종료
    ClientClosed,
    /// 소켓 송수신 에러
    SocketError,
    /// 서버 종료
    Shutdown,
}

/// WebSocket 업그레이드 핸들러.
///
/// `GET /telemetry/ws`
pub async fn telemetry_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// WebSocket 연결 처리.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = uuid::Uuid::new_v4().to_string();
    info!(%session_id, "Telemetry WebSocket connected");
    increment_websocket_connections();

    let (sender, receiver) = socket.split();
    let interval = Duration::from_secs(state.telemetry.interval_secs.max(1));
    let end = stream_telemetry(
        sender,
        receiver,
        interval,
        state.telemetry.points,
        state.shutdown.clone(),
    )
    .await;

    decrement_websocket_connections();
    info!(%session_id, reason = ?end, "Telemetry WebSocket disconnected");
}

/// 연결이 끝날 때까지 주기적으로 텔레메트리 프레임을 전송합니다.
///
/// 첫 프레임은 즉시 전송되며, 종료 시 Close 프레임을 보냅니다.
pub async fn stream_telemetry<Tx, Rx, E>(
    mut sender: Tx,
    mut receiver: Rx,
    interval: Duration,
    points: usize,
    shutdown: CancellationToken,
) -> StreamEnd
where
    Tx: Sink<Message> + Unpin,
    Tx::Error: Display,
    Rx: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let mut ticker = tokio::time::interval(interval);

    let end = loop {
        tokio::select! {
            _ = shutdown.cancelled() => break StreamEnd::Shutdown,
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => {
                    debug!("Client closed telemetry stream");
                    break StreamEnd::ClientClosed;
                }
                // 텔레메트리는 단방향이므로 클라이언트 메시지는 무시
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = %e, "Telemetry WebSocket receive error");
                    break StreamEnd::SocketError;
                }
            },
            _ = ticker.tick() => {
                let json = match TelemetryFrame::generate(points).to_json() {
                    Ok(json) => json,
                    Err(e) => {
                        warn!(error = %e, "Telemetry frame serialization failed");
                        continue;
                    }
                };
                if let Err(e) = sender.send(Message::Text(json.into())).await {
                    debug!(error = %e, "Telemetry send failed");
                    break StreamEnd::SocketError;
                }
            }
        }
    };

    if end != StreamEnd::SocketError {
        let _ = sender.send(Message::Close(None)).await;
    }

    end
}

/// 텔레메트리 라우터 생성.
pub fn telemetry_router() -> Router<Arc<AppState>> {
    Router::new().route("/ws", get(telemetry_ws_handler))
}
