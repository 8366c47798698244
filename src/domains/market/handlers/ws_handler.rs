use crate::domains::market::models::MarketUpdate;
use crate::shared::services::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

/// 시세 스트림 WebSocket
/// Market stream handler
///
/// 연결 직후 최신 스냅샷을 한 번 보내고, 이후 market:update 를 계속 전달합니다.
pub async fn market_stream(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

async fn handle_socket(socket: WebSocket, app_state: AppState) {
    let feed = app_state.market_state.feed.clone();
    let mut rx = feed.subscribe();
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let snapshot = feed.latest();

    // 클라이언트로 메시지 전송 태스크
    let mut send_task = tokio::spawn(async move {
        if !snapshot.is_empty() && send_update(&mut ws_sender, &MarketUpdate::new(snapshot)).await.is_err() {
            return;
        }

        loop {
            match rx.recv().await {
                Ok(update) => {
                    if send_update(&mut ws_sender, &update).await.is_err() {
                        // 클라이언트 연결 끊어짐
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "market stream subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // 클라이언트 메시지는 Close 만 처리
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    // 둘 중 하나가 종료되면 전체 종료
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    debug!("market stream client disconnected");
}

async fn send_update<S>(sender: &mut S, update: &MarketUpdate) -> Result<(), ()>
where
    S: SinkExt<Message> + Unpin,
{
    let json = serde_json::to_string(update).map_err(|e| {
        warn!(error = %e, "failed to serialize market update");
    })?;
    sender.send(Message::Text(json)).await.map_err(|_| ())
}
