use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info};

use super::hub::WsHub;
use crate::state::AppState;

/// HTTP хэндлер, апгрейдящий соединение до WebSocket
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.hub))
}

/// Обслуживает одно соединение после апгрейда: регистрирует его в хабе,
/// пересылает исходящие сообщения из канала и снимает регистрацию при
/// разрыве
async fn handle_socket(socket: WebSocket, hub: Arc<WsHub>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    info!(conn_id = %conn_id, "подписчик подключился");

    let mut rx = hub.add(conn_id.clone()).await;
    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                debug!(conn_id = %sender_conn_id, "сокет закрыт при отправке");
                break;
            }
        }
    });

    // Клиентский протокол не определён: любое входящее сообщение с данными
    // приводит к отключению клиента
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(_) => {
                info!(conn_id = %conn_id, "получены данные от клиента, отключаем");
                break;
            }
            Err(e) => {
                debug!(conn_id = %conn_id, "ошибка приёма: {}", e);
                break;
            }
        }
    }

    hub.remove(&conn_id).await;
    send_task.abort();
    info!(conn_id = %conn_id, "подписчик отключился");
}
