use std::collections::HashMap;

use axum::extract::ws::Message;
use serde::Serialize;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, warn};

use crate::storage::DeviceRecord;

/// Отправляющая половина канала одного подписчика
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Конверт исходящего сообщения для подписчиков
#[derive(Serialize)]
struct UpdateEnvelope<'a> {
    r#type: &'static str,
    payload: &'a [DeviceRecord],
}

/// Реестр живых WebSocket подписчиков. Подключение и отключение меняют
/// набор асинхронно относительно рассылки; рассылка только читает его
pub struct WsHub {
    clients: RwLock<HashMap<String, WsSender>>,
}

impl WsHub {
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Регистрирует подписчика и возвращает приёмную половину его канала
    pub async fn add(&self, conn_id: String) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.clients.write().await.insert(conn_id, tx);
        rx
    }

    pub async fn remove(&self, conn_id: &str) {
        self.clients.write().await.remove(conn_id);
    }

    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Рассылает весь набор записей каждому живому подписчику в конверте
    /// {"type":"update","payload":...}. Отказ одного подписчика не влияет
    /// на остальных; возвращает число доставок
    pub async fn broadcast(&self, records: &[DeviceRecord]) -> usize {
        let envelope = UpdateEnvelope {
            r#type: "update",
            payload: records,
        };
        let json = match serde_json::to_string(&envelope) {
            Ok(json) => json,
            Err(e) => {
                warn!("не удалось сериализовать рассылку: {}", e);
                return 0;
            }
        };

        let clients = self.clients.read().await;
        let mut delivered = 0;
        for (conn_id, sender) in clients.iter() {
            // Закрытый канал — подписчик уже отвалился и будет снят своей
            // задачей; просто пропускаем
            match sender.send(Message::Text(json.clone().into())) {
                Ok(()) => delivered += 1,
                Err(_) => debug!(conn_id = %conn_id, "пропуск неготового подписчика"),
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::DeviceSnapshot;
    use chrono::Utc;

    fn record(ip: &str) -> DeviceRecord {
        DeviceRecord {
            ip_address: ip.to_string(),
            current_fields: DeviceSnapshot::Offline,
            birth_snapshot: DeviceSnapshot::Offline,
            last_updated: Utc::now(),
        }
    }

    #[tokio::test]
    async fn broadcast_without_subscribers_sends_nothing() {
        let hub = WsHub::new();
        assert_eq!(hub.broadcast(&[record("10.0.0.5")]).await, 0);
        assert_eq!(hub.client_count().await, 0);
    }

    #[tokio::test]
    async fn broadcast_wraps_records_in_update_envelope() {
        let hub = WsHub::new();
        let mut rx = hub.add("c1".to_string()).await;

        let delivered = hub.broadcast(&[record("10.0.0.9")]).await;
        assert_eq!(delivered, 1);

        let msg = rx.recv().await.unwrap();
        match msg {
            Message::Text(text) => {
                let value: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
                assert_eq!(value["type"], "update");
                assert_eq!(value["payload"][0]["ip_address"], "10.0.0.9");
                // маркер OFFLINE уходит подписчикам дословно
                assert_eq!(value["payload"][0]["current_fields"], "OFFLINE");
            }
            other => panic!("ожидался текстовый кадр, получили {:?}", other),
        }
    }

    #[tokio::test]
    async fn dead_subscriber_is_skipped_without_failing_the_rest() {
        let hub = WsHub::new();
        let rx_dead = hub.add("dead".to_string()).await;
        drop(rx_dead);
        let mut rx_live = hub.add("live".to_string()).await;

        let delivered = hub.broadcast(&[record("10.0.0.5")]).await;
        assert_eq!(delivered, 1);
        assert!(rx_live.recv().await.is_some());
    }

    #[tokio::test]
    async fn removed_subscriber_no_longer_receives() {
        let hub = WsHub::new();
        let _rx = hub.add("c1".to_string()).await;
        hub.remove("c1").await;

        assert_eq!(hub.client_count().await, 0);
        assert_eq!(hub.broadcast(&[]).await, 0);
    }
}
