use crate::models::ContentEvent;
use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::{self, Sender};
use tokio_stream::wrappers::BroadcastStream;

const CHANNEL_CAPACITY: usize = 100;

/// Fan-out of content changes to admin dashboards and background listeners.
pub struct NotificationHub {
    sender: Sender<ContentEvent>,
}

impl NotificationHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn sender(&self) -> Sender<ContentEvent> {
        self.sender.clone()
    }

    /// Publishes an event; having no subscriber is not an error.
    pub fn publish(&self, event: ContentEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> BroadcastStream<ContentEvent> {
        BroadcastStream::new(self.sender.subscribe())
    }

    /// Streams every event as JSON text frames until either side hangs up.
    pub async fn handle_socket(socket: WebSocket, sender: Sender<ContentEvent>) {
        let (mut sender_ws, mut receiver) = socket.split();
        let mut receiver_stream = BroadcastStream::new(sender.subscribe());

        let mut send_task = tokio::spawn(async move {
            while let Some(item) = receiver_stream.next().await {
                let event = match item {
                    Ok(event) => event,
                    Err(lagged) => {
                        tracing::warn!("admin event stream lagging: {lagged}");
                        continue;
                    }
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    if sender_ws.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
            }
        });

        // Clients only listen; drain until they close.
        let mut recv_task =
            tokio::spawn(async move { while let Some(Ok(_)) = receiver.next().await {} });

        tokio::select! {
            _ = &mut send_task => recv_task.abort(),
            _ = &mut recv_task => send_task.abort(),
        }
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}
