use serde_json::Value;
use tokio::sync::broadcast;

/// Event names pushed over `/api/v1/events/stream`.
pub const PORTFOLIO_REFRESH_START: &str = "portfolio:refresh-start";
pub const PORTFOLIO_REFRESH_COMPLETE: &str = "portfolio:refresh-complete";
pub const PORTFOLIO_REFRESH_ERROR: &str = "portfolio:refresh-error";

#[derive(Clone, Debug)]
pub struct ServerEvent {
    pub name: &'static str,
    pub payload: Option<Value>,
}

impl ServerEvent {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            payload: None,
        }
    }

    pub fn with_payload(name: &'static str, payload: Value) -> Self {
        Self {
            name,
            payload: Some(payload),
        }
    }
}

/// Fans refresh events out to every connected dashboard.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ServerEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ServerEvent) {
        // No subscribers is fine.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(ServerEvent::new(PORTFOLIO_REFRESH_START));
        bus.publish(ServerEvent::with_payload(
            PORTFOLIO_REFRESH_COMPLETE,
            json!({ "version": 1 }),
        ));

        let first = rx.recv().await.unwrap();
        assert_eq!(first.name, PORTFOLIO_REFRESH_START);
        assert!(first.payload.is_none());

        let second = rx.recv().await.unwrap();
        assert_eq!(second.name, PORTFOLIO_REFRESH_COMPLETE);
        assert_eq!(second.payload, Some(json!({ "version": 1 })));
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new(1);
        bus.publish(ServerEvent::new(PORTFOLIO_REFRESH_ERROR));
    }
}
