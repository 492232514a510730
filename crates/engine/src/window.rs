//! Fan-out of window level events to mounted controllers.
//!
//! Each mounted controller holds a [`WindowSubscription`]; dropping it is the
//! unsubscribe, so a controller that goes away stops listening at once.

use tokio::sync::broadcast::{self, Receiver, Sender, error::TryRecvError};
use tracing::warn;
use typeahead_types::WindowEvent;

const HUB_CAPACITY: usize = 64;

/// Broadcasts [`WindowEvent`]s to every live subscription.
#[derive(Clone, Debug)]
pub struct WindowEventHub {
    sender: Sender<WindowEvent>,
}

impl Default for WindowEventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowEventHub {
    pub fn new() -> Self {
        let (sender, _rx) = broadcast::channel(HUB_CAPACITY);
        Self { sender }
    }

    /// Deliver `event` to every subscriber. Returns how many received it.
    pub fn publish(&self, event: WindowEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> WindowSubscription {
        WindowSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// One listener's handle on a [`WindowEventHub`].
#[derive(Debug)]
pub struct WindowSubscription {
    receiver: Receiver<WindowEvent>,
}

impl WindowSubscription {
    /// Take every event published since the last drain without waiting.
    pub fn drain(&mut self) -> Vec<WindowEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("window event listener lagged by {} events", skipped);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        events
    }

    /// Wait for the next event; `None` once the hub is gone.
    pub async fn recv(&mut self) -> Option<WindowEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("window event listener lagged by {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeahead_types::Point;

    #[test]
    fn events_reach_every_subscriber() {
        let hub = WindowEventHub::new();
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();
        assert_eq!(hub.publish(WindowEvent::Scroll), 2);
        assert_eq!(first.drain(), vec![WindowEvent::Scroll]);
        assert_eq!(second.drain(), vec![WindowEvent::Scroll]);
        assert!(first.drain().is_empty());
    }

    #[test]
    fn dropping_a_subscription_unsubscribes() {
        let hub = WindowEventHub::new();
        let subscription = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 1);
        drop(subscription);
        assert_eq!(hub.subscriber_count(), 0);
        assert_eq!(hub.publish(WindowEvent::PointerDown(Point::new(1.0, 1.0))), 0);
    }

    #[test]
    fn lagging_listeners_keep_the_newest_events() {
        let hub = WindowEventHub::new();
        let mut subscription = hub.subscribe();
        for _ in 0..HUB_CAPACITY + 3 {
            hub.publish(WindowEvent::Scroll);
        }
        assert_eq!(subscription.drain().len(), HUB_CAPACITY);
    }

    #[tokio::test]
    async fn recv_ends_when_the_hub_is_dropped() {
        let hub = WindowEventHub::new();
        let mut subscription = hub.subscribe();
        hub.publish(WindowEvent::Scroll);
        drop(hub);
        assert_eq!(subscription.recv().await, Some(WindowEvent::Scroll));
        assert_eq!(subscription.recv().await, None);
    }
}
