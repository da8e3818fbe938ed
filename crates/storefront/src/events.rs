//! Page-wide cart notifications.
//!
//! Every successful write, and every change picked up from another tab, emits
//! [`CartEvent::Updated`] so unrelated code can react without polling.

use tokio::sync::broadcast;

/// Name of the DOM event the storefront dispatches on `window`.
pub const CART_UPDATED: &str = "cart:updated";

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Where an update came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSource {
    /// This page wrote the cart.
    Local,
    /// Another tab wrote the cart.
    OtherTab,
}

/// A cart notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    Updated {
        item_count: u64,
        source: UpdateSource,
    },
}

impl CartEvent {
    /// DOM event name for this notification.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Updated { .. } => CART_UPDATED,
        }
    }
}

/// Fan-out of cart notifications to any number of listeners.
#[derive(Debug, Clone)]
pub struct CartNotifier {
    sender: broadcast::Sender<CartEvent>,
}

impl CartNotifier {
    /// Create a notifier with no listeners.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Register a listener.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.sender.subscribe()
    }

    /// Send an event to every current listener.
    pub fn emit(&self, event: CartEvent) {
        tracing::debug!(event = event.name(), ?event, "Cart event");
        // No listeners is fine.
        let _ = self.sender.send(event);
    }
}

impl Default for CartNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_listeners() {
        CartNotifier::new().emit(CartEvent::Updated {
            item_count: 0,
            source: UpdateSource::Local,
        });
    }

    #[test]
    fn test_every_listener_receives() {
        let notifier = CartNotifier::new();
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();
        let event = CartEvent::Updated {
            item_count: 2,
            source: UpdateSource::OtherTab,
        };
        notifier.emit(event);
        assert_eq!(first.try_recv().unwrap(), event);
        assert_eq!(second.try_recv().unwrap(), event);
        assert_eq!(event.name(), "cart:updated");
    }
}
