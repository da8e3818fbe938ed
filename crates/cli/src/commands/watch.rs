//! Follow cart changes made by other processes.
//!
//! The file-backed store has no change feed, so `watch` polls the cart key on
//! an interval and feeds every difference to the widget as a storage event,
//! the same path a second browser tab takes.
//!
//! # Environment Variables
//!
//! - `BANDA_WATCH_INTERVAL_MS` - Poll interval (default: 500)

use std::io::Write;
use std::time::Duration;

use banda_storefront::storage::TabId;
use banda_storefront::{KeyValueStore, PageEvent, StorageChange};
use tokio::time::MissedTickBehavior;

use super::{CliError, Widget, cart};

/// Last value seen for the cart key.
#[derive(Debug)]
pub struct Watcher {
    key: String,
    last: Option<String>,
    origin: TabId,
}

impl Watcher {
    /// Start watching the widget's cart key from its current value.
    pub fn new(widget: &Widget) -> Self {
        let key = widget.store().key().to_string();
        let last = widget.store().storage().get_item(&key).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not read initial cart value");
            None
        });
        Self {
            key,
            last,
            origin: TabId::new(),
        }
    }

    /// Read the key again and report a change if its value differs.
    pub fn poll(&mut self, widget: &Widget) -> Option<StorageChange> {
        let current = match widget.store().storage().get_item(&self.key) {
            Ok(current) => current,
            Err(e) => {
                tracing::warn!(error = %e, "Could not poll cart store");
                return None;
            }
        };
        if current == self.last {
            return None;
        }
        let old_value = std::mem::replace(&mut self.last, current.clone());
        Some(StorageChange {
            key: self.key.clone(),
            old_value,
            new_value: current,
            origin: self.origin,
        })
    }
}

/// Re-render for one change and print the new summary.
pub fn apply(
    widget: &mut Widget,
    change: StorageChange,
    out: &mut impl Write,
) -> Result<(), CliError> {
    widget.handle(&PageEvent::StorageChanged(change))?;
    cart::print_summary(widget, out)
}

/// Poll until Ctrl-C.
pub async fn watch(
    widget: &mut Widget,
    interval: Duration,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut watcher = Watcher::new(widget);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(
        key = %watcher.key,
        interval_ms = interval.as_millis(),
        "Watching cart, press Ctrl-C to stop"
    );
    cart::print_summary(widget, out)?;
    out.flush()?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                result?;
                tracing::info!("Stopped watching");
                return Ok(());
            }
            _ = ticker.tick() => {
                if let Some(change) = watcher.poll(widget) {
                    apply(widget, change, out)?;
                    out.flush()?;
                }
            }
        }
    }
}
