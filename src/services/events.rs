use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use crate::models::ChangeEvent;

/// Broadcasts writes so open booking and dashboard views can refresh.
pub struct ChangeFeed {
    tx: Mutex<Option<broadcast::Sender<ChangeEvent>>>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx: Mutex::new(Some(tx)),
        }
    }

    fn sender(&self) -> MutexGuard<'_, Option<broadcast::Sender<ChangeEvent>>> {
        self.tx.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// After [`close`](Self::close) the returned receiver is already closed.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        match self.sender().as_ref() {
            Some(tx) => tx.subscribe(),
            None => broadcast::channel(1).1,
        }
    }

    pub fn publish(&self, event: ChangeEvent) {
        let Some(tx) = self.sender().clone() else {
            return;
        };
        // No subscribers is fine; nobody has a view open.
        let receivers = tx.send(event).unwrap_or(0);
        tracing::debug!(receivers, "published change event");
    }

    /// Ends every open subscription so streaming responses can finish.
    pub fn close(&self) {
        if self.sender().take().is_some() {
            tracing::info!("change feed closed");
        }
    }
}
