use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use launch_check_core::SignalSnapshot;
use tokio::sync::mpsc;

/// Push-based view of the update-check subsystem.
pub trait SignalSource: Send + Sync {
    /// Opens a subscription; each check subscribes exactly once.
    fn subscribe(&self) -> SignalSubscription;
}

/// Ordered stream of snapshots for one subscriber.
#[derive(Debug)]
pub struct SignalSubscription {
    rx: mpsc::UnboundedReceiver<SignalSnapshot>,
}

impl SignalSubscription {
    /// Creates a subscription fed by the returned sender.
    pub fn channel() -> (mpsc::UnboundedSender<SignalSnapshot>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    /// Waits for the next snapshot; `None` once the source has gone away.
    pub async fn next(&mut self) -> Option<SignalSnapshot> {
        self.rx.recv().await
    }
}

#[derive(Debug, Default)]
struct Subscribers {
    latest: Option<SignalSnapshot>,
    senders: Vec<mpsc::UnboundedSender<SignalSnapshot>>,
}

/// In-process signal source that fans snapshots out to every live subscriber.
///
/// New subscribers first receive the most recently published snapshot.
#[derive(Debug, Clone, Default)]
pub struct ChannelSignalSource {
    inner: Arc<Mutex<Subscribers>>,
}

impl ChannelSignalSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: SignalSnapshot) {
        let mut inner = self.lock();
        inner.senders.retain(|tx| tx.send(snapshot.clone()).is_ok());
        inner.latest = Some(snapshot);
    }

    pub fn latest(&self) -> Option<SignalSnapshot> {
        self.lock().latest.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.lock();
        inner.senders.retain(|tx| !tx.is_closed());
        inner.senders.len()
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SignalSource for ChannelSignalSource {
    fn subscribe(&self) -> SignalSubscription {
        let (tx, subscription) = SignalSubscription::channel();
        let mut inner = self.lock();
        if let Some(latest) = inner.latest.clone() {
            let _ = tx.send(latest);
        }
        inner.senders.push(tx);
        subscription
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checking() -> SignalSnapshot {
        SignalSnapshot {
            is_checking: true,
            ..SignalSnapshot::default()
        }
    }

    #[tokio::test]
    async fn late_subscriber_sees_latest_snapshot_first() {
        let source = ChannelSignalSource::new();
        source.publish(SignalSnapshot::default());
        source.publish(checking());

        let mut subscription = source.subscribe();
        assert_eq!(subscription.next().await, Some(checking()));
    }

    #[tokio::test]
    async fn dropped_subscribers_are_pruned() {
        let source = ChannelSignalSource::new();
        let subscription = source.subscribe();
        assert_eq!(source.subscriber_count(), 1);

        drop(subscription);
        source.publish(checking());
        assert_eq!(source.subscriber_count(), 0);
        assert_eq!(source.latest(), Some(checking()));
    }

    #[tokio::test]
    async fn subscription_ends_when_source_is_dropped() {
        let source = ChannelSignalSource::new();
        let mut subscription = source.subscribe();
        source.publish(checking());
        drop(source);

        assert_eq!(subscription.next().await, Some(checking()));
        assert_eq!(subscription.next().await, None);
    }
}
