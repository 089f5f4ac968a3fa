//! The Live Block Feed: deduplicated delivery of newly mined blocks to
//! subscribers.

mod dedup;
mod watcher;

use tokio::sync::{mpsc, Mutex};

pub use dedup::DedupWindow;
pub use watcher::TipWatcher;

use crate::models::EnrichedBlock;

/// Capacity of each subscriber's delivery channel.
const SUBSCRIBER_CHANNEL_CAPACITY: usize = 64;

/// State shared by the membership check and the subscriber list; both are
/// mutated under one lock so concurrent deliveries serialize.
struct FeedInner {
    seen: DedupWindow,
    subscribers: Vec<mpsc::Sender<EnrichedBlock>>,
}

/// Fans newly mined blocks out to subscribers, suppressing duplicates.
///
/// Each subscriber receives every first-seen block exactly once, in delivery
/// order. Delivery order is not height order; only the aggregator's batch
/// results are height-ordered. Duplicate suppression is per process lifetime
/// (bounded by the dedup window): after a restart, previously delivered
/// blocks may be delivered again.
pub struct BlockFeed {
    inner: Mutex<FeedInner>,
}

impl BlockFeed {
    /// Creates a feed remembering up to `dedup_capacity` delivered hashes.
    pub fn new(dedup_capacity: usize) -> Self {
        Self {
            inner: Mutex::new(FeedInner {
                seen: DedupWindow::new(dedup_capacity),
                subscribers: Vec::new(),
            }),
        }
    }

    /// Attaches a new subscriber and returns its delivery channel.
    pub async fn subscribe(&self) -> mpsc::Receiver<EnrichedBlock> {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_CHANNEL_CAPACITY);
        self.inner.lock().await.subscribers.push(tx);
        rx
    }

    /// Delivers a newly observed block to all current subscribers.
    ///
    /// Returns `false` when the block's hash was already delivered and the
    /// block was dropped. The membership check and subscriber snapshot happen
    /// under the lock; the fan-out itself does not hold it.
    pub async fn publish(&self, block: EnrichedBlock) -> bool {
        let senders = {
            let mut inner = self.inner.lock().await;
            if !inner.seen.insert(&block.hash) {
                tracing::debug!(hash = %block.hash, "Duplicate block dropped by feed.");
                return false;
            }
            inner.subscribers.retain(|sender| !sender.is_closed());
            inner.subscribers.clone()
        };

        tracing::debug!(
            hash = %block.hash,
            height = block.height,
            subscribers = senders.len(),
            "Forwarding new block to subscribers."
        );

        let deliveries = senders.iter().map(|sender| sender.send(block.clone()));
        for delivery in futures::future::join_all(deliveries).await {
            if delivery.is_err() {
                tracing::debug!("Subscriber went away during delivery.");
            }
        }
        true
    }

    /// Number of currently attached subscribers, counting ones that have not
    /// yet been pruned.
    pub async fn subscriber_count(&self) -> usize {
        self.inner.lock().await.subscribers.len()
    }
}
