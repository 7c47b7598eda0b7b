//! Kitchen display poller
//!
//! Fetches the kitchen queue on a fixed interval and publishes each result
//! through a `watch` channel. The server is the only source of truth: every
//! successful fetch replaces the previous snapshot wholesale.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shared::client::KitchenQueueResponse;
use shared::models::Order;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::ClientResult;

/// Used until the server advertises its own interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Where the poller reads the queue from (normally `GET /api/kitchen/orders`)
#[async_trait]
pub trait KitchenSource: Send + Sync + 'static {
    async fn fetch_queue(&self) -> ClientResult<KitchenQueueResponse>;
}

/// Latest view of the kitchen queue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KitchenSnapshot {
    pub orders: Vec<Order>,
    /// Unix millis of the last successful fetch
    pub fetched_at: Option<i64>,
    /// Error from the most recent failed fetch; cleared on success
    pub last_error: Option<String>,
    /// Polling stopped because the token was rejected
    pub session_expired: bool,
}

impl KitchenSnapshot {
    /// "Last updated" label for the display, `None` before the first fetch
    pub fn last_updated(&self) -> Option<String> {
        self.fetched_at.map(shared::util::display_millis)
    }
}

/// Background polling task
///
/// Dropping the poller does not stop the task; call [`KitchenPoller::stop`].
pub struct KitchenPoller {
    updates: watch::Receiver<KitchenSnapshot>,
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl KitchenPoller {
    /// Start polling. `interval = None` follows the server's `pollIntervalSecs`.
    pub fn spawn<S: KitchenSource>(source: Arc<S>, interval: Option<Duration>) -> Self {
        let (tx, rx) = watch::channel(KitchenSnapshot::default());
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(source, tx, interval, shutdown.clone()));
        Self {
            updates: rx,
            shutdown,
            handle,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<KitchenSnapshot> {
        self.updates.clone()
    }

    pub fn latest(&self) -> KitchenSnapshot {
        self.updates.borrow().clone()
    }

    /// Whether the task has exited (stopped or session expired)
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn stop(self) {
        self.shutdown.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!("Kitchen poller task failed: {}", e);
        }
    }
}

async fn poll_loop<S: KitchenSource>(
    source: Arc<S>,
    tx: watch::Sender<KitchenSnapshot>,
    pinned: Option<Duration>,
    shutdown: CancellationToken,
) {
    let mut interval = pinned.unwrap_or(DEFAULT_POLL_INTERVAL);
    tracing::info!(interval_ms = interval.as_millis() as u64, "Kitchen poller started");

    loop {
        let result = tokio::select! {
            result = source.fetch_queue() => result,
            _ = shutdown.cancelled() => break,
        };

        match result {
            Ok(queue) => {
                if pinned.is_none() && queue.poll_interval_secs > 0 {
                    interval = Duration::from_secs(queue.poll_interval_secs);
                }
                tracing::debug!(orders = queue.orders.len(), "Kitchen queue refreshed");
                tx.send_modify(|snapshot| {
                    snapshot.orders = queue.orders;
                    snapshot.fetched_at = Some(shared::util::now_millis());
                    snapshot.last_error = None;
                });
            }
            Err(e) if e.is_session_error() => {
                tracing::warn!(error = %e, "Kitchen poller stopped: session rejected");
                tx.send_modify(|snapshot| {
                    snapshot.last_error = Some(e.to_string());
                    snapshot.session_expired = true;
                });
                return;
            }
            Err(e) => {
                // Keep showing the last good queue
                tracing::warn!(error = %e, "Kitchen queue fetch failed");
                tx.send_modify(|snapshot| snapshot.last_error = Some(e.to_string()));
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown.cancelled() => break,
        }
    }

    tracing::info!("Kitchen poller stopped");
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use shared::ErrorCode;
    use shared::models::OrderStatus;

    use super::*;
    use crate::ClientError;

    const TICK: Duration = Duration::from_millis(5);
    const WAIT: Duration = Duration::from_secs(2);

    /// Replays scripted results, then keeps returning the last queue
    struct Scripted {
        script: Mutex<VecDeque<ClientResult<Vec<i64>>>>,
    }

    impl Scripted {
        fn new(script: Vec<ClientResult<Vec<i64>>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
            })
        }
    }

    #[async_trait]
    impl KitchenSource for Scripted {
        async fn fetch_queue(&self) -> ClientResult<KitchenQueueResponse> {
            let next = {
                let mut script = self.script.lock().unwrap();
                if script.len() > 1 {
                    script.pop_front()
                } else {
                    script.front().map(|r| match r {
                        Ok(ids) => Ok(ids.clone()),
                        Err(_) => Err(ClientError::InvalidResponse("exhausted".into())),
                    })
                }
            };
            let ids = next.unwrap_or_else(|| Ok(Vec::new()))?;
            Ok(KitchenQueueResponse {
                orders: ids.into_iter().map(order).collect(),
                poll_interval_secs: 15,
            })
        }
    }

    fn order(id: i64) -> Order {
        Order {
            id,
            table_id: 1,
            waiter_id: None,
            status: OrderStatus::New,
            items: Vec::new(),
            created_at: id,
            updated_at: id,
        }
    }

    fn ids(snapshot: &KitchenSnapshot) -> Vec<i64> {
        snapshot.orders.iter().map(|o| o.id).collect()
    }

    #[tokio::test]
    async fn latest_fetch_wins() {
        let source = Scripted::new(vec![Ok(vec![1]), Ok(vec![1, 2]), Ok(vec![2])]);
        let poller = KitchenPoller::spawn(source, Some(TICK));
        let mut rx = poller.subscribe();

        let snapshot = tokio::time::timeout(WAIT, rx.wait_for(|s| ids(s) == vec![2]))
            .await
            .expect("timed out")
            .expect("poller gone")
            .clone();
        assert!(snapshot.fetched_at.is_some());
        assert!(snapshot.last_error.is_none());
        assert!(snapshot.last_updated().is_some_and(|l| l != shared::util::INVALID_DATE));

        poller.stop().await;
    }

    #[tokio::test]
    async fn transient_failure_keeps_last_queue() {
        let source = Scripted::new(vec![
            Ok(vec![4]),
            Err(ClientError::InvalidResponse("502: bad gateway".into())),
            Ok(vec![4, 5]),
        ]);
        let poller = KitchenPoller::spawn(source, Some(TICK));
        let mut rx = poller.subscribe();

        let snapshot = tokio::time::timeout(WAIT, rx.wait_for(|s| s.last_error.is_some()))
            .await
            .expect("timed out")
            .expect("poller gone")
            .clone();
        assert_eq!(ids(&snapshot), vec![4]);

        tokio::time::timeout(WAIT, rx.wait_for(|s| ids(s) == vec![4, 5] && s.last_error.is_none()))
            .await
            .expect("timed out")
            .expect("poller gone");
        poller.stop().await;
    }

    #[tokio::test]
    async fn rejected_session_stops_polling() {
        let source = Scripted::new(vec![
            Ok(vec![9]),
            Err(ClientError::Unauthorized {
                code: ErrorCode::TokenExpired,
                message: "Token has expired".into(),
            }),
            Ok(vec![10]),
        ]);
        let poller = KitchenPoller::spawn(source, Some(TICK));
        let mut rx = poller.subscribe();

        tokio::time::timeout(WAIT, rx.wait_for(|s| s.session_expired))
            .await
            .expect("timed out")
            .expect("poller gone");

        // The task exits on its own; the sender goes away with it
        tokio::time::timeout(WAIT, async {
            while rx.changed().await.is_ok() {}
        })
        .await
        .expect("poller kept running");
        assert!(poller.is_finished());
        assert_eq!(ids(&poller.latest()), vec![9]);
    }

    #[test]
    fn empty_snapshot_has_no_update_label() {
        assert_eq!(KitchenSnapshot::default().last_updated(), None);
    }

    #[tokio::test]
    async fn stop_cancels_a_long_interval() {
        let source = Scripted::new(vec![Ok(vec![1])]);
        let poller = KitchenPoller::spawn(source, Some(Duration::from_secs(3600)));
        let mut rx = poller.subscribe();
        tokio::time::timeout(WAIT, rx.wait_for(|s| s.fetched_at.is_some()))
            .await
            .expect("timed out")
            .expect("poller gone");

        tokio::time::timeout(WAIT, poller.stop())
            .await
            .expect("stop hung");
    }
}
