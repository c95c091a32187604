use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;

use crate::api::{ApiError, TradeFeed};
use crate::models::StatsSnapshot;
use crate::stats::compute_snapshot;

/// How often the dashboard re-fetches the trade list
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Background stats refresher.
///
/// Owns the fetch cadence: on every tick it pulls the trade list from the
/// feed, recomputes the snapshot wholesale and publishes it on a watch
/// channel. When a fetch fails the previous snapshot stays published, so
/// consumers show stale numbers instead of a blank dashboard.
pub struct StatsScheduler {
    feed: Arc<dyn TradeFeed>,
    interval: Duration,
    snapshot_tx: watch::Sender<StatsSnapshot>,
    tasks: Arc<RwLock<Vec<JoinHandle<()>>>>,
}

impl StatsScheduler {
    pub fn new(feed: Arc<dyn TradeFeed>) -> Self {
        Self::with_interval(feed, DEFAULT_REFRESH_INTERVAL)
    }

    pub fn with_interval(feed: Arc<dyn TradeFeed>, interval: Duration) -> Self {
        let (snapshot_tx, _) = watch::channel(StatsSnapshot::default());
        Self {
            feed,
            interval,
            snapshot_tx,
            tasks: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Current snapshot plus every future one
    pub fn subscribe(&self) -> watch::Receiver<StatsSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Start the periodic refresh loop
    pub async fn start(&self) {
        log::info!(
            "Starting stats refresh loop (every {}s)",
            self.interval.as_secs()
        );

        let feed = Arc::clone(&self.feed);
        let snapshot_tx = self.snapshot_tx.clone();
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);

            loop {
                ticker.tick().await;

                match Self::refresh(&*feed, &snapshot_tx).await {
                    Ok(trade_count) => {
                        log::debug!("Stats refreshed from {} trades", trade_count);
                    }
                    Err(e) => {
                        // Keep the last good snapshot published
                        log::error!("Stats refresh failed, keeping stale snapshot: {}", e);
                    }
                }
            }
        });

        let mut tasks = self.tasks.write().await;
        tasks.push(handle);
    }

    /// One fetch/compute/publish cycle, for the manual refresh button.
    ///
    /// Unlike the background loop this surfaces the fetch error to the
    /// caller so the UI can report it.
    pub async fn refresh_now(&self) -> Result<StatsSnapshot, ApiError> {
        Self::refresh(&*self.feed, &self.snapshot_tx).await?;
        Ok(self.snapshot_tx.borrow().clone())
    }

    async fn refresh(
        feed: &dyn TradeFeed,
        snapshot_tx: &watch::Sender<StatsSnapshot>,
    ) -> Result<usize, ApiError> {
        let trades = feed.fetch_trades().await?;
        let snapshot = compute_snapshot(&trades, Local::now());
        // send_replace stores the snapshot even when nobody subscribed yet
        snapshot_tx.send_replace(snapshot);
        Ok(trades.len())
    }

    /// Stop the refresh loop
    pub async fn stop(&self) {
        let mut tasks = self.tasks.write().await;
        for task in tasks.drain(..) {
            task.abort();
        }
        log::info!("Stats refresh loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Trade;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Feed returning a canned list, or an error when poisoned
    struct StaticFeed {
        trades: Vec<Trade>,
        failing: AtomicBool,
    }

    impl StaticFeed {
        fn new(trades: Vec<Trade>) -> Self {
            Self {
                trades,
                failing: AtomicBool::new(false),
            }
        }

        fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl TradeFeed for StaticFeed {
        async fn fetch_trades(&self) -> Result<Vec<Trade>, ApiError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(ApiError::BackendError {
                    status: 502,
                    message: "backend down".to_string(),
                });
            }
            Ok(self.trades.clone())
        }
    }

    fn closed_trade(id: i64, pnl: f64) -> Trade {
        Trade {
            id,
            order_id: None,
            symbol: None,
            side: None,
            order_type: None,
            price: None,
            qty: None,
            status: None,
            avg_price: None,
            closed_pnl: Some(pnl),
            category: Some("linear".to_string()),
            account_name: Some("main".to_string()),
            // Old enough to never be "today"; keeps totals deterministic
            created_time: "2020-01-15T10:00:00".to_string(),
            updated_time: None,
        }
    }

    #[tokio::test]
    async fn test_refresh_now_publishes_computed_snapshot() {
        let feed = Arc::new(StaticFeed::new(vec![
            closed_trade(1, 100.0),
            closed_trade(2, -40.0),
        ]));
        let scheduler = StatsScheduler::new(feed);
        let receiver = scheduler.subscribe();

        let snapshot = scheduler.refresh_now().await.unwrap();

        assert_eq!(snapshot.total_trades, 2);
        assert_eq!(snapshot.total_pnl, "60.00");
        assert_eq!(*receiver.borrow(), snapshot);
    }

    #[tokio::test]
    async fn test_snapshot_stored_before_first_subscriber() {
        // The dashboard may call refresh before any widget subscribes;
        // the computed snapshot must not be dropped on the floor.
        let feed = Arc::new(StaticFeed::new(vec![closed_trade(1, 42.0)]));
        let scheduler = StatsScheduler::new(feed);

        let snapshot = scheduler.refresh_now().await.unwrap();
        assert_eq!(snapshot.total_trades, 1);
        assert_eq!(snapshot.total_pnl, "42.00");

        // A late subscriber sees the published snapshot, not the default
        let receiver = scheduler.subscribe();
        assert_eq!(*receiver.borrow(), snapshot);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_stale_snapshot() {
        let feed = Arc::new(StaticFeed::new(vec![closed_trade(1, 10.0)]));
        let scheduler = StatsScheduler::new(Arc::clone(&feed) as Arc<dyn TradeFeed>);

        scheduler.refresh_now().await.unwrap();

        feed.set_failing(true);
        let err = scheduler.refresh_now().await;
        assert!(err.is_err());

        // Last good snapshot is still what subscribers see
        let receiver = scheduler.subscribe();
        assert_eq!(receiver.borrow().total_trades, 1);
        assert_eq!(receiver.borrow().total_pnl, "10.00");
    }

    #[tokio::test]
    async fn test_background_loop_publishes_and_stops() {
        let feed = Arc::new(StaticFeed::new(vec![closed_trade(1, 5.0)]));
        let scheduler =
            StatsScheduler::with_interval(feed, Duration::from_millis(10));
        let mut receiver = scheduler.subscribe();

        scheduler.start().await;

        // First tick fires immediately
        tokio::time::timeout(Duration::from_secs(1), receiver.changed())
            .await
            .expect("no snapshot published")
            .unwrap();
        assert_eq!(receiver.borrow().total_trades, 1);

        scheduler.stop().await;
    }
}
