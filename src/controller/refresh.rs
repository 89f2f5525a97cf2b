//! The refresh loop
//!
//! One controller task per dashboard. It waits while access is off, and while
//! access is on it runs the refresh and countdown timers and commits each
//! cycle's outcome into the shared `RefreshState` in a single step.

use super::core::EventSender;
use super::state::RefreshState;
use super::timers::Timers;
use crate::consts::cli_consts::MANUAL_TRIGGER_QUEUE_SIZE;
use crate::error_classifier::ErrorClassifier;
use crate::events::{Event, EventType};
use crate::feeds::ArbitrageFeed;
use crate::feeds::error::{FeedKind, RefreshError};
use crate::records::{ArbitragePairRecord, ArbitrageTrackRecord};
use chrono::Local;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

type CycleResult = Result<(Vec<ArbitragePairRecord>, Vec<ArbitrageTrackRecord>), RefreshError>;
type CycleFuture = Pin<Box<dyn Future<Output = CycleResult> + Send>>;

/// Settings the controller is built with.
#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    pub refresh_interval: Duration,
    /// Initial value of the caller's access flag.
    pub access: bool,
}

/// Why an active session ended.
enum SessionEnd {
    GatedOff,
    Shutdown,
}

struct RefreshController {
    feed: Arc<dyn ArbitrageFeed>,
    refresh_interval: Duration,
    access: watch::Receiver<bool>,
    manual: mpsc::Receiver<()>,
    shutdown: CancellationToken,
    state: watch::Sender<RefreshState>,
    events: EventSender,
    classifier: ErrorClassifier,
}

impl RefreshController {
    async fn run(mut self) {
        loop {
            if !*self.access.borrow_and_update() {
                self.enter_gated();
                tokio::select! {
                    biased;
                    _ = self.shutdown.cancelled() => break,
                    changed = self.access.changed() => {
                        if changed.is_err() {
                            // Nobody can grant access any more.
                            break;
                        }
                        continue;
                    }
                }
            }

            match self.run_active().await {
                SessionEnd::Shutdown => break,
                SessionEnd::GatedOff => continue,
            }
        }
        log::debug!("refresh controller stopped");
    }

    /// Runs timers and refresh cycles until access is revoked or shutdown is requested.
    ///
    /// Both timers and any in-flight cycle are dropped on return, so nothing from
    /// this session can touch the state afterwards.
    async fn run_active(&mut self) -> SessionEnd {
        self.events.send_controller_event(
            "Access active, refreshing both feeds".to_string(),
            EventType::Refresh,
        );
        let mut timers = Timers::start(self.refresh_interval);
        self.state.send_modify(|s| s.reset_countdown(Instant::now()));
        let mut in_flight: Option<CycleFuture> = Some(self.start_cycle());
        let mut access_open = true;
        let mut manual_open = true;

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => return SessionEnd::Shutdown,
                changed = self.access.changed(), if access_open => match changed {
                    Ok(()) => {
                        if !*self.access.borrow_and_update() {
                            return SessionEnd::GatedOff;
                        }
                    }
                    Err(_) => access_open = false,
                },
                result = next_result(&mut in_flight), if in_flight.is_some() => {
                    in_flight = None;
                    if !*self.access.borrow() {
                        log::debug!("discarding refresh result, access was revoked");
                        return SessionEnd::GatedOff;
                    }
                    self.commit(result);
                    timers.rearm();
                }
                _ = timers.refresh.tick() => {
                    if in_flight.is_none() {
                        in_flight = Some(self.start_cycle());
                    } else {
                        log::debug!("refresh tick skipped, a cycle is still running");
                    }
                }
                _ = timers.countdown.tick() => {
                    self.state.send_modify(|s| s.tick_countdown(Instant::now()));
                }
                trigger = self.manual.recv(), if manual_open => match trigger {
                    Some(()) if in_flight.is_none() => {
                        self.events.send_controller_event(
                            "Manual refresh requested".to_string(),
                            EventType::Refresh,
                        );
                        in_flight = Some(self.start_cycle());
                        timers.rearm();
                        self.state.send_modify(|s| s.reset_countdown(Instant::now()));
                    }
                    Some(()) => log::debug!("manual refresh ignored, a cycle is still running"),
                    None => manual_open = false,
                },
            }
        }
    }

    /// Marks the state as refreshing and launches both fetches concurrently.
    fn start_cycle(&self) -> CycleFuture {
        self.state.send_modify(|s| s.begin_refresh());
        let feed = Arc::clone(&self.feed);
        Box::pin(async move {
            let pairs = async {
                feed.fetch_pairs()
                    .await
                    .map_err(|e| RefreshError::new(FeedKind::Pairs, e))
            };
            let track = async {
                feed.fetch_track()
                    .await
                    .map_err(|e| RefreshError::new(FeedKind::Track, e))
            };
            futures::future::try_join(pairs, track).await
        })
    }

    /// Applies a cycle outcome to the shared state as one transition.
    fn commit(&self, result: CycleResult) {
        let now = Instant::now();
        match result {
            Ok((pairs, track)) => {
                let message = format!(
                    "Refreshed {} pairs and {} tracked coins",
                    pairs.len(),
                    track.len()
                );
                self.state
                    .send_modify(|s| s.commit_success(pairs, track, now, Local::now()));
                log::info!("{}", message);
                self.events
                    .send_controller_event(message, EventType::Success);
            }
            Err(e) => {
                let message = e.to_string();
                let level = self.classifier.classify_feed_error(&e.source);
                self.state
                    .send_modify(|s| s.commit_failure(message.clone(), now));
                log::warn!("{}", message);
                self.events
                    .send_feed_event(e.feed, message, EventType::Error, level);
            }
        }
    }

    fn enter_gated(&self) {
        self.state.send_modify(|s| s.gate_off());
        self.events.send_event(Event::controller(
            "Subscription inactive, refresh paused".to_string(),
            EventType::Gated,
        ));
    }
}

async fn next_result(in_flight: &mut Option<CycleFuture>) -> CycleResult {
    match in_flight {
        Some(cycle) => cycle.await,
        None => std::future::pending().await,
    }
}

/// Caller-side handle to a running controller.
pub struct ControllerHandle {
    state: watch::Receiver<RefreshState>,
    access: watch::Sender<bool>,
    manual: mpsc::Sender<()>,
    shutdown: CancellationToken,
    join_handle: JoinHandle<()>,
}

impl ControllerHandle {
    /// A receiver of the shared view-state. Each borrow sees a fully applied transition.
    pub fn subscribe(&self) -> watch::Receiver<RefreshState> {
        self.state.clone()
    }

    /// Requests an out-of-band refresh. Returns false if one is already queued.
    pub fn trigger_refresh(&self) -> bool {
        self.manual.try_send(()).is_ok()
    }

    /// Updates the access flag supplied by the auth collaborator.
    pub fn set_access(&self, active: bool) {
        self.access.send_replace(active);
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Waits for the controller task to finish.
    pub async fn join(self) {
        if let Err(e) = self.join_handle.await {
            log::error!("refresh controller task failed: {}", e);
        }
    }
}

/// Spawns a controller for `feed`, stopping when `shutdown` is cancelled.
pub fn spawn_controller(
    feed: Arc<dyn ArbitrageFeed>,
    config: ControllerConfig,
    events: mpsc::Sender<Event>,
    shutdown: CancellationToken,
) -> ControllerHandle {
    let (state_sender, state_receiver) = watch::channel(RefreshState::new(config.refresh_interval));
    let (access_sender, access_receiver) = watch::channel(config.access);
    let (manual_sender, manual_receiver) = mpsc::channel(MANUAL_TRIGGER_QUEUE_SIZE);

    let controller = RefreshController {
        feed,
        refresh_interval: config.refresh_interval,
        access: access_receiver,
        manual: manual_receiver,
        shutdown: shutdown.clone(),
        state: state_sender,
        events: EventSender::new(events),
        classifier: ErrorClassifier::new(),
    };
    let join_handle = tokio::spawn(controller.run());

    ControllerHandle {
        state: state_receiver,
        access: access_sender,
        manual: manual_sender,
        shutdown,
        join_handle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::state::RefreshPhase;
    use crate::feeds::MockArbitrageFeed;
    use crate::feeds::error::FeedError;
    use crate::records::FieldValue;
    use crate::table::{TableBody, pair_table, track_table};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const INTERVAL: Duration = Duration::from_secs(300);

    fn pair(name: &str, profit: f64) -> ArbitragePairRecord {
        ArbitragePairRecord {
            pair: name.to_string(),
            coin1: "A".to_string(),
            coin2: "B".to_string(),
            min_exchange: FieldValue::Text("binance".to_string()),
            min_price1: FieldValue::Number(1.0),
            min_price2: FieldValue::Number(2.0),
            max_exchange: FieldValue::Text("kraken".to_string()),
            max_price1: FieldValue::Number(1.01),
            max_price2: FieldValue::Number(2.02),
            profit_percentage: profit,
        }
    }

    fn track(coin: &str) -> ArbitrageTrackRecord {
        ArbitrageTrackRecord {
            coin1: coin.to_string(),
            min_exchange: FieldValue::Text("okx".to_string()),
            min_price1: FieldValue::Number(10.0),
            max_exchange: FieldValue::Text("bybit".to_string()),
            max_price1: FieldValue::Number(10.5),
            profit_percentage: 5.0,
        }
    }

    /// A mock feed answering with fixed data and counting the calls per feed.
    fn counting_feed(
        pairs: Vec<ArbitragePairRecord>,
        tracks: Vec<ArbitrageTrackRecord>,
    ) -> (MockArbitrageFeed, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let pair_calls = Arc::new(AtomicUsize::new(0));
        let track_calls = Arc::new(AtomicUsize::new(0));
        let mut feed = MockArbitrageFeed::new();
        let counter = Arc::clone(&pair_calls);
        feed.expect_fetch_pairs().returning(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(pairs.clone())
        });
        let counter = Arc::clone(&track_calls);
        feed.expect_fetch_track().returning(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(tracks.clone())
        });
        (feed, pair_calls, track_calls)
    }

    fn spawn(feed: impl ArbitrageFeed + 'static, access: bool) -> ControllerHandle {
        let (events, _) = mpsc::channel(16);
        spawn_controller(
            Arc::new(feed),
            ControllerConfig {
                refresh_interval: INTERVAL,
                access,
            },
            events,
            CancellationToken::new(),
        )
    }

    async fn wait_for(
        rx: &mut watch::Receiver<RefreshState>,
        predicate: impl Fn(&RefreshState) -> bool,
    ) -> RefreshState {
        tokio::time::timeout(Duration::from_secs(3600), async {
            loop {
                {
                    let state = rx.borrow_and_update();
                    if predicate(&state) {
                        return state.clone();
                    }
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .expect("state never matched")
    }

    #[tokio::test(start_paused = true)]
    // Both feeds succeed: data replaced together, error cleared.
    async fn test_successful_cycle_commits_both_feeds() {
        let (feed, _, _) = counting_feed(vec![pair("P1", 1.0)], vec![track("BTC"), track("ETH")]);
        let handle = spawn(feed, true);
        let mut rx = handle.subscribe();

        let state = wait_for(&mut rx, |s| s.generation == 1).await;
        assert_eq!(state.phase, RefreshPhase::Ready);
        assert_eq!(state.arbi_pair_data.len(), 1);
        assert_eq!(state.arbi_track_data.len(), 2);
        assert_eq!(state.error, None);
        assert!(!state.loading);

        handle.shutdown();
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    // A failing feed leaves the previous data in place and records the error.
    async fn test_failed_cycle_keeps_previous_data() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut feed = MockArbitrageFeed::new();
        let counter = Arc::clone(&calls);
        feed.expect_fetch_pairs().returning(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(vec![pair("P1", 2.0)])
            } else {
                Err(FeedError::Http {
                    status: 503,
                    message: "down".to_string(),
                })
            }
        });
        feed.expect_fetch_track().returning(|| Ok(vec![track("SOL")]));

        let handle = spawn(feed, true);
        let mut rx = handle.subscribe();
        let first = wait_for(&mut rx, |s| s.generation == 1).await;

        assert!(handle.trigger_refresh());
        let failed = wait_for(&mut rx, |s| s.phase == RefreshPhase::Errored).await;

        assert!(Arc::ptr_eq(&first.arbi_pair_data, &failed.arbi_pair_data));
        assert!(Arc::ptr_eq(&first.arbi_track_data, &failed.arbi_track_data));
        assert_eq!(failed.generation, 1);
        assert_eq!(
            failed.error.as_deref(),
            Some("ArbiPair fetch failed: HTTP error! status: 503")
        );
        assert_eq!(failed.countdown_seconds, INTERVAL.as_secs());

        handle.shutdown();
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    // No fetch while gated, whatever the elapsed time; flipping access on refreshes at once.
    async fn test_gating_blocks_fetches_until_access() {
        let (feed, pair_calls, track_calls) = counting_feed(vec![], vec![track("BTC")]);
        let handle = spawn(feed, false);
        let mut rx = handle.subscribe();

        wait_for(&mut rx, |s| s.phase == RefreshPhase::GatedOff).await;
        tokio::time::sleep(INTERVAL * 10).await;
        assert_eq!(pair_calls.load(Ordering::SeqCst), 0);
        assert_eq!(track_calls.load(Ordering::SeqCst), 0);
        assert!(rx.borrow().phase == RefreshPhase::GatedOff);

        handle.set_access(true);
        let state = wait_for(&mut rx, |s| s.generation == 1).await;
        assert_eq!(pair_calls.load(Ordering::SeqCst), 1);
        assert_eq!(track_calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.phase, RefreshPhase::Ready);

        handle.set_access(false);
        wait_for(&mut rx, |s| s.phase == RefreshPhase::GatedOff).await;
        tokio::time::sleep(INTERVAL * 3).await;
        assert_eq!(pair_calls.load(Ordering::SeqCst), 1);

        handle.shutdown();
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    // The refresh timer fires once per interval after the mount refresh.
    async fn test_refresh_runs_on_schedule() {
        let (feed, pair_calls, _) = counting_feed(vec![pair("P1", 1.0)], vec![track("BTC")]);
        let handle = spawn(feed, true);
        let mut rx = handle.subscribe();

        wait_for(&mut rx, |s| s.generation == 1).await;
        // Read between countdown ticks, never on one.
        tokio::time::sleep(Duration::from_millis(500)).await;
        let mut previous = rx.borrow().countdown_seconds;
        for _ in 0..10 {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let current = rx.borrow().countdown_seconds;
            assert!(current < previous);
            assert!(current <= INTERVAL.as_secs());
            previous = current;
        }

        wait_for(&mut rx, |s| s.generation == 3).await;
        assert_eq!(pair_calls.load(Ordering::SeqCst), 3);

        handle.shutdown();
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    // A manual refresh restarts the countdown and moves the next scheduled fetch a
    // full interval past the press.
    async fn test_manual_refresh_rearms_schedule() {
        let (feed, pair_calls, _) = counting_feed(vec![pair("P1", 1.0)], vec![track("BTC")]);
        let handle = spawn(feed, true);
        let mut rx = handle.subscribe();
        wait_for(&mut rx, |s| s.generation == 1).await;

        tokio::time::sleep(Duration::from_millis(200_500)).await;
        let before = rx.borrow().countdown_seconds;
        assert!(before > 0 && before <= 100, "countdown was {}", before);

        assert!(handle.trigger_refresh());
        let refreshed = wait_for(&mut rx, |s| s.generation == 2).await;
        let triggered_at = Instant::now();
        assert_eq!(refreshed.countdown_seconds, INTERVAL.as_secs());

        // Past the 300 s mark of the original schedule: no fetch there.
        tokio::time::sleep(Duration::from_millis(150_200)).await;
        assert_eq!(pair_calls.load(Ordering::SeqCst), 2);
        assert_eq!(rx.borrow().generation, 2);
        assert!((149..=150).contains(&rx.borrow().countdown_seconds));

        wait_for(&mut rx, |s| s.generation == 3).await;
        let elapsed = Instant::now() - triggered_at;
        assert!(elapsed >= INTERVAL, "next fetch after {:?}", elapsed);
        assert!(elapsed < INTERVAL + Duration::from_secs(1), "next fetch after {:?}", elapsed);
        assert_eq!(pair_calls.load(Ordering::SeqCst), 3);

        handle.shutdown();
        handle.join().await;
    }

    struct SlowFeed;

    #[async_trait::async_trait]
    impl ArbitrageFeed for SlowFeed {
        async fn fetch_pairs(&self) -> Result<Vec<ArbitragePairRecord>, FeedError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(vec![pair("LATE", 9.0)])
        }

        async fn fetch_track(&self) -> Result<Vec<ArbitrageTrackRecord>, FeedError> {
            Ok(vec![track("LATE")])
        }
    }

    #[tokio::test(start_paused = true)]
    // Results arriving after teardown never reach the state.
    async fn test_shutdown_discards_in_flight_results() {
        let handle = spawn(
            SlowFeed,
            true,
        );
        let mut rx = handle.subscribe();
        wait_for(&mut rx, |s| s.phase == RefreshPhase::Refreshing).await;

        tokio::time::sleep(Duration::from_secs(5)).await;
        handle.shutdown();
        handle.join().await;
        tokio::time::sleep(Duration::from_secs(60)).await;

        let state = rx.borrow();
        assert_eq!(state.generation, 0);
        assert!(state.arbi_pair_data.is_empty());
    }

    #[tokio::test(start_paused = true)]
    // Revoking access mid-cycle drops the cycle's results.
    async fn test_gating_discards_in_flight_results() {
        let handle = spawn(
            SlowFeed,
            true,
        );
        let mut rx = handle.subscribe();
        wait_for(&mut rx, |s| s.phase == RefreshPhase::Refreshing).await;

        handle.set_access(false);
        wait_for(&mut rx, |s| s.phase == RefreshPhase::GatedOff).await;
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(rx.borrow().generation, 0);
        handle.shutdown();
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    // Empty pair results and a populated track feed: pair table shows "no results", no error.
    async fn test_empty_pairs_with_populated_track() {
        let mut feed = MockArbitrageFeed::new();
        feed.expect_fetch_pairs().returning(|| {
            crate::feeds::client::decode_pairs(br#"{"results": []}"#)
        });
        feed.expect_fetch_track().returning(|| {
            crate::feeds::client::decode_track(
                br#"{"BTC": {"lowestExchange": "okx", "lowestPrice": 60000, "highestExchange": "kraken", "highestPrice": 60600, "profitPercentage": 1}}"#,
            )
        });
        let handle = spawn(feed, true);
        let mut rx = handle.subscribe();

        let state = wait_for(&mut rx, |s| s.generation == 1).await;
        assert_eq!(state.error, None);
        assert_eq!(pair_table(&[10]).body(&state.arbi_pair_data, state.loading), TableBody::Empty);
        assert!(matches!(
            track_table(&[10]).body(&state.arbi_track_data, state.loading),
            TableBody::Rows(page) if page.total == 1
        ));

        handle.shutdown();
        handle.join().await;
    }
}
