//! Shared view-state of the dashboard

use crate::records::{ArbitragePairRecord, ArbitrageTrackRecord};
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Where the controller is in its refresh cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
pub enum RefreshPhase {
    /// Access is off; no timers run and no fetches are issued.
    GatedOff,
    /// Access is on but no cycle has run yet.
    Idle,
    Refreshing,
    Ready,
    Errored,
}

/// Everything the tables need, published as one value per transition.
///
/// The two record sequences are only ever replaced together.
#[derive(Debug, Clone)]
pub struct RefreshState {
    pub arbi_pair_data: Arc<[ArbitragePairRecord]>,
    pub arbi_track_data: Arc<[ArbitrageTrackRecord]>,
    pub loading: bool,
    pub error: Option<String>,
    pub countdown_seconds: u64,
    /// Wall-clock time of the last successful commit.
    pub last_refresh_at: Option<DateTime<Local>>,
    /// Reference point of the countdown, moved on every cycle completion and manual trigger.
    pub countdown_anchor: Instant,
    pub phase: RefreshPhase,
    /// Bumped on every successful commit.
    pub generation: u64,
    pub refresh_interval: Duration,
}

impl RefreshState {
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            arbi_pair_data: Arc::from(Vec::new()),
            arbi_track_data: Arc::from(Vec::new()),
            loading: false,
            error: None,
            countdown_seconds: refresh_interval.as_secs(),
            last_refresh_at: None,
            countdown_anchor: Instant::now(),
            phase: RefreshPhase::Idle,
            generation: 0,
            refresh_interval,
        }
    }

    pub fn begin_refresh(&mut self) {
        self.loading = true;
        self.phase = RefreshPhase::Refreshing;
    }

    /// Replaces both sequences at once and clears any previous error.
    pub fn commit_success(
        &mut self,
        pairs: Vec<ArbitragePairRecord>,
        track: Vec<ArbitrageTrackRecord>,
        now: Instant,
        wall_clock: DateTime<Local>,
    ) {
        self.arbi_pair_data = Arc::from(pairs);
        self.arbi_track_data = Arc::from(track);
        self.loading = false;
        self.error = None;
        self.phase = RefreshPhase::Ready;
        self.generation += 1;
        self.last_refresh_at = Some(wall_clock);
        self.reset_countdown(now);
    }

    /// Records the failure and keeps the last-known-good data untouched.
    pub fn commit_failure(&mut self, message: String, now: Instant) {
        self.loading = false;
        self.error = Some(message);
        self.phase = RefreshPhase::Errored;
        self.reset_countdown(now);
    }

    pub fn reset_countdown(&mut self, now: Instant) {
        self.countdown_anchor = now;
        self.countdown_seconds = self.refresh_interval.as_secs();
    }

    pub fn tick_countdown(&mut self, now: Instant) {
        self.countdown_seconds =
            countdown_seconds(self.refresh_interval, self.countdown_anchor, now);
    }

    pub fn gate_off(&mut self) {
        self.loading = false;
        self.phase = RefreshPhase::GatedOff;
    }
}

/// Whole seconds until the next refresh, derived from the elapsed time since `anchor`.
///
/// Never exceeds the interval and never goes below zero.
pub fn countdown_seconds(interval: Duration, anchor: Instant, now: Instant) -> u64 {
    interval
        .saturating_sub(now.saturating_duration_since(anchor))
        .as_secs()
}

/// Countdown as shown to the user, e.g. "4m 59s".
pub fn format_countdown(seconds: u64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::FieldValue;

    fn track(coin: &str) -> ArbitrageTrackRecord {
        ArbitrageTrackRecord {
            coin1: coin.to_string(),
            min_exchange: FieldValue::NotAvailable,
            min_price1: FieldValue::NotAvailable,
            max_exchange: FieldValue::NotAvailable,
            max_price1: FieldValue::NotAvailable,
            profit_percentage: 1.0,
        }
    }

    #[test]
    // Between two refreshes the countdown strictly decreases each second, then holds at 0.
    fn test_countdown_is_monotonic() {
        let interval = Duration::from_secs(5);
        let anchor = Instant::now();

        let values: Vec<u64> = (0..8)
            .map(|s| countdown_seconds(interval, anchor, anchor + Duration::from_secs(s)))
            .collect();
        assert_eq!(values, vec![5, 4, 3, 2, 1, 0, 0, 0]);

        // Sub-second offsets floor, never exceed the interval.
        assert_eq!(
            countdown_seconds(interval, anchor, anchor + Duration::from_millis(1)),
            4
        );
        assert_eq!(countdown_seconds(interval, anchor + Duration::from_secs(1), anchor), 5);
    }

    #[test]
    fn test_commit_success_replaces_both_sequences() {
        let mut state = RefreshState::new(Duration::from_secs(300));
        state.commit_failure("boom".to_string(), Instant::now());
        state.begin_refresh();

        state.commit_success(Vec::new(), vec![track("BTC")], Instant::now(), Local::now());

        assert_eq!(state.phase, RefreshPhase::Ready);
        assert_eq!(state.error, None);
        assert!(!state.loading);
        assert_eq!(state.arbi_track_data.len(), 1);
        assert_eq!(state.generation, 1);
        assert_eq!(state.countdown_seconds, 300);
        assert!(state.last_refresh_at.is_some());
    }

    #[test]
    // A failed cycle leaves the previous data pointer-identical.
    fn test_commit_failure_keeps_data() {
        let mut state = RefreshState::new(Duration::from_secs(300));
        state.commit_success(Vec::new(), vec![track("ETH")], Instant::now(), Local::now());
        let before_track = Arc::clone(&state.arbi_track_data);
        let before_pairs = Arc::clone(&state.arbi_pair_data);

        state.begin_refresh();
        state.commit_failure("ArbiTrack fetch failed: timeout".to_string(), Instant::now());

        assert!(Arc::ptr_eq(&before_track, &state.arbi_track_data));
        assert!(Arc::ptr_eq(&before_pairs, &state.arbi_pair_data));
        assert_eq!(state.phase, RefreshPhase::Errored);
        assert_eq!(state.generation, 1);
        assert_eq!(state.error.as_deref(), Some("ArbiTrack fetch failed: timeout"));
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(300), "5m 0s");
        assert_eq!(format_countdown(61), "1m 1s");
        assert_eq!(format_countdown(0), "0m 0s");
    }
}
