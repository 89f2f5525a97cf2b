//! The two timers that run while access is granted

use crate::consts::cli_consts::refresh;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Refresh and countdown timers, acquired together and released together on drop.
///
/// Dropping the guard cancels both timers, whichever way the active session ends.
pub struct Timers {
    pub refresh: Interval,
    pub countdown: Interval,
}

impl Timers {
    /// Starts both timers. The first refresh tick fires one full interval from now.
    pub fn start(refresh_interval: Duration) -> Self {
        let now = Instant::now();
        let mut refresh = interval_at(now + refresh_interval, refresh_interval);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let tick = refresh::countdown_tick();
        let mut countdown = interval_at(now + tick, tick);
        countdown.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self { refresh, countdown }
    }

    /// Moves both reference points to now: the next refresh is a full interval away.
    pub fn rearm(&mut self) {
        self.refresh.reset();
        self.countdown.reset();
    }
}
