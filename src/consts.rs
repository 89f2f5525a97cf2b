pub mod cli_consts {
    //! Dashboard Configuration Constants
    //!
    //! This module contains the configuration constants for the dashboard,
    //! organized by functional area.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Maximum number of buffered events from the refresh controller
    pub const EVENT_QUEUE_SIZE: usize = 100;

    /// Pending manual refresh requests; extra presses while full are dropped
    pub const MANUAL_TRIGGER_QUEUE_SIZE: usize = 1;

    // =============================================================================
    // REFRESH CONFIGURATION
    // =============================================================================

    /// Refresh cadence configuration
    pub mod refresh {
        use std::time::Duration;

        /// Default time between refresh cycles (seconds)
        pub const DEFAULT_INTERVAL_SECS: u64 = 300;

        /// Longest accepted time between refresh cycles (seconds)
        pub const MAX_INTERVAL_SECS: u64 = 86_400;

        /// Countdown recompute period (milliseconds)
        pub const COUNTDOWN_TICK_MS: u64 = 1000;

        /// Helper function to get the countdown tick period
        pub const fn countdown_tick() -> Duration {
            Duration::from_millis(COUNTDOWN_TICK_MS)
        }
    }

    // =============================================================================
    // TABLE CONFIGURATION
    // =============================================================================

    /// Page sizes offered by both tables
    pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 30, 40];

    /// Placeholder shown while the first load is in flight
    pub const LOADING_PLACEHOLDER: &str = "Loading data...";

    /// Placeholder shown when a feed returned no rows
    pub const EMPTY_PLACEHOLDER: &str = "No results available.";

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// HTTP client timeouts
    pub mod http {
        use std::time::Duration;

        /// Connection establishment timeout (seconds)
        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        /// Whole-request timeout (seconds)
        pub const REQUEST_TIMEOUT_SECS: u64 = 20;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }
}
