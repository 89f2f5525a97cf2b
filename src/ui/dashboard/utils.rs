//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::events::Worker;
use ratatui::prelude::Color;
use std::time::Duration;

/// Get a ratatui color for a worker based on its type
pub fn get_worker_color(worker: &Worker) -> Color {
    match worker {
        Worker::PairFeed => Color::Cyan,
        Worker::TrackFeed => Color::Yellow,
        Worker::Controller => Color::Green,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // Extract from "YYYY-MM-DD HH:MM:SS" format
    let mut parts = timestamp.split(' ');
    if let (Some(date_part), Some(time_part)) = (parts.next(), parts.next()) {
        if let (Some(month_day), Some(hour_min)) = (date_part.get(5..10), time_part.get(0..8)) {
            return format!("{} {}", month_day, hour_min);
        }
    }
    timestamp.to_string()
}

/// Share of the refresh interval already elapsed, as a gauge percentage.
pub fn countdown_percent(remaining_secs: u64, interval: Duration) -> u16 {
    let total = interval.as_secs();
    if total == 0 {
        return 100;
    }
    let elapsed = total.saturating_sub(remaining_secs.min(total));
    ((elapsed * 100) / total) as u16
}

/// Clean HTTP error messages
pub fn clean_http_error_message(msg: &str) -> String {
    if msg.contains("Reqwest error") && msg.contains("timed out") {
        return msg
            .split(": Reqwest error")
            .next()
            .map(|feed| format!("{}: request timed out", feed))
            .unwrap_or_else(|| msg.to_string());
    }
    msg.to_string()
}
