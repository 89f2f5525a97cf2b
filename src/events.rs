//! Event System
//!
//! Types and implementations for refresh controller events and logging

use crate::feeds::error::FeedKind;
use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum Worker {
    /// The pair feed fetcher.
    PairFeed,
    /// The per-coin track feed fetcher.
    TrackFeed,
    /// The refresh controller itself (scheduling, gating, commits).
    Controller,
}

impl From<FeedKind> for Worker {
    fn from(kind: FeedKind) -> Self {
        match kind {
            FeedKind::Pairs => Worker::PairFeed,
            FeedKind::Track => Worker::TrackFeed,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    Gated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub worker: Worker,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
}

impl Event {
    pub fn new(worker: Worker, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            worker,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
        }
    }

    pub fn controller(msg: String, event_type: EventType) -> Self {
        Self::new(Worker::Controller, msg, event_type, LogLevel::Info)
    }

    pub fn feed_with_level(
        feed: FeedKind,
        msg: String,
        event_type: EventType,
        log_level: LogLevel,
    ) -> Self {
        Self::new(feed.into(), msg, event_type, log_level)
    }

    pub fn should_display(&self) -> bool {
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg)
    }
}
