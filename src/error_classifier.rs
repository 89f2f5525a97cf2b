use crate::feeds::error::{FailureKind, FeedError};
use log::LevelFilter;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify_feed_error(&self, error: &FeedError) -> LogLevel {
        match (error.status(), error.kind()) {
            // Rate limiting - the next cycle will try again
            (Some(429), _) => LogLevel::Debug,

            // Critical: access refused by the API
            (Some(401), _) | (Some(403), _) => LogLevel::Error,

            // Server errors - temporary issues
            (Some(status), _) if (500..=599).contains(&status) => LogLevel::Warn,

            // Malformed payloads will not fix themselves
            (_, FailureKind::Format) => LogLevel::Error,

            // Network issues - usually temporary
            (_, FailureKind::Network) => LogLevel::Warn,
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}
