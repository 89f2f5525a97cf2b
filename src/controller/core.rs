//! Event sending utilities for the refresh controller

use crate::events::{Event, EventType};
use crate::feeds::error::FeedKind;
use crate::logging::LogLevel;
use tokio::sync::mpsc;

/// Best-effort event publisher. A full queue drops the event rather than stalling a refresh.
#[derive(Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Send a generic event
    pub fn send_event(&self, event: Event) {
        if let Err(e) = self.sender.try_send(event) {
            log::debug!("dropping dashboard event: {}", e);
        }
    }

    pub fn send_controller_event(&self, message: String, event_type: EventType) {
        self.send_event(Event::controller(message, event_type));
    }

    pub fn send_feed_event(
        &self,
        feed: FeedKind,
        message: String,
        event_type: EventType,
        log_level: LogLevel,
    ) {
        self.send_event(Event::feed_with_level(feed, message, event_type, log_level));
    }
}
