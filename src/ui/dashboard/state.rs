//! Dashboard state management
//!
//! Contains the main dashboard state struct and related enums

use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::controller::RefreshState;
use crate::environment::Environment;
use crate::events::Event as ControllerEvent;
use crate::records::{ArbitragePairRecord, ArbitrageTrackRecord};
use crate::table::{TableView, pair_table, track_table};
use crate::ui::app::UIConfig;

use std::collections::VecDeque;
use std::time::Instant;

/// The table currently shown.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
pub enum ActiveTable {
    #[strum(to_string = "ArbiPair")]
    Pairs,
    #[strum(to_string = "ArbiTrack")]
    Track,
}

impl ActiveTable {
    pub fn toggle(self) -> Self {
        match self {
            ActiveTable::Pairs => ActiveTable::Track,
            ActiveTable::Track => ActiveTable::Pairs,
        }
    }
}

/// Dashboard state: the latest controller snapshot plus per-table view state.
pub struct DashboardState {
    /// The environment in which the application is running.
    pub environment: Environment,
    /// The start time of the application, used for computing uptime.
    pub start_time: Instant,
    /// Whether to enable background colors
    pub with_background_color: bool,
    /// Latest committed controller state.
    pub refresh: RefreshState,
    pub active_table: ActiveTable,
    pub pair_view: TableView<ArbitragePairRecord>,
    pub track_view: TableView<ArbitrageTrackRecord>,
    /// Highlighted header column of each table.
    pub pair_column: usize,
    pub track_column: usize,
    /// Queue of events waiting to be processed
    pub pending_events: VecDeque<ControllerEvent>,
    /// Activity logs for display
    pub activity_logs: VecDeque<ControllerEvent>,
    /// Animation tick counter
    pub tick: usize,
}

impl DashboardState {
    /// Creates a new instance of the dashboard state.
    pub fn new(
        environment: Environment,
        start_time: Instant,
        refresh: RefreshState,
        ui_config: &UIConfig,
    ) -> Self {
        let mut pair_view = pair_table(&ui_config.page_size_options);
        let mut track_view = track_table(&ui_config.page_size_options);
        if let Some(size) = ui_config.initial_page_size {
            if let Err(e) = pair_view
                .set_page_size(size)
                .and_then(|()| track_view.set_page_size(size))
            {
                log::warn!("keeping page size {}: {}", pair_view.page_size(), e);
            }
        }
        pair_view.sync_generation(refresh.generation);
        track_view.sync_generation(refresh.generation);

        Self {
            environment,
            start_time,
            with_background_color: ui_config.with_background_color,
            refresh,
            active_table: ActiveTable::Pairs,
            pair_view,
            track_view,
            pair_column: 0,
            track_column: 0,
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            tick: 0,
        }
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: ControllerEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: ControllerEvent) {
        self.pending_events.push_back(event);
    }

    pub fn selected_column(&self) -> usize {
        match self.active_table {
            ActiveTable::Pairs => self.pair_column,
            ActiveTable::Track => self.track_column,
        }
    }
}
