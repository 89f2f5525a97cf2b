//! Dashboard state update logic
//!
//! Applies controller snapshots, queued events and key actions to the dashboard state

use super::state::{ActiveTable, DashboardState};
use crate::controller::RefreshState;

/// A navigation action on the visible table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TableAction {
    SwitchTable,
    PreviousColumn,
    NextColumn,
    ToggleSort,
    NextPage,
    PreviousPage,
    CyclePageSize,
}

impl DashboardState {
    /// Update the dashboard with the latest controller snapshot and queued events.
    pub fn update(&mut self, snapshot: RefreshState) {
        self.tick += 1;

        // A new commit sends both tables back to their first page.
        self.pair_view.sync_generation(snapshot.generation);
        self.track_view.sync_generation(snapshot.generation);
        self.refresh = snapshot;

        while let Some(event) = self.pending_events.pop_front() {
            self.add_to_activity_log(event);
        }
    }

    pub fn apply(&mut self, action: TableAction) {
        let pair_len = self.refresh.arbi_pair_data.len();
        let track_len = self.refresh.arbi_track_data.len();

        match (action, self.active_table) {
            (TableAction::SwitchTable, current) => self.active_table = current.toggle(),

            (TableAction::PreviousColumn, ActiveTable::Pairs) => {
                self.pair_column = step_column(self.pair_column, self.pair_view.columns().len(), -1)
            }
            (TableAction::PreviousColumn, ActiveTable::Track) => {
                self.track_column =
                    step_column(self.track_column, self.track_view.columns().len(), -1)
            }
            (TableAction::NextColumn, ActiveTable::Pairs) => {
                self.pair_column = step_column(self.pair_column, self.pair_view.columns().len(), 1)
            }
            (TableAction::NextColumn, ActiveTable::Track) => {
                self.track_column = step_column(self.track_column, self.track_view.columns().len(), 1)
            }

            (TableAction::ToggleSort, ActiveTable::Pairs) => {
                self.pair_view.toggle_sort(self.pair_column);
            }
            (TableAction::ToggleSort, ActiveTable::Track) => {
                self.track_view.toggle_sort(self.track_column);
            }

            (TableAction::NextPage, ActiveTable::Pairs) => self.pair_view.next_page(pair_len),
            (TableAction::NextPage, ActiveTable::Track) => self.track_view.next_page(track_len),
            (TableAction::PreviousPage, ActiveTable::Pairs) => self.pair_view.previous_page(),
            (TableAction::PreviousPage, ActiveTable::Track) => self.track_view.previous_page(),

            (TableAction::CyclePageSize, ActiveTable::Pairs) => {
                self.pair_view.cycle_page_size();
            }
            (TableAction::CyclePageSize, ActiveTable::Track) => {
                self.track_view.cycle_page_size();
            }
        }
    }
}

/// Moves the header selection by one, wrapping at both ends.
fn step_column(current: usize, count: usize, delta: isize) -> usize {
    if count == 0 {
        return 0;
    }
    (current as isize + delta).rem_euclid(count as isize) as usize
}
