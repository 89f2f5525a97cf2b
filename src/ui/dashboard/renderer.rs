//! Dashboard main renderer

use super::components::table_panel::{PanelContext, render_table_panel};
use super::components::{footer, header, logs, tabs};
use super::state::{ActiveTable, DashboardState};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Color, Style};
use ratatui::widgets::Block;

pub fn render_dashboard(f: &mut Frame, state: &DashboardState) {
    if state.with_background_color {
        f.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(16, 20, 24))),
            f.area(),
        );
    }

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(8),
            Constraint::Length(2),
        ])
        .margin(1)
        .split(f.area());

    header::render_header(f, main_chunks[0], state);
    tabs::render_tabs(f, main_chunks[1], state);

    let refresh = &state.refresh;
    let ctx = PanelContext {
        title: format!("{} ({})", state.active_table, state.environment.api_url()),
        error: refresh.error.as_deref(),
        loading: refresh.loading,
        selected_column: state.selected_column(),
    };
    match state.active_table {
        ActiveTable::Pairs => render_table_panel(
            f,
            main_chunks[2],
            &state.pair_view,
            &refresh.arbi_pair_data,
            ctx,
        ),
        ActiveTable::Track => render_table_panel(
            f,
            main_chunks[2],
            &state.track_view,
            &refresh.arbi_track_data,
            ctx,
        ),
    }

    logs::render_logs_panel(f, main_chunks[3], state);
    footer::render_footer(f, main_chunks[4]);
}
