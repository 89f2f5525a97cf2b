//! Dashboard header component
//!
//! Renders the title and the refresh countdown gauge

use super::super::state::DashboardState;
use super::super::utils::countdown_percent;
use crate::controller::RefreshPhase;
use crate::controller::state::format_countdown;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

pub const TITLE: &str = "UNLOCK PROFITABLE ARBITRAGE WITH CONFIDENCE";

/// Render header with title and countdown to the next refresh.
pub fn render_header(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let title = Paragraph::new(TITLE)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(title, header_chunks[0]);

    let refresh = &state.refresh;
    let countdown = format!(
        "Next Refresh in: {}",
        format_countdown(refresh.countdown_seconds)
    );
    let (label, gauge_color) = match refresh.phase {
        RefreshPhase::Refreshing => {
            let dots = ".".repeat(state.tick % 4);
            (format!("{} | Refreshing{}", countdown, dots), Color::LightYellow)
        }
        RefreshPhase::Errored => (countdown, Color::LightRed),
        _ => (countdown, Color::LightBlue),
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(
            Style::default()
                .fg(gauge_color)
                .add_modifier(Modifier::BOLD),
        )
        .percent(countdown_percent(
            refresh.countdown_seconds,
            refresh.refresh_interval,
        ))
        .label(label);

    f.render_widget(gauge, header_chunks[1]);
}
