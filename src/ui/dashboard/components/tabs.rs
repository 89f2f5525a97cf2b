//! Table selector tabs

use super::super::state::{ActiveTable, DashboardState};
use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Tabs};

pub fn render_tabs(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let titles = [ActiveTable::Pairs, ActiveTable::Track].map(|t| Line::from(t.to_string()));
    let selected = match state.active_table {
        ActiveTable::Pairs => 0,
        ActiveTable::Track => 1,
    };

    let last_refresh = match state.refresh.last_refresh_at {
        Some(at) => format!("Last refresh {}", at.format("%H:%M:%S")),
        None => "Not refreshed yet".to_string(),
    };
    let uptime = state.start_time.elapsed().as_secs();
    let status = format!(
        "{} | Uptime {}m {}s",
        last_refresh,
        uptime / 60,
        uptime % 60
    );

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider("|");

    f.render_widget(tabs, area);
    f.render_widget(
        Paragraph::new(status)
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
