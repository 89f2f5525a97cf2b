//! Screen shown while the subscription is inactive.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

pub const GATED_MESSAGE: &str = "You need an active subscription to access this content.";
pub const SUBSCRIBE_HINT: &str = "[T] Take Subscription | [Q] Quit";

pub fn render_gated(f: &mut Frame) {
    let lines = vec![
        Line::from(Span::styled(
            GATED_MESSAGE,
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(SUBSCRIBE_HINT, Style::default().fg(Color::Cyan))),
    ];

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(5),
            Constraint::Fill(1),
        ])
        .split(f.area());

    let panel = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(panel, vertical[1]);
}
