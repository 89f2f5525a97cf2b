//! Table panel component
//!
//! Renders the error banner, the active table and its pagination line

use crate::consts::cli_consts::{EMPTY_PLACEHOLDER, LOADING_PLACEHOLDER};
use crate::table::{CellValue, Record, TableBody, TableView};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap};

const HEADER_HEIGHT: u16 = 2;

/// What the panel needs besides the table model itself.
pub struct PanelContext<'a> {
    pub title: String,
    pub error: Option<&'a str>,
    pub loading: bool,
    pub selected_column: usize,
}

pub fn render_table_panel<R: Record>(
    f: &mut Frame,
    area: Rect,
    view: &TableView<R>,
    records: &[R],
    ctx: PanelContext<'_>,
) {
    let banner_height = if ctx.error.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(banner_height),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .split(area);

    if let Some(error) = ctx.error {
        let banner = Paragraph::new(format!("Error: {}", error))
            .style(Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Red)),
            );
        f.render_widget(banner, chunks[0]);
    }

    let header = header_row(view, ctx.selected_column);
    let block = Block::default()
        .title(ctx.title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));

    let body = view.body(records, ctx.loading);
    let (rows, placeholder, page_label) = match &body {
        TableBody::Loading => (
            Vec::new(),
            Some((LOADING_PLACEHOLDER, Color::LightBlue)),
            format!("Page 1 of 1 | {} rows per page", view.page_size()),
        ),
        TableBody::Empty => (
            Vec::new(),
            Some((EMPTY_PLACEHOLDER, Color::DarkGray)),
            format!("Page 1 of 1 | {} rows per page", view.page_size()),
        ),
        TableBody::Rows(page) => (
            page.rows
                .iter()
                .enumerate()
                .map(|(i, row)| data_row(row, i))
                .collect(),
            None,
            format!(
                "{}Page {} of {}{} | {} rows | {} rows per page",
                if view.can_previous_page() { "◀ " } else { "" },
                page.page_index + 1,
                page.page_count,
                if view.can_next_page(records.len()) { " ▶" } else { "" },
                page.total,
                view.page_size()
            ),
        ),
    };

    let column_count = view.columns().len().max(1) as u32;
    let widths = vec![Constraint::Ratio(1, column_count); view.columns().len()];
    let inner = block.inner(chunks[1]);
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, chunks[1]);

    if let Some((text, color)) = placeholder {
        let area = Rect {
            y: inner.y.saturating_add(HEADER_HEIGHT),
            height: inner.height.saturating_sub(HEADER_HEIGHT),
            ..inner
        };
        let message = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color));
        f.render_widget(message, area);
    }

    let pagination = Paragraph::new(page_label)
        .alignment(Alignment::Right)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(pagination, chunks[2]);
}

fn header_row<R: Record>(view: &TableView<R>, selected: usize) -> Row<'static> {
    let cells = view.columns().iter().enumerate().map(|(i, column)| {
        let label = match view.sort() {
            Some(sort) if sort.column == i => format!("{} {}", column.label, sort.direction.arrow()),
            _ => column.label.to_string(),
        };
        let mut style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        if i == selected {
            style = style.fg(Color::Black).bg(Color::Cyan);
        }
        Cell::from(label).style(style)
    });
    Row::new(cells).height(HEADER_HEIGHT)
}

fn data_row(row: &[CellValue], index: usize) -> Row<'static> {
    let cells = row.iter().map(|cell| {
        let style = match cell {
            CellValue::Percent(v) if *v > 0.0 => Style::default().fg(Color::LightGreen),
            CellValue::Percent(_) => Style::default().fg(Color::Gray),
            CellValue::Missing => Style::default().fg(Color::DarkGray),
            _ => Style::default(),
        };
        Cell::from(cell.render()).style(style)
    });
    let row = Row::new(cells);
    if index % 2 == 1 {
        row.style(Style::default().bg(Color::Rgb(24, 30, 36)))
    } else {
        row
    }
}
