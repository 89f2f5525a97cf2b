//! Plain-text rendering of a table, used by the snapshot command and headless mode

use super::column::Record;
use super::view::{TableBody, TableView};
use crate::consts::cli_consts::{EMPTY_PLACEHOLDER, LOADING_PLACEHOLDER};

/// Renders the current page of `records` as an aligned text grid.
pub fn render_text<R: Record>(view: &TableView<R>, records: &[R], loading: bool) -> String {
    let headers: Vec<String> = view
        .columns()
        .iter()
        .enumerate()
        .map(|(i, column)| match view.sort() {
            Some(sort) if sort.column == i => format!("{} {}", column.label, sort.direction.arrow()),
            _ => column.label.to_string(),
        })
        .collect();

    let page = match view.body(records, loading) {
        TableBody::Loading => return format!("{}\n{}\n", headers.join(" | "), LOADING_PLACEHOLDER),
        TableBody::Empty => return format!("{}\n{}\n", headers.join(" | "), EMPTY_PLACEHOLDER),
        TableBody::Rows(page) => page,
    };

    let cells: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.render()).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&pad_row(&headers, &widths));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for row in &cells {
        out.push_str(&pad_row(row, &widths));
        out.push('\n');
    }
    out.push_str(&format!(
        "Page {} of {} ({} rows)\n",
        page.page_index + 1,
        page.page_count,
        page.total
    ));
    out
}

fn pad_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}
