//! Sort and pagination state for one table

use super::column::{CellValue, Column, Record, SortDirection};
use crate::consts::cli_consts::DEFAULT_PAGE_SIZE_OPTIONS;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("page size {0} is not one of the configured options")]
    UnsupportedPageSize(usize),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: usize,
    pub direction: SortDirection,
}

/// One page of rendered rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub rows: Vec<Vec<CellValue>>,
    pub page_index: usize,
    pub page_count: usize,
    pub total: usize,
}

/// What the table body shows. The placeholders exclude the populated body.
#[derive(Debug, Clone, PartialEq)]
pub enum TableBody {
    Loading,
    Empty,
    Rows(PageView),
}

/// Sort and pagination state for a column set.
///
/// Header clicks cycle through three states: the column's first direction,
/// the opposite direction, then back to the table's default sort.
pub struct TableView<R> {
    columns: Vec<Column<R>>,
    default_sort: Option<SortState>,
    sort: Option<SortState>,
    page_index: usize,
    page_size: usize,
    page_size_options: Vec<usize>,
    generation: u64,
}

impl<R: Record> TableView<R> {
    pub fn new(columns: Vec<Column<R>>, page_size_options: &[usize]) -> Self {
        let page_size_options = if page_size_options.is_empty() {
            DEFAULT_PAGE_SIZE_OPTIONS.to_vec()
        } else {
            page_size_options.to_vec()
        };
        Self {
            columns,
            default_sort: None,
            sort: None,
            page_index: 0,
            page_size: page_size_options[0],
            page_size_options,
            generation: 0,
        }
    }

    /// Sets the sort applied initially and restored by the third header click.
    pub fn with_default_sort(mut self, column: usize, direction: SortDirection) -> Self {
        if column < self.columns.len() {
            let state = SortState { column, direction };
            self.default_sort = Some(state);
            self.sort = Some(state);
        }
        self
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Advances the sort cycle for `column`. Returns false for unsortable or unknown columns.
    pub fn toggle_sort(&mut self, column: usize) -> bool {
        let Some(col) = self.columns.get(column) else {
            return false;
        };
        if !col.sortable {
            return false;
        }
        let first = col.first_direction();
        self.sort = match self.sort {
            Some(current) if current.column == column && current.direction == first => {
                Some(SortState {
                    column,
                    direction: first.flip(),
                })
            }
            Some(current) if current.column == column => {
                if self.default_sort == Some(current) {
                    // The default is the column's second state; restart the cycle.
                    Some(SortState {
                        column,
                        direction: first,
                    })
                } else {
                    self.default_sort
                }
            }
            _ => Some(SortState {
                column,
                direction: first,
            }),
        };
        self.page_index = 0;
        true
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<(), TableError> {
        if !self.page_size_options.contains(&size) {
            return Err(TableError::UnsupportedPageSize(size));
        }
        self.page_size = size;
        self.page_index = 0;
        Ok(())
    }

    /// Moves to the next configured page size, wrapping around.
    pub fn cycle_page_size(&mut self) -> usize {
        let position = self
            .page_size_options
            .iter()
            .position(|&s| s == self.page_size)
            .unwrap_or(0);
        self.page_size = self.page_size_options[(position + 1) % self.page_size_options.len()];
        self.page_index = 0;
        self.page_size
    }

    /// Resets to the first page when the committed data changed.
    pub fn sync_generation(&mut self, generation: u64) {
        if self.generation != generation {
            self.generation = generation;
            self.page_index = 0;
        }
    }

    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    pub fn can_previous_page(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next_page(&self, len: usize) -> bool {
        self.page_index + 1 < self.page_count(len)
    }

    pub fn next_page(&mut self, len: usize) {
        if self.can_next_page(len) {
            self.page_index += 1;
        }
    }

    pub fn previous_page(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    /// Record indices in display order. Equal keys keep their input order.
    pub fn sorted_indices(&self, records: &[R]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..records.len()).collect();
        let Some(sort) = self.sort else {
            return indices;
        };
        let Some(column) = self.columns.get(sort.column) else {
            return indices;
        };

        let keys: Vec<CellValue> = records.iter().map(|r| column.value(r)).collect();
        indices.sort_by(|&a, &b| match sort.direction {
            SortDirection::Ascending => column.sort_kind.compare(&keys[a], &keys[b]),
            SortDirection::Descending => column.sort_kind.compare(&keys[b], &keys[a]),
        });
        indices
    }

    /// Produces the body for `records`, applying the empty-state policy, sorting and paging.
    pub fn body(&self, records: &[R], loading: bool) -> TableBody {
        if records.is_empty() {
            return if loading {
                TableBody::Loading
            } else {
                TableBody::Empty
            };
        }

        let page_count = self.page_count(records.len());
        let page_index = self.page_index.min(page_count - 1);
        let rows = self
            .sorted_indices(records)
            .into_iter()
            .skip(page_index * self.page_size)
            .take(self.page_size)
            .map(|i| self.columns.iter().map(|c| c.value(&records[i])).collect())
            .collect();

        TableBody::Rows(PageView {
            rows,
            page_index,
            page_count,
            total: records.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Row {
        id: usize,
        name: String,
        profit: f64,
    }

    impl Record for Row {
        fn field(&self, name: &str) -> Option<CellValue> {
            match name {
                "id" => Some(CellValue::Number(self.id as f64)),
                "name" => Some(CellValue::Text(self.name.clone())),
                _ => None,
            }
        }
    }

    fn rows(profits: &[f64]) -> Vec<Row> {
        profits
            .iter()
            .enumerate()
            .map(|(id, &profit)| Row {
                id,
                name: format!("coin{}", id),
                profit,
            })
            .collect()
    }

    fn table() -> TableView<Row> {
        TableView::new(
            vec![
                Column::field("Id", "id").numeric(),
                Column::field("Name", "name"),
                Column::derived("Profit %", |r: &Row| CellValue::Percent(r.profit))
                    .numeric()
                    .desc_first(),
                Column {
                    sortable: false,
                    ..Column::field("Note", "note")
                },
            ],
            &[10, 20, 30, 40],
        )
    }

    fn profits_of(view: &TableView<Row>, records: &[Row]) -> Vec<f64> {
        view.sorted_indices(records)
            .into_iter()
            .map(|i| records[i].profit)
            .collect()
    }

    #[test]
    // Default sort by profit descending.
    fn test_default_sort_profit_descending() {
        let view = table().with_default_sort(2, SortDirection::Descending);
        let records = rows(&[5.5, 12.1, 0.0, 8.25]);

        assert_eq!(profits_of(&view, &records), vec![12.1, 8.25, 5.5, 0.0]);
    }

    #[test]
    // Ties keep the input order in both directions.
    fn test_sort_is_stable() {
        let mut view = table().with_default_sort(2, SortDirection::Descending);
        let records = rows(&[1.0, 3.0, 1.0, 3.0]);

        assert_eq!(view.sorted_indices(&records), vec![1, 3, 0, 2]);
        view.toggle_sort(2);
        assert_eq!(view.sorted_indices(&records), vec![0, 2, 1, 3]);
    }

    #[test]
    // desc-first column: desc -> asc -> default; the default is restored on the third click.
    fn test_toggle_cycle_with_default() {
        let mut view = table().with_default_sort(2, SortDirection::Descending);

        assert!(view.toggle_sort(1));
        assert_eq!(
            view.sort(),
            Some(SortState {
                column: 1,
                direction: SortDirection::Ascending
            })
        );
        view.toggle_sort(1);
        assert_eq!(view.sort().map(|s| s.direction), Some(SortDirection::Descending));
        view.toggle_sort(1);
        assert_eq!(
            view.sort(),
            Some(SortState {
                column: 2,
                direction: SortDirection::Descending
            })
        );

        // On the default column itself the cycle is desc -> asc -> desc.
        view.toggle_sort(2);
        assert_eq!(view.sort().map(|s| s.direction), Some(SortDirection::Ascending));
        view.toggle_sort(2);
        assert_eq!(view.sort().map(|s| s.direction), Some(SortDirection::Descending));
    }

    #[test]
    // Without a default sort, the third click returns to source order.
    fn test_toggle_cycle_without_default() {
        let mut view = table();
        let records = rows(&[2.0, 9.0, 4.0]);

        view.toggle_sort(2);
        assert_eq!(profits_of(&view, &records), vec![9.0, 4.0, 2.0]);
        view.toggle_sort(2);
        assert_eq!(profits_of(&view, &records), vec![2.0, 4.0, 9.0]);
        view.toggle_sort(2);
        assert_eq!(view.sort(), None);
        assert_eq!(profits_of(&view, &records), vec![2.0, 9.0, 4.0]);
    }

    #[test]
    fn test_unsortable_and_unknown_columns_are_ignored() {
        let mut view = table();
        assert!(!view.toggle_sort(3));
        assert!(!view.toggle_sort(42));
        assert_eq!(view.sort(), None);
    }

    #[test]
    // 45 records with page size 20 give three pages: 0-19, 20-39, 40-44.
    fn test_pagination_45_records() {
        let mut view = table();
        view.set_page_size(20).unwrap();
        let records = rows(&[1.0; 45]);

        assert_eq!(view.page_count(records.len()), 3);

        let TableBody::Rows(first) = view.body(&records, false) else {
            panic!("expected rows");
        };
        assert_eq!(first.rows.len(), 20);
        assert_eq!(first.rows[0][0], CellValue::Number(0.0));
        assert_eq!(first.rows[19][0], CellValue::Number(19.0));

        view.next_page(records.len());
        view.next_page(records.len());
        view.next_page(records.len());
        assert_eq!(view.page_index(), 2);
        let TableBody::Rows(last) = view.body(&records, false) else {
            panic!("expected rows");
        };
        assert_eq!(last.rows.len(), 5);
        assert_eq!(last.rows[0][0], CellValue::Number(40.0));
        assert_eq!(last.rows[4][0], CellValue::Number(44.0));
        assert!(!view.can_next_page(records.len()));
    }

    #[test]
    // Page resets to 0 on sort change and on a new data generation.
    fn test_page_resets_on_sort_and_data_change() {
        let mut view = table();
        let records = rows(&[1.0; 35]);

        view.next_page(records.len());
        assert_eq!(view.page_index(), 1);
        view.toggle_sort(0);
        assert_eq!(view.page_index(), 0);

        view.next_page(records.len());
        view.sync_generation(0);
        assert_eq!(view.page_index(), 1);
        view.sync_generation(1);
        assert_eq!(view.page_index(), 0);
    }

    #[test]
    fn test_page_size_must_be_an_option() {
        let mut view = table();
        assert_eq!(
            view.set_page_size(25),
            Err(TableError::UnsupportedPageSize(25))
        );
        assert_eq!(view.page_size(), 10);
        assert_eq!(view.cycle_page_size(), 20);
        assert_eq!(view.cycle_page_size(), 30);
        assert_eq!(view.cycle_page_size(), 40);
        assert_eq!(view.cycle_page_size(), 10);
    }

    #[test]
    // Loading and empty placeholders are mutually exclusive with rows.
    fn test_empty_state_policy() {
        let view = table();
        assert_eq!(view.body(&[], true), TableBody::Loading);
        assert_eq!(view.body(&[], false), TableBody::Empty);
        assert!(matches!(view.body(&rows(&[1.0]), true), TableBody::Rows(_)));
    }
}
