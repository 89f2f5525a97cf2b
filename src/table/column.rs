//! Column specification and cell values

use crate::records::{FieldValue, format_profit};
use std::cmp::Ordering;

/// A resolved cell. Sorting uses the raw value, rendering applies presentation rules.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    /// A percentage, rendered with two decimals and a trailing "%".
    Percent(f64),
    Missing,
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) | CellValue::Percent(v) => Some(*v),
            CellValue::Text(s) => s.trim().parse().ok(),
            CellValue::Missing => None,
        }
    }

    pub fn render(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(v) => v.to_string(),
            CellValue::Percent(v) => format_profit(*v),
            CellValue::Missing => crate::records::NOT_AVAILABLE.to_string(),
        }
    }
}

impl From<&FieldValue> for CellValue {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Number(v) => CellValue::Number(*v),
            FieldValue::Text(s) => CellValue::Text(s.clone()),
            FieldValue::NotAvailable => CellValue::Missing,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

/// Field lookup by name, used by `Accessor::Field`.
pub trait Record {
    fn field(&self, name: &str) -> Option<CellValue>;
}

/// How a column obtains its value from a record.
pub enum Accessor<R> {
    /// A named field of the record.
    Field(&'static str),
    /// A value computed from the whole record.
    Derived(fn(&R) -> CellValue),
}

impl<R: Record> Accessor<R> {
    pub fn resolve(&self, record: &R) -> CellValue {
        match self {
            Accessor::Field(name) => record.field(name).unwrap_or(CellValue::Missing),
            Accessor::Derived(derive) => derive(record),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SortKind {
    /// Case-insensitive text order; numeric text compares as numbers.
    Alphanumeric,
    /// Numeric order; cells without a number order before all numbers.
    Number,
}

impl SortKind {
    pub fn compare(&self, a: &CellValue, b: &CellValue) -> Ordering {
        match self {
            SortKind::Number => compare_numeric(a.as_f64(), b.as_f64()),
            SortKind::Alphanumeric => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => a.render().to_lowercase().cmp(&b.render().to_lowercase()),
            },
        }
    }
}

fn compare_numeric(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

pub struct Column<R> {
    pub label: &'static str,
    pub accessor: Accessor<R>,
    pub sortable: bool,
    pub sort_kind: SortKind,
    /// The first click sorts descending instead of ascending.
    pub desc_first: bool,
}

impl<R: Record> Column<R> {
    pub fn field(label: &'static str, name: &'static str) -> Self {
        Self {
            label,
            accessor: Accessor::Field(name),
            sortable: true,
            sort_kind: SortKind::Alphanumeric,
            desc_first: false,
        }
    }

    pub fn derived(label: &'static str, derive: fn(&R) -> CellValue) -> Self {
        Self {
            label,
            accessor: Accessor::Derived(derive),
            sortable: true,
            sort_kind: SortKind::Alphanumeric,
            desc_first: false,
        }
    }

    pub fn numeric(mut self) -> Self {
        self.sort_kind = SortKind::Number;
        self
    }

    pub fn desc_first(mut self) -> Self {
        self.desc_first = true;
        self
    }

    pub fn first_direction(&self) -> SortDirection {
        if self.desc_first {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    pub fn value(&self, record: &R) -> CellValue {
        self.accessor.resolve(record)
    }
}
