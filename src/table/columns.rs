//! Column sets for the pair and track tables

use super::column::{CellValue, Column, Record, SortDirection};
use super::view::TableView;
use crate::records::{ArbitragePairRecord, ArbitrageTrackRecord};

/// Index of the profit column in the pair table.
pub const PAIR_PROFIT_COLUMN: usize = 9;

impl Record for ArbitragePairRecord {
    fn field(&self, name: &str) -> Option<CellValue> {
        let value = match name {
            "pair" => CellValue::Text(self.pair.clone()),
            "coin1" => CellValue::Text(self.coin1.clone()),
            "coin2" => CellValue::Text(self.coin2.clone()),
            "minExchange" => (&self.min_exchange).into(),
            "minPrice1" => (&self.min_price1).into(),
            "minPrice2" => (&self.min_price2).into(),
            "maxExchange" => (&self.max_exchange).into(),
            "maxPrice1" => (&self.max_price1).into(),
            "maxPrice2" => (&self.max_price2).into(),
            "profitPercentage" => CellValue::Number(self.profit_percentage),
            _ => return None,
        };
        Some(value)
    }
}

impl Record for ArbitrageTrackRecord {
    fn field(&self, name: &str) -> Option<CellValue> {
        let value = match name {
            "coin1" => CellValue::Text(self.coin1.clone()),
            "minExchange" => (&self.min_exchange).into(),
            "minPrice1" => (&self.min_price1).into(),
            "maxExchange" => (&self.max_exchange).into(),
            "maxPrice1" => (&self.max_price1).into(),
            "profitPercentage" => CellValue::Number(self.profit_percentage),
            _ => return None,
        };
        Some(value)
    }
}

pub fn pair_columns() -> Vec<Column<ArbitragePairRecord>> {
    vec![
        Column::field("Coin Pair", "pair"),
        Column::field("Coin 1", "coin1"),
        Column::field("Coin 2", "coin2"),
        Column::field("Exchange A", "minExchange"),
        Column::field("Coin 1 Price @ Exchange A", "minPrice1").numeric(),
        Column::field("Coin 2 Price @ Exchange A", "minPrice2").numeric(),
        Column::field("Exchange B", "maxExchange"),
        Column::field("Coin 1 Price @ Exchange B", "maxPrice1").numeric(),
        Column::field("Coin 2 Price @ Exchange B", "maxPrice2").numeric(),
        Column::derived("Profit %", |r: &ArbitragePairRecord| {
            CellValue::Percent(r.profit_percentage)
        })
        .numeric()
        .desc_first(),
    ]
}

pub fn track_columns() -> Vec<Column<ArbitrageTrackRecord>> {
    vec![
        Column::field("Coin", "coin1"),
        Column::field("Exchange A", "minExchange"),
        Column::field("Coin Price @ Exchange A", "minPrice1").numeric(),
        Column::field("Exchange B", "maxExchange"),
        Column::field("Coin Price @ Exchange B", "maxPrice1").numeric(),
        Column::derived("Profit %", |r: &ArbitrageTrackRecord| {
            CellValue::Percent(r.profit_percentage)
        })
        .numeric()
        .desc_first(),
    ]
}

/// The pair table, sorted by profit descending until the user picks another column.
pub fn pair_table(page_size_options: &[usize]) -> TableView<ArbitragePairRecord> {
    TableView::new(pair_columns(), page_size_options)
        .with_default_sort(PAIR_PROFIT_COLUMN, SortDirection::Descending)
}

/// The track table, shown in feed order until the user picks a column.
pub fn track_table(page_size_options: &[usize]) -> TableView<ArbitrageTrackRecord> {
    TableView::new(track_columns(), page_size_options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::FieldValue;
    use crate::table::TableBody;

    fn pair(name: &str, profit: f64) -> ArbitragePairRecord {
        ArbitragePairRecord {
            pair: name.to_string(),
            coin1: "A".to_string(),
            coin2: "B".to_string(),
            min_exchange: FieldValue::Text("binance".to_string()),
            min_price1: FieldValue::Number(1.0),
            min_price2: FieldValue::NotAvailable,
            max_exchange: FieldValue::Text("kraken".to_string()),
            max_price1: FieldValue::Number(1.1),
            max_price2: FieldValue::Number(2.2),
            profit_percentage: profit,
        }
    }

    #[test]
    fn test_pair_columns_labels() {
        let labels: Vec<&str> = pair_columns().iter().map(|c| c.label).collect();
        assert_eq!(labels.len(), 10);
        assert_eq!(labels[0], "Coin Pair");
        assert_eq!(labels[PAIR_PROFIT_COLUMN], "Profit %");
        assert_eq!(track_columns().len(), 6);
    }

    #[test]
    // The pair table opens sorted by profit descending, rendered with two decimals.
    fn test_pair_table_default_order_and_format() {
        let table = pair_table(&[10, 20, 30, 40]);
        let records = vec![
            pair("P1", 5.5),
            pair("P2", 12.1),
            pair("P3", 0.0),
            pair("P4", 8.25),
        ];

        let TableBody::Rows(page) = table.body(&records, false) else {
            panic!("expected rows");
        };
        let profits: Vec<String> = page
            .rows
            .iter()
            .map(|row| row[PAIR_PROFIT_COLUMN].render())
            .collect();
        assert_eq!(profits, vec!["12.10%", "8.25%", "5.50%", "0.00%"]);
        assert_eq!(page.rows[0][0].render(), "P2");
        assert_eq!(page.rows[0][5].render(), "N/A");
    }

    #[test]
    fn test_track_table_keeps_feed_order() {
        let table = track_table(&[10]);
        let records: Vec<ArbitrageTrackRecord> = ["XRP", "BTC", "ADA"]
            .iter()
            .enumerate()
            .map(|(i, coin)| ArbitrageTrackRecord {
                coin1: coin.to_string(),
                min_exchange: FieldValue::NotAvailable,
                min_price1: FieldValue::NotAvailable,
                max_exchange: FieldValue::NotAvailable,
                max_price1: FieldValue::NotAvailable,
                profit_percentage: i as f64,
            })
            .collect();

        assert_eq!(table.sort(), None);
        assert_eq!(table.sorted_indices(&records), vec![0, 1, 2]);
    }
}
