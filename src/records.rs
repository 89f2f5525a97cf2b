//! Arbitrage record model and normalization
//!
//! Converts raw feed payloads into the two canonical record shapes shown by the dashboard.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// Placeholder for exchange and price fields the feed left out.
pub const NOT_AVAILABLE: &str = "N/A";

/// A price or exchange cell as delivered by the feed: a number, free text, or nothing usable.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    #[default]
    NotAvailable,
}

impl FieldValue {
    /// Normalizes a raw JSON value. Falsy values (null, false, 0, "") become `NotAvailable`.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if v != 0.0 && v.is_finite() => FieldValue::Number(v),
                _ => FieldValue::NotAvailable,
            },
            Some(Value::String(s)) if !s.is_empty() => FieldValue::Text(s.clone()),
            Some(Value::Bool(true)) => FieldValue::Text("true".to_string()),
            Some(other @ (Value::Array(_) | Value::Object(_))) => FieldValue::Text(other.to_string()),
            _ => FieldValue::NotAvailable,
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Number(v) => write!(f, "{}", v),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::NotAvailable => write!(f, "{}", NOT_AVAILABLE),
        }
    }
}

/// One opportunity between two coins across two exchanges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbitragePairRecord {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub pair: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub coin1: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub coin2: String,
    #[serde(default, deserialize_with = "field_value")]
    pub min_exchange: FieldValue,
    #[serde(default, deserialize_with = "field_value")]
    pub min_price1: FieldValue,
    #[serde(default, deserialize_with = "field_value")]
    pub min_price2: FieldValue,
    #[serde(default, deserialize_with = "field_value")]
    pub max_exchange: FieldValue,
    #[serde(default, deserialize_with = "field_value")]
    pub max_price1: FieldValue,
    #[serde(default, deserialize_with = "field_value")]
    pub max_price2: FieldValue,
    /// Raw profit value, kept numeric for sorting. Absent or unusable values are 0.
    #[serde(default, deserialize_with = "profit")]
    pub profit_percentage: f64,
}

/// Per-coin single-leg opportunity, keyed by coin symbol in the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbitrageTrackRecord {
    pub coin1: String,
    pub min_exchange: FieldValue,
    pub min_price1: FieldValue,
    pub max_exchange: FieldValue,
    pub max_price1: FieldValue,
    pub profit_percentage: f64,
}

/// The pair endpoint answers either `{ "results": [...] }` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PairsPayload {
    Wrapped { results: Vec<ArbitragePairRecord> },
    Bare(Vec<ArbitragePairRecord>),
}

impl PairsPayload {
    pub fn into_records(self) -> Vec<ArbitragePairRecord> {
        match self {
            PairsPayload::Wrapped { results } => results,
            PairsPayload::Bare(records) => records,
        }
    }
}

/// Flattens a coin -> info mapping into track records, preserving the mapping's order.
///
/// Missing exchange and price sub-fields become "N/A"; a missing profit becomes 0.
/// Sorting is left to the table layer.
pub fn normalize_track(mapping: &Map<String, Value>) -> Vec<ArbitrageTrackRecord> {
    mapping
        .iter()
        .map(|(coin, info)| {
            let field = |name: &str| FieldValue::from_json(info.get(name));
            ArbitrageTrackRecord {
                coin1: coin.clone(),
                min_exchange: field("lowestExchange"),
                min_price1: field("lowestPrice"),
                max_exchange: field("highestExchange"),
                max_price1: field("highestPrice"),
                profit_percentage: profit_from_json(info.get("profitPercentage")),
            }
        })
        .collect()
}

/// Reads a profit value the way the feed publishes it: a number or a numeric string.
pub fn profit_from_json(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Presentation form of a profit percentage: two decimals and a percent sign.
pub fn format_profit(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0.00%".to_string();
    }
    format!("{:.2}%", value)
}

fn field_value<'de, D>(deserializer: D) -> Result<FieldValue, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(FieldValue::from_json(value.as_ref()))
}

fn profit<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(profit_from_json(value.as_ref()))
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    })
}
