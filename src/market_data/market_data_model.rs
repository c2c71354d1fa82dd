use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::utils::decimal_serde::*;

/// Live quote for one ticker as supplied by the external price oracle.
/// Consumed transiently during reconciliation, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub ticker: String,
    #[serde(with = "decimal_serde")]
    pub price: Decimal,
    #[serde(with = "decimal_serde")]
    pub change_percent: Decimal,
    #[serde(with = "decimal_serde")]
    pub absolute_change: Decimal,
    #[serde(with = "decimal_serde")]
    pub volume: Decimal,
    pub as_of: NaiveDateTime,
}

/// Master-data record for a ticker (name and sector classification)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockProfile {
    pub ticker: String,
    pub name: String,
    pub sector: String,
}

/// Outcome of one reconciliation pass over a set of tickers.
///
/// A ticker appears either in `quotes` or in `failed_tickers`; the pass as a
/// whole never fails because individual lookups did.
#[derive(Debug, Clone, Default)]
pub struct PriceFetchResult {
    pub quotes: HashMap<String, PriceQuote>,
    pub failed_tickers: HashSet<String>,
}

impl PriceFetchResult {
    /// True when every requested ticker resolved to a live quote
    pub fn is_complete(&self) -> bool {
        self.failed_tickers.is_empty()
    }
}
