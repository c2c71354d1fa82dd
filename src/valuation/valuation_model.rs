use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::utils::decimal_serde::*;

/// Valuation of a single holding against its resolved price.
///
/// When no live price is available the cost basis doubles as the current
/// price (`price_resolved == false`), so pnl is zero for that holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingValuation {
    pub holding_id: String,
    pub ticker: String,
    pub stock_name: String,
    #[serde(with = "decimal_serde")]
    pub shares: Decimal,
    #[serde(with = "decimal_serde")]
    pub avg_buy_price: Decimal,
    #[serde(with = "decimal_serde")]
    pub current_price: Decimal,
    #[serde(with = "decimal_serde")]
    pub cost_basis: Decimal,
    #[serde(with = "decimal_serde")]
    pub current_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub pnl: Decimal,
    #[serde(with = "decimal_serde")]
    pub pnl_percent: Decimal,
    #[serde(with = "decimal_serde")]
    pub today_change: Decimal,
    pub price_resolved: bool,
}

/// Whole-portfolio valuation: per-holding breakdown plus totals
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    pub portfolio_id: String,
    pub holdings: Vec<HoldingValuation>,
    #[serde(with = "decimal_serde")]
    pub total_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_cost: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_pnl: Decimal,
    #[serde(with = "decimal_serde")]
    pub pnl_percent: Decimal,
    #[serde(with = "decimal_serde")]
    pub today_change: Decimal,
    /// Tickers that fell back to cost basis this pass
    pub failed_tickers: HashSet<String>,
}

/// Derived grouping of holdings by sector classification. Recomputed on
/// every valuation pass, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorBucket {
    pub sector: String,
    pub holdings_count: usize,
    #[serde(with = "decimal_serde")]
    pub value: Decimal,
    #[serde(with = "decimal_serde")]
    pub cost: Decimal,
    #[serde(with = "decimal_serde")]
    pub pnl: Decimal,
    #[serde(with = "decimal_serde")]
    pub pnl_percent: Decimal,
    #[serde(with = "decimal_serde")]
    pub weight_percent: Decimal,
}
