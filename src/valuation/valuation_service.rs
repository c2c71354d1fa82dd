use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::constants::UNKNOWN_SECTOR;
use crate::holdings::Holding;
use crate::market_data::{PriceFetchResult, PriceQuote};

use super::valuation_model::{HoldingValuation, PortfolioValuation, SectorBucket};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Values one holding against an optionally resolved quote.
///
/// Without a quote the average buy price stands in for the current price, so
/// the holding shows its cost basis and zero pnl rather than an error.
pub fn value_holding(holding: &Holding, quote: Option<&PriceQuote>) -> HoldingValuation {
    let current_price = quote.map(|q| q.price).unwrap_or(holding.avg_buy_price);

    let cost_basis = holding.shares * holding.avg_buy_price;
    let current_value = holding.shares * current_price;
    let pnl = current_value - cost_basis;
    let pnl_percent = if cost_basis.is_zero() {
        Decimal::ZERO
    } else {
        pnl / cost_basis * HUNDRED
    };
    let today_change = quote
        .map(|q| holding.shares * q.absolute_change)
        .unwrap_or(Decimal::ZERO);

    HoldingValuation {
        holding_id: holding.id.clone(),
        ticker: holding.ticker.clone(),
        stock_name: holding.stock_name.clone(),
        shares: holding.shares,
        avg_buy_price: holding.avg_buy_price,
        current_price,
        cost_basis,
        current_value,
        pnl,
        pnl_percent,
        today_change,
        price_resolved: quote.is_some(),
    }
}

/// Values every holding of a portfolio against one reconciliation result and
/// sums the per-holding quantities into portfolio totals.
pub fn value_portfolio(
    portfolio_id: &str,
    holdings: &[Holding],
    prices: &PriceFetchResult,
) -> PortfolioValuation {
    let valuations: Vec<HoldingValuation> = holdings
        .iter()
        .map(|holding| value_holding(holding, prices.quotes.get(&holding.ticker)))
        .collect();

    let total_value: Decimal = valuations.iter().map(|v| v.current_value).sum();
    let total_cost: Decimal = valuations.iter().map(|v| v.cost_basis).sum();
    let total_pnl = total_value - total_cost;
    let pnl_percent = if total_cost.is_zero() {
        Decimal::ZERO
    } else {
        total_pnl / total_cost * HUNDRED
    };
    let today_change: Decimal = valuations.iter().map(|v| v.today_change).sum();

    PortfolioValuation {
        portfolio_id: portfolio_id.to_string(),
        holdings: valuations,
        total_value,
        total_cost,
        total_pnl,
        pnl_percent,
        today_change,
        failed_tickers: prices.failed_tickers.clone(),
    }
}

/// Partitions the valued holdings into sector buckets using the master-data
/// lookup; tickers absent from the lookup land in the "Unknown" bucket.
/// Buckets are sorted descending by current value for presentation.
pub fn aggregate_sectors(
    valuations: &[HoldingValuation],
    sectors: &HashMap<String, String>,
) -> Vec<SectorBucket> {
    let total_value: Decimal = valuations.iter().map(|v| v.current_value).sum();

    let mut grouped: HashMap<&str, Vec<&HoldingValuation>> = HashMap::new();
    for valuation in valuations {
        let sector = sectors
            .get(&valuation.ticker)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_SECTOR);
        grouped.entry(sector).or_default().push(valuation);
    }

    let mut buckets: Vec<SectorBucket> = grouped
        .into_iter()
        .map(|(sector, members)| {
            let value: Decimal = members.iter().map(|v| v.current_value).sum();
            let cost: Decimal = members.iter().map(|v| v.cost_basis).sum();
            let pnl = value - cost;
            let pnl_percent = if cost.is_zero() {
                Decimal::ZERO
            } else {
                pnl / cost * HUNDRED
            };
            let weight_percent = if total_value.is_zero() {
                Decimal::ZERO
            } else {
                value / total_value * HUNDRED
            };

            SectorBucket {
                sector: sector.to_string(),
                holdings_count: members.len(),
                value,
                cost,
                pnl,
                pnl_percent,
                weight_percent,
            }
        })
        .collect();

    buckets.sort_by(|a, b| b.value.cmp(&a.value));
    buckets
}
