use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use super::market_data_errors::Result;
use super::market_data_model::{PriceFetchResult, PriceQuote, StockProfile};

/// Contract of the external price oracle and stock master data collaborator.
/// Any transport (HTTP, RPC, local cache) satisfying it is acceptable.
#[async_trait]
pub trait MarketDataProviderTrait: Send + Sync {
    /// Latest quote for a single ticker
    async fn get_latest_quote(&self, ticker: &str) -> Result<PriceQuote>;

    /// Master-data profile (display name, sector) for a single ticker
    async fn get_stock_profile(&self, ticker: &str) -> Result<StockProfile>;
}

/// Trait defining the contract for market data service operations.
#[async_trait]
pub trait MarketDataServiceTrait: Send + Sync {
    /// Resolves a current quote per distinct ticker, concurrently.
    /// Individual failures land in `failed_tickers`; this never errors.
    async fn fetch_prices(&self, tickers: &HashSet<String>) -> PriceFetchResult;

    /// Resolves each ticker to its sector; unresolved tickers map to
    /// the "Unknown" sector.
    async fn get_sector_lookup(&self, tickers: &HashSet<String>) -> HashMap<String, String>;
}
