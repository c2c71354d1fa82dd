use async_trait::async_trait;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::constants::UNKNOWN_SECTOR;

use super::market_data_model::{PriceFetchResult, PriceQuote};
use super::market_data_traits::{MarketDataProviderTrait, MarketDataServiceTrait};

/// Service folding per-ticker oracle lookups into one reconciliation result
pub struct MarketDataService {
    provider: Arc<dyn MarketDataProviderTrait>,
}

impl MarketDataService {
    /// Creates a new MarketDataService instance
    pub fn new(provider: Arc<dyn MarketDataProviderTrait>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl MarketDataServiceTrait for MarketDataService {
    /// Fans out one lookup per distinct ticker and joins once every lookup
    /// has settled. A failed ticker is reported, never retried here; callers
    /// fall back to cost basis for it.
    async fn fetch_prices(&self, tickers: &HashSet<String>) -> PriceFetchResult {
        let lookups = tickers.iter().map(|ticker| {
            let provider = self.provider.clone();
            let ticker = ticker.clone();
            async move {
                let outcome = provider.get_latest_quote(&ticker).await;
                (ticker, outcome)
            }
        });

        let settled = futures::future::join_all(lookups).await;

        let mut quotes: HashMap<String, PriceQuote> = HashMap::new();
        let mut failed_tickers: HashSet<String> = HashSet::new();
        for (ticker, outcome) in settled {
            match outcome {
                Ok(quote) => {
                    quotes.insert(ticker, quote);
                }
                Err(e) => {
                    warn!("Failed to fetch quote for {}: {}", ticker, e);
                    failed_tickers.insert(ticker);
                }
            }
        }

        debug!(
            "Price fetch resolved {} of {} tickers",
            quotes.len(),
            tickers.len()
        );
        PriceFetchResult {
            quotes,
            failed_tickers,
        }
    }

    async fn get_sector_lookup(&self, tickers: &HashSet<String>) -> HashMap<String, String> {
        let lookups = tickers.iter().map(|ticker| {
            let provider = self.provider.clone();
            let ticker = ticker.clone();
            async move {
                let outcome = provider.get_stock_profile(&ticker).await;
                (ticker, outcome)
            }
        });

        let settled = futures::future::join_all(lookups).await;

        settled
            .into_iter()
            .map(|(ticker, outcome)| match outcome {
                Ok(profile) => (ticker, profile.sector),
                Err(e) => {
                    warn!("No master data for {}: {}", ticker, e);
                    (ticker, UNKNOWN_SECTOR.to_string())
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::market_data_errors::MarketDataError;
    use crate::market_data::market_data_model::StockProfile;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct MockProvider {
        prices: HashMap<String, Decimal>,
        sectors: HashMap<String, String>,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                prices: HashMap::new(),
                sectors: HashMap::new(),
            }
        }

        fn with_price(mut self, ticker: &str, price: Decimal) -> Self {
            self.prices.insert(ticker.to_string(), price);
            self
        }

        fn with_sector(mut self, ticker: &str, sector: &str) -> Self {
            self.sectors.insert(ticker.to_string(), sector.to_string());
            self
        }
    }

    #[async_trait]
    impl MarketDataProviderTrait for MockProvider {
        async fn get_latest_quote(
            &self,
            ticker: &str,
        ) -> std::result::Result<PriceQuote, MarketDataError> {
            match self.prices.get(ticker) {
                Some(price) => Ok(PriceQuote {
                    ticker: ticker.to_string(),
                    price: *price,
                    change_percent: Decimal::ZERO,
                    absolute_change: Decimal::ZERO,
                    volume: Decimal::ZERO,
                    as_of: Utc::now().naive_utc(),
                }),
                None => Err(MarketDataError::NotFound(ticker.to_string())),
            }
        }

        async fn get_stock_profile(
            &self,
            ticker: &str,
        ) -> std::result::Result<StockProfile, MarketDataError> {
            match self.sectors.get(ticker) {
                Some(sector) => Ok(StockProfile {
                    ticker: ticker.to_string(),
                    name: ticker.to_string(),
                    sector: sector.clone(),
                }),
                None => Err(MarketDataError::NotFound(ticker.to_string())),
            }
        }
    }

    fn tickers(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fetch_prices_partial_failure_never_aborts() {
        let provider = Arc::new(MockProvider::new().with_price("AAA", dec!(12.5)));
        let service = MarketDataService::new(provider);

        let result = tokio_test::block_on(service.fetch_prices(&tickers(&["AAA", "BBB"])));

        assert_eq!(result.quotes.len(), 1);
        assert_eq!(result.quotes["AAA"].price, dec!(12.5));
        assert!(result.failed_tickers.contains("BBB"));
        assert!(!result.is_complete());
    }

    #[test]
    fn test_fetch_prices_all_resolved() {
        let provider = Arc::new(
            MockProvider::new()
                .with_price("HBL", dec!(160))
                .with_price("LUCK", dec!(400)),
        );
        let service = MarketDataService::new(provider);

        let result = tokio_test::block_on(service.fetch_prices(&tickers(&["HBL", "LUCK"])));

        assert!(result.is_complete());
        assert_eq!(result.quotes.len(), 2);
    }

    #[test]
    fn test_fetch_prices_empty_input() {
        let provider = Arc::new(MockProvider::new());
        let service = MarketDataService::new(provider);

        let result = tokio_test::block_on(service.fetch_prices(&HashSet::new()));

        assert!(result.quotes.is_empty());
        assert!(result.is_complete());
    }

    #[test]
    fn test_sector_lookup_defaults_to_unknown() {
        let provider = Arc::new(MockProvider::new().with_sector("HBL", "Banking"));
        let service = MarketDataService::new(provider);

        let lookup = tokio_test::block_on(service.get_sector_lookup(&tickers(&["HBL", "XYZ"])));

        assert_eq!(lookup["HBL"], "Banking");
        assert_eq!(lookup["XYZ"], UNKNOWN_SECTOR);
    }
}
