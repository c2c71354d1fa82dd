use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::super::market_data_errors::{MarketDataError, Result};
use super::super::market_data_model::{PriceQuote, StockProfile};
use super::super::market_data_traits::MarketDataProviderTrait;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Price oracle client speaking the hosted quote API's JSON contract.
///
/// `GET {base}/quotes/{ticker}` returns the live quote;
/// `GET {base}/stocks/{ticker}` returns the master-data profile.
pub struct HttpQuoteProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuotePayload {
    price: f64,
    change_percent: f64,
    absolute_change: f64,
    volume: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfilePayload {
    name: String,
    sector: String,
}

impl HttpQuoteProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| MarketDataError::ProviderError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: String, ticker: &str) -> Result<T> {
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(MarketDataError::NotFound(ticker.to_string()));
        }
        if !response.status().is_success() {
            return Err(MarketDataError::ProviderError(format!(
                "Unexpected status {} for {}",
                response.status(),
                ticker
            )));
        }

        Ok(response.json::<T>().await?)
    }

    fn to_decimal(value: f64, field: &str) -> Result<Decimal> {
        Decimal::try_from(value)
            .map_err(|e| MarketDataError::ParseError(format!("{}: {}", field, e)))
    }
}

#[async_trait]
impl MarketDataProviderTrait for HttpQuoteProvider {
    async fn get_latest_quote(&self, ticker: &str) -> Result<PriceQuote> {
        let url = format!("{}/quotes/{}", self.base_url, ticker);
        let payload: QuotePayload = self.get_json(url, ticker).await?;

        Ok(PriceQuote {
            ticker: ticker.to_string(),
            price: Self::to_decimal(payload.price, "price")?,
            change_percent: Self::to_decimal(payload.change_percent, "changePercent")?,
            absolute_change: Self::to_decimal(payload.absolute_change, "absoluteChange")?,
            volume: Self::to_decimal(payload.volume, "volume")?,
            as_of: Utc::now().naive_utc(),
        })
    }

    async fn get_stock_profile(&self, ticker: &str) -> Result<StockProfile> {
        let url = format!("{}/stocks/{}", self.base_url, ticker);
        let payload: ProfilePayload = self.get_json(url, ticker).await?;

        Ok(StockProfile {
            ticker: ticker.to_string(),
            name: payload.name,
            sector: payload.sector,
        })
    }
}
