use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;

use stockdash_core::db::DbPool;
use stockdash_core::history::{HistoryRepository, HistoryService, HistoryServiceTrait};
use stockdash_core::holdings::{
    HoldingError, HoldingRepository, HoldingService, HoldingServiceTrait, NewHolding,
    NewPosition, NewPositionEntry,
};
use stockdash_core::market_data::{
    MarketDataError, MarketDataProviderTrait, MarketDataService, PriceQuote, StockProfile,
};
use stockdash_core::portfolios::{
    PortfolioError, PortfolioRepository, PortfolioService, PortfolioServiceTrait,
};
use stockdash_core::Error;

mod common;

/// Provider with a fixed tape, so valuations are deterministic
struct FixedProvider {
    prices: HashMap<String, Decimal>,
    sectors: HashMap<String, String>,
}

impl FixedProvider {
    fn new() -> Self {
        Self {
            prices: HashMap::new(),
            sectors: HashMap::new(),
        }
    }

    fn with_quote(mut self, ticker: &str, price: Decimal, sector: &str) -> Self {
        self.prices.insert(ticker.to_string(), price);
        self.sectors.insert(ticker.to_string(), sector.to_string());
        self
    }
}

#[async_trait]
impl MarketDataProviderTrait for FixedProvider {
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

fn build_services(
    pool: Arc<DbPool>,
    provider: FixedProvider,
) -> (PortfolioService, Arc<HoldingService>, Arc<HistoryService>) {
    let holding_service = Arc::new(HoldingService::new(Arc::new(HoldingRepository::new(
        pool.clone(),
    ))));
    let history_service = Arc::new(HistoryService::new(Arc::new(HistoryRepository::new(
        pool.clone(),
    ))));
    let market_data_service = Arc::new(MarketDataService::new(Arc::new(provider)));

    let portfolio_service = PortfolioService::new(
        Arc::new(PortfolioRepository::new(pool)),
        holding_service.clone(),
        market_data_service,
        history_service.clone(),
    );

    (portfolio_service, holding_service, history_service)
}

fn lot(shares: Decimal, buy_price: Decimal) -> NewPositionEntry {
    NewPositionEntry {
        shares,
        buy_price,
        buy_date: None,
        notes: None,
    }
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_holding_ledger_aggregates_through_the_database() {
    let pool = common::setup_test_db("ledger");
    let (portfolio_service, holding_service, _) = build_services(pool, FixedProvider::new());

    let portfolio = portfolio_service.get_or_create_default("user-1").unwrap();

    let hbl = holding_service
        .create_holding(NewHolding {
            portfolio_id: portfolio.id.clone(),
            ticker: "hbl".to_string(),
            stock_name: "Habib Bank".to_string(),
            positions: vec![lot(dec!(100), dec!(150))],
        })
        .unwrap();

    // Ticker is normalized on the way in
    assert_eq!(hbl.ticker, "HBL");
    assert_eq!(hbl.shares, dec!(100));
    assert_eq!(hbl.avg_buy_price, dec!(150));

    // Second lot moves the weighted average: (15000 + 8000) / 150
    holding_service
        .add_position(NewPosition {
            holding_id: hbl.id.clone(),
            shares: dec!(50),
            buy_price: dec!(160),
            buy_date: Some(date("2025-01-05")),
            notes: None,
        })
        .unwrap();

    let reloaded = holding_service
        .get_holding_with_positions(&hbl.id)
        .unwrap();
    assert_eq!(reloaded.holding.shares, dec!(150));
    assert_eq!(reloaded.holding.avg_buy_price.round_dp(2), dec!(153.33));
    assert_eq!(reloaded.positions.len(), 2);

    // Deleting one lot recomputes the aggregate from what remains
    let second_lot = reloaded
        .positions
        .iter()
        .find(|p| p.buy_price == dec!(160))
        .unwrap();
    holding_service.delete_position(&second_lot.id).unwrap();

    let reloaded = holding_service
        .get_holding_with_positions(&hbl.id)
        .unwrap();
    assert_eq!(reloaded.holding.shares, dec!(100));
    assert_eq!(reloaded.holding.avg_buy_price, dec!(150));

    // Deleting the last lot removes the holding itself
    let last_lot_id = reloaded.positions[0].id.clone();
    holding_service.delete_position(&last_lot_id).unwrap();

    let holdings = holding_service.get_holdings(&portfolio.id).unwrap();
    assert!(holdings.is_empty());
}

#[test]
fn test_create_holding_rejects_duplicate_ticker_in_portfolio() {
    let pool = common::setup_test_db("duplicate-ticker");
    let (portfolio_service, holding_service, _) = build_services(pool, FixedProvider::new());

    let portfolio = portfolio_service.get_or_create_default("user-1").unwrap();
    holding_service
        .create_holding(NewHolding {
            portfolio_id: portfolio.id.clone(),
            ticker: "HBL".to_string(),
            stock_name: "Habib Bank".to_string(),
            positions: vec![lot(dec!(100), dec!(150))],
        })
        .unwrap();

    // Same ticker again, only differing in case; normalization makes it collide
    let result = holding_service.create_holding(NewHolding {
        portfolio_id: portfolio.id.clone(),
        ticker: "hbl".to_string(),
        stock_name: "Habib Bank".to_string(),
        positions: vec![lot(dec!(10), dec!(140))],
    });

    assert!(matches!(
        result,
        Err(Error::Holding(HoldingError::InvalidData(_)))
    ));
    assert_eq!(holding_service.get_holdings(&portfolio.id).unwrap().len(), 1);
}

#[test]
fn test_delete_missing_portfolio_returns_not_found() {
    let pool = common::setup_test_db("delete-missing");
    let (portfolio_service, _, _) = build_services(pool, FixedProvider::new());

    let err = portfolio_service
        .delete_portfolio("does-not-exist")
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Portfolio(PortfolioError::NotFound(_))
    ));
}

#[test]
fn test_view_values_live_and_fallback_holdings() {
    let pool = common::setup_test_db("view");
    let provider = FixedProvider::new().with_quote("HBL", dec!(170), "Banking");
    let (portfolio_service, holding_service, _) = build_services(pool, provider);

    let portfolio = portfolio_service.get_or_create_default("user-1").unwrap();

    holding_service
        .create_holding(NewHolding {
            portfolio_id: portfolio.id.clone(),
            ticker: "HBL".to_string(),
            stock_name: "Habib Bank".to_string(),
            positions: vec![lot(dec!(100), dec!(150)), lot(dec!(50), dec!(160))],
        })
        .unwrap();
    holding_service
        .create_holding(NewHolding {
            portfolio_id: portfolio.id.clone(),
            ticker: "LUCK".to_string(),
            stock_name: "Lucky Cement".to_string(),
            positions: vec![lot(dec!(40), dec!(400))],
        })
        .unwrap();

    let view = tokio_test::block_on(portfolio_service.get_portfolio_view(&portfolio.id)).unwrap();

    // HBL priced live at 170: 150 * 170 = 25500.
    // LUCK has no quote, falls back to its cost basis: 40 * 400 = 16000.
    assert_eq!(view.valuation.total_value, dec!(41500));
    assert_eq!(view.valuation.total_cost.round_dp(2), dec!(39000));
    assert!(view.valuation.failed_tickers.contains("LUCK"));

    let luck = view
        .valuation
        .holdings
        .iter()
        .find(|h| h.ticker == "LUCK")
        .unwrap();
    assert!(!luck.price_resolved);
    assert_eq!(luck.pnl, dec!(0));

    // Sector allocation puts the unclassified fallback under "Unknown"
    assert_eq!(view.sectors.len(), 2);
    assert_eq!(view.sectors[0].sector, "Banking");
    assert_eq!(view.sectors[0].value, dec!(25500));
    assert_eq!(view.sectors[1].sector, "Unknown");
    assert_eq!(view.sectors[1].value, dec!(16000));
}

#[test]
fn test_snapshot_pipeline_is_idempotent_per_day() {
    let pool = common::setup_test_db("snapshots");
    let provider = FixedProvider::new().with_quote("HBL", dec!(170), "Banking");
    let (portfolio_service, holding_service, history_service) = build_services(pool, provider);

    let portfolio = portfolio_service.get_or_create_default("user-1").unwrap();
    holding_service
        .create_holding(NewHolding {
            portfolio_id: portfolio.id.clone(),
            ticker: "HBL".to_string(),
            stock_name: "Habib Bank".to_string(),
            positions: vec![lot(dec!(100), dec!(150))],
        })
        .unwrap();

    let day_one = date("2025-01-10");

    // Capturing twice for the same day overwrites, never duplicates
    tokio_test::block_on(portfolio_service.capture_snapshot(&portfolio.id, day_one)).unwrap();
    tokio_test::block_on(portfolio_service.capture_snapshot(&portfolio.id, day_one)).unwrap();

    let history = history_service.get_history(&portfolio.id, None).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, format!("{}_2025-01-10", portfolio.id));
    assert_eq!(history[0].total_value, dec!(17000));

    // The scheduled job skips the already-captured day
    let summary = tokio_test::block_on(portfolio_service.run_daily_snapshots(day_one)).unwrap();
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.processed, 0);

    // A new day is processed, and history reads back oldest first
    let day_two = date("2025-01-11");
    let summary = tokio_test::block_on(portfolio_service.run_daily_snapshots(day_two)).unwrap();
    assert_eq!(summary.processed, 1);

    let history = history_service.get_history(&portfolio.id, None).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].snapshot_date, day_one);
    assert_eq!(history[1].snapshot_date, day_two);
}

#[test]
fn test_delete_portfolio_cascades_to_all_dependents() {
    let pool = common::setup_test_db("cascade");
    let (portfolio_service, holding_service, history_service) =
        build_services(pool, FixedProvider::new().with_quote("HBL", dec!(170), "Banking"));

    let portfolio = portfolio_service.get_or_create_default("user-1").unwrap();
    holding_service
        .create_holding(NewHolding {
            portfolio_id: portfolio.id.clone(),
            ticker: "HBL".to_string(),
            stock_name: "Habib Bank".to_string(),
            positions: vec![lot(dec!(10), dec!(100))],
        })
        .unwrap();
    tokio_test::block_on(portfolio_service.capture_snapshot(&portfolio.id, date("2025-01-10")))
        .unwrap();

    portfolio_service.delete_portfolio(&portfolio.id).unwrap();

    assert!(portfolio_service.list_portfolios().unwrap().is_empty());
    assert!(holding_service.get_holdings(&portfolio.id).unwrap().is_empty());
    assert!(history_service
        .get_history(&portfolio.id, None)
        .unwrap()
        .is_empty());

    // A fresh default is created on next access
    let fresh = portfolio_service.get_or_create_default("user-1").unwrap();
    assert_ne!(fresh.id, portfolio.id);
}
