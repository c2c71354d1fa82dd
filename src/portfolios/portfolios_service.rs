use async_trait::async_trait;
use chrono::NaiveDate;
use log::{error, info};
use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::Result;
use crate::history::{HistorySnapshot, HistoryServiceTrait, NewHistorySnapshot};
use crate::holdings::HoldingServiceTrait;
use crate::market_data::MarketDataServiceTrait;
use crate::valuation;

use super::portfolios_errors::PortfolioError;
use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioView, SnapshotJobSummary};
use super::portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};

const DEFAULT_PORTFOLIO_NAME: &str = "My Portfolio";

/// Orchestrates the reconcile → aggregate → snapshot pipeline over the
/// holding, market data, and history collaborators.
pub struct PortfolioService {
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    holding_service: Arc<dyn HoldingServiceTrait>,
    market_data_service: Arc<dyn MarketDataServiceTrait>,
    history_service: Arc<dyn HistoryServiceTrait>,
}

impl PortfolioService {
    /// Creates a new PortfolioService instance with injected dependencies
    pub fn new(
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        holding_service: Arc<dyn HoldingServiceTrait>,
        market_data_service: Arc<dyn MarketDataServiceTrait>,
        history_service: Arc<dyn HistoryServiceTrait>,
    ) -> Self {
        Self {
            portfolio_repository,
            holding_service,
            market_data_service,
            history_service,
        }
    }

    async fn build_view(&self, portfolio_id: &str) -> Result<PortfolioView> {
        let holdings = self.holding_service.get_holdings(portfolio_id)?;

        let tickers: HashSet<String> = holdings.iter().map(|h| h.ticker.clone()).collect();
        let prices = self.market_data_service.fetch_prices(&tickers).await;
        let sectors = self.market_data_service.get_sector_lookup(&tickers).await;

        let valuation = valuation::value_portfolio(portfolio_id, &holdings, &prices);
        let sector_buckets = valuation::aggregate_sectors(&valuation.holdings, &sectors);

        Ok(PortfolioView {
            valuation,
            sectors: sector_buckets,
        })
    }
}

#[async_trait]
impl PortfolioServiceTrait for PortfolioService {
    /// Returns the user's portfolio, creating it on first use.
    fn get_or_create_default(&self, user_id: &str) -> Result<Portfolio> {
        if let Some(existing) = self.portfolio_repository.get_by_user(user_id)? {
            return Ok(existing);
        }

        let new_portfolio = NewPortfolio {
            user_id: user_id.to_string(),
            name: DEFAULT_PORTFOLIO_NAME.to_string(),
        };
        new_portfolio.validate()?;
        self.portfolio_repository.create(&new_portfolio)
    }

    fn rename_portfolio(&self, portfolio_id: &str, name: &str) -> Result<Portfolio> {
        if name.trim().is_empty() {
            return Err(
                PortfolioError::InvalidData("Portfolio name cannot be empty".to_string()).into(),
            );
        }
        self.portfolio_repository.rename(portfolio_id, name.trim())
    }

    fn list_portfolios(&self) -> Result<Vec<Portfolio>> {
        self.portfolio_repository.list()
    }

    fn delete_portfolio(&self, portfolio_id: &str) -> Result<()> {
        self.portfolio_repository.delete(portfolio_id)
    }

    async fn get_portfolio_view(&self, portfolio_id: &str) -> Result<PortfolioView> {
        // Surface NotFound before doing any price-fetch work
        self.portfolio_repository.get(portfolio_id)?;
        self.build_view(portfolio_id).await
    }

    async fn capture_snapshot(
        &self,
        portfolio_id: &str,
        date: NaiveDate,
    ) -> Result<HistorySnapshot> {
        self.portfolio_repository.get(portfolio_id)?;
        let view = self.build_view(portfolio_id).await?;

        self.history_service.save_snapshot(NewHistorySnapshot {
            portfolio_id: portfolio_id.to_string(),
            snapshot_date: date,
            total_value: view.valuation.total_value,
            total_cost: view.valuation.total_cost,
            total_pnl: view.valuation.total_pnl,
            pnl_percentage: view.valuation.pnl_percent,
            holdings: view.valuation.holdings,
        })
    }

    /// One snapshot per portfolio per day. A portfolio that already has a
    /// row for `date` is skipped before any price-fetch work; a failure on
    /// one portfolio is logged and does not abort the rest of the batch.
    async fn run_daily_snapshots(&self, date: NaiveDate) -> Result<SnapshotJobSummary> {
        let portfolios = self.portfolio_repository.list()?;
        info!(
            "Daily snapshot job: {} portfolios for {}",
            portfolios.len(),
            date
        );

        let mut summary = SnapshotJobSummary::default();
        for portfolio in portfolios {
            match self.history_service.has_snapshot_for_date(&portfolio.id, date) {
                Ok(true) => {
                    summary.skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    error!(
                        "Snapshot job: idempotence check failed for portfolio {}: {}",
                        portfolio.id, e
                    );
                    summary.failed += 1;
                    continue;
                }
            }

            match self.capture_snapshot(&portfolio.id, date).await {
                Ok(_) => summary.processed += 1,
                Err(e) => {
                    error!(
                        "Snapshot job: portfolio {} failed: {}",
                        portfolio.id, e
                    );
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Daily snapshot job done: {} processed, {} skipped, {} failed",
            summary.processed, summary.skipped, summary.failed
        );
        Ok(summary)
    }
}
