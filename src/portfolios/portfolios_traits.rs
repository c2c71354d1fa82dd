use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::Result;
use crate::history::HistorySnapshot;

use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioView, SnapshotJobSummary};

/// Trait defining the contract for Portfolio service operations.
#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    fn get_or_create_default(&self, user_id: &str) -> Result<Portfolio>;
    fn rename_portfolio(&self, portfolio_id: &str, name: &str) -> Result<Portfolio>;
    fn list_portfolios(&self) -> Result<Vec<Portfolio>>;
    fn delete_portfolio(&self, portfolio_id: &str) -> Result<()>;

    /// Reconciles live prices and aggregates sectors for one portfolio.
    async fn get_portfolio_view(&self, portfolio_id: &str) -> Result<PortfolioView>;

    /// Runs the reconcile → aggregate → save pipeline for one portfolio.
    async fn capture_snapshot(&self, portfolio_id: &str, date: NaiveDate)
        -> Result<HistorySnapshot>;

    /// Scheduled-job variant: one snapshot per portfolio per day, skipping
    /// portfolios already snapshotted for `date`.
    async fn run_daily_snapshots(&self, date: NaiveDate) -> Result<SnapshotJobSummary>;
}

/// Trait defining the contract for Portfolio repository operations.
pub trait PortfolioRepositoryTrait: Send + Sync {
    fn create(&self, new_portfolio: &NewPortfolio) -> Result<Portfolio>;
    fn get(&self, portfolio_id: &str) -> Result<Portfolio>;
    fn get_by_user(&self, user_id: &str) -> Result<Option<Portfolio>>;
    fn rename(&self, portfolio_id: &str, name: &str) -> Result<Portfolio>;
    fn list(&self) -> Result<Vec<Portfolio>>;
    /// Deletes the portfolio and cascades to holdings, positions, history.
    fn delete(&self, portfolio_id: &str) -> Result<()>;
}
