use chrono::NaiveDate;

use crate::errors::Result;

use super::history_model::{HistorySnapshot, NewHistorySnapshot};

/// Trait defining the contract for History service operations.
pub trait HistoryServiceTrait: Send + Sync {
    fn save_snapshot(&self, new_snapshot: NewHistorySnapshot) -> Result<HistorySnapshot>;
    fn get_history(&self, portfolio_id: &str, limit: Option<i64>) -> Result<Vec<HistorySnapshot>>;
    fn has_snapshot_for_date(&self, portfolio_id: &str, date: NaiveDate) -> Result<bool>;
}

/// Trait defining the contract for History repository operations.
pub trait HistoryRepositoryTrait: Send + Sync {
    /// Inserts or overwrites the row for the snapshot's (portfolio, date) key.
    fn upsert(&self, snapshot: &HistorySnapshot) -> Result<()>;
    /// Most recent `limit` snapshots, returned oldest first.
    fn get_history(&self, portfolio_id: &str, limit: i64) -> Result<Vec<HistorySnapshot>>;
    fn has_snapshot_for_date(&self, portfolio_id: &str, date: NaiveDate) -> Result<bool>;
    fn delete_by_portfolio(&self, portfolio_id: &str) -> Result<()>;
}
