use chrono::{NaiveDate, Utc};
use log::debug;
use std::sync::Arc;

use crate::constants::DEFAULT_HISTORY_LIMIT;
use crate::errors::Result;

use super::history_model::{HistorySnapshot, NewHistorySnapshot};
use super::history_traits::{HistoryRepositoryTrait, HistoryServiceTrait};

/// Service for recording and reading dated portfolio value snapshots
pub struct HistoryService {
    repository: Arc<dyn HistoryRepositoryTrait>,
}

impl HistoryService {
    /// Creates a new HistoryService instance
    pub fn new(repository: Arc<dyn HistoryRepositoryTrait>) -> Self {
        Self { repository }
    }
}

impl HistoryServiceTrait for HistoryService {
    /// Saves a snapshot, overwriting any existing row for the same
    /// (portfolio, date). Safe to call repeatedly on the same day, both
    /// interactively and from the scheduled job.
    fn save_snapshot(&self, new_snapshot: NewHistorySnapshot) -> Result<HistorySnapshot> {
        new_snapshot.validate()?;

        let snapshot = HistorySnapshot {
            id: new_snapshot.natural_id(),
            portfolio_id: new_snapshot.portfolio_id,
            snapshot_date: new_snapshot.snapshot_date,
            total_value: new_snapshot.total_value,
            total_cost: new_snapshot.total_cost,
            total_pnl: new_snapshot.total_pnl,
            pnl_percentage: new_snapshot.pnl_percentage,
            holdings: new_snapshot.holdings,
            created_at: Utc::now().naive_utc(),
        };

        self.repository.upsert(&snapshot)?;
        debug!("Saved snapshot {}", snapshot.id);
        Ok(snapshot)
    }

    fn get_history(&self, portfolio_id: &str, limit: Option<i64>) -> Result<Vec<HistorySnapshot>> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        self.repository.get_history(portfolio_id, limit)
    }

    fn has_snapshot_for_date(&self, portfolio_id: &str, date: NaiveDate) -> Result<bool> {
        self.repository.has_snapshot_for_date(portfolio_id, date)
    }
}
