use chrono::NaiveDate;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use crate::constants::DATE_FORMAT;
use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::schema::portfolio_history;

use super::history_model::{HistorySnapshot, HistorySnapshotDb};
use super::history_traits::HistoryRepositoryTrait;

/// Repository for portfolio history rows.
///
/// The snapshot id is the natural key `{portfolio_id}_{date}` and the table
/// carries `UNIQUE(portfolio_id, snapshot_date)`, so `replace_into` gives
/// insert-or-overwrite semantics without a read-then-write race.
pub struct HistoryRepository {
    pool: Arc<DbPool>,
}

impl HistoryRepository {
    /// Creates a new HistoryRepository instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl HistoryRepositoryTrait for HistoryRepository {
    fn upsert(&self, snapshot: &HistorySnapshot) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        let db_model: HistorySnapshotDb = snapshot.clone().into();
        debug!(
            "Upserting history snapshot {} for portfolio {}",
            db_model.id, db_model.portfolio_id
        );

        diesel::replace_into(portfolio_history::table)
            .values(&db_model)
            .execute(&mut conn)?;

        Ok(())
    }

    fn get_history(&self, portfolio_id: &str, limit: i64) -> Result<Vec<HistorySnapshot>> {
        let mut conn = get_connection(&self.pool)?;

        // Most recent N by date, then flipped so charts read oldest first
        let mut rows = portfolio_history::table
            .filter(portfolio_history::portfolio_id.eq(portfolio_id))
            .order(portfolio_history::snapshot_date.desc())
            .limit(limit)
            .load::<HistorySnapshotDb>(&mut conn)?;
        rows.reverse();

        Ok(rows.into_iter().map(HistorySnapshot::from).collect())
    }

    fn has_snapshot_for_date(&self, portfolio_id: &str, date: NaiveDate) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;

        let found = portfolio_history::table
            .filter(portfolio_history::portfolio_id.eq(portfolio_id))
            .filter(portfolio_history::snapshot_date.eq(date.format(DATE_FORMAT).to_string()))
            .select(portfolio_history::id)
            .first::<String>(&mut conn)
            .optional()?;

        Ok(found.is_some())
    }

    fn delete_by_portfolio(&self, portfolio_id: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        diesel::delete(
            portfolio_history::table.filter(portfolio_history::portfolio_id.eq(portfolio_id)),
        )
        .execute(&mut conn)?;

        Ok(())
    }
}
