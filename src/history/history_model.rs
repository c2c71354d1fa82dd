use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::DATE_FORMAT;
use crate::schema::portfolio_history;
use crate::utils::decimal_serde::*;
use crate::valuation::HoldingValuation;

use super::history_errors::{HistoryError, Result};

/// One persisted point-in-time valuation per (portfolio, calendar date).
///
/// The id is the natural key `{portfolio_id}_{YYYY-MM-DD}`, which is what
/// makes repeated saves for the same day an overwrite instead of a duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    pub id: String,
    pub portfolio_id: String,
    pub snapshot_date: NaiveDate,
    #[serde(with = "decimal_serde")]
    pub total_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_cost: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_pnl: Decimal,
    #[serde(with = "decimal_serde")]
    pub pnl_percentage: Decimal,
    /// The per-holding valuation the totals were derived from
    pub holdings: Vec<HoldingValuation>,
    pub created_at: NaiveDateTime,
}

/// Input model for recording a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHistorySnapshot {
    pub portfolio_id: String,
    pub snapshot_date: NaiveDate,
    #[serde(with = "decimal_serde")]
    pub total_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_cost: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_pnl: Decimal,
    #[serde(with = "decimal_serde")]
    pub pnl_percentage: Decimal,
    pub holdings: Vec<HoldingValuation>,
}

impl NewHistorySnapshot {
    pub fn validate(&self) -> Result<()> {
        if self.portfolio_id.trim().is_empty() {
            return Err(HistoryError::InvalidData(
                "Portfolio id cannot be empty".to_string(),
            ));
        }
        if self.total_value.is_zero() {
            return Err(HistoryError::InvalidData(
                "Nothing to record: total value is zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn natural_id(&self) -> String {
        format!(
            "{}_{}",
            self.portfolio_id,
            self.snapshot_date.format(DATE_FORMAT)
        )
    }
}

/// Database model for portfolio history rows
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = portfolio_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HistorySnapshotDb {
    pub id: String,
    pub portfolio_id: String,
    pub snapshot_date: String,
    pub total_value: String,
    pub total_cost: String,
    pub total_pnl: String,
    pub pnl_percentage: String,
    pub holdings_snapshot: String,
    pub created_at: NaiveDateTime,
}

impl From<HistorySnapshotDb> for HistorySnapshot {
    fn from(db: HistorySnapshotDb) -> Self {
        HistorySnapshot {
            id: db.id,
            portfolio_id: db.portfolio_id,
            snapshot_date: NaiveDate::parse_from_str(&db.snapshot_date, DATE_FORMAT)
                .unwrap_or_default(),
            total_value: Decimal::from_str(&db.total_value).unwrap_or_default(),
            total_cost: Decimal::from_str(&db.total_cost).unwrap_or_default(),
            total_pnl: Decimal::from_str(&db.total_pnl).unwrap_or_default(),
            pnl_percentage: Decimal::from_str(&db.pnl_percentage).unwrap_or_default(),
            holdings: serde_json::from_str(&db.holdings_snapshot).unwrap_or_default(),
            created_at: db.created_at,
        }
    }
}

impl From<HistorySnapshot> for HistorySnapshotDb {
    fn from(snapshot: HistorySnapshot) -> Self {
        HistorySnapshotDb {
            id: snapshot.id,
            portfolio_id: snapshot.portfolio_id,
            snapshot_date: snapshot.snapshot_date.format(DATE_FORMAT).to_string(),
            total_value: snapshot.total_value.to_string(),
            total_cost: snapshot.total_cost.to_string(),
            total_pnl: snapshot.total_pnl.to_string(),
            pnl_percentage: snapshot.pnl_percentage.to_string(),
            holdings_snapshot: serde_json::to_string(&snapshot.holdings)
                .unwrap_or_else(|_| "[]".to_string()),
            created_at: snapshot.created_at,
        }
    }
}
