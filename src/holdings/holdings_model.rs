use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::DATE_FORMAT;
use crate::schema::{holdings, positions};
use crate::utils::decimal_serde::*;

use super::holdings_errors::{HoldingError, Result};

/// One ticker's aggregate position within a portfolio.
///
/// `shares` and `avg_buy_price` are a materialized view over the holding's
/// positions; they are recomputed transactionally on every ledger mutation
/// and never written ad hoc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub portfolio_id: String,
    pub ticker: String,
    pub stock_name: String,
    #[serde(with = "decimal_serde")]
    pub shares: Decimal,
    #[serde(with = "decimal_serde")]
    pub avg_buy_price: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// One discrete purchase lot contributing to a holding. Immutable once
/// created except by deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub holding_id: String,
    #[serde(with = "decimal_serde")]
    pub shares: Decimal,
    #[serde(with = "decimal_serde")]
    pub buy_price: Decimal,
    pub buy_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Input model for recording a buy transaction against an existing holding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPosition {
    pub holding_id: String,
    #[serde(with = "decimal_serde")]
    pub shares: Decimal,
    #[serde(with = "decimal_serde")]
    pub buy_price: Decimal,
    pub buy_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewPosition {
    pub fn validate(&self) -> Result<()> {
        if self.holding_id.trim().is_empty() {
            return Err(HoldingError::InvalidData(
                "Holding id cannot be empty".to_string(),
            ));
        }
        validate_lot(&self.shares, &self.buy_price)
    }
}

/// One entry of the initial lot batch when creating a holding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPositionEntry {
    #[serde(with = "decimal_serde")]
    pub shares: Decimal,
    #[serde(with = "decimal_serde")]
    pub buy_price: Decimal,
    pub buy_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewPositionEntry {
    pub fn validate(&self) -> Result<()> {
        validate_lot(&self.shares, &self.buy_price)
    }
}

fn validate_lot(shares: &Decimal, buy_price: &Decimal) -> Result<()> {
    if *shares <= Decimal::ZERO {
        return Err(HoldingError::InvalidData(
            "Position shares must be greater than zero".to_string(),
        ));
    }
    if *buy_price <= Decimal::ZERO {
        return Err(HoldingError::InvalidData(
            "Position buy price must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Input model for creating a holding together with its initial positions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub portfolio_id: String,
    pub ticker: String,
    pub stock_name: String,
    pub positions: Vec<NewPositionEntry>,
}

impl NewHolding {
    pub fn validate(&self) -> Result<()> {
        if self.portfolio_id.trim().is_empty() {
            return Err(HoldingError::InvalidData(
                "Portfolio id cannot be empty".to_string(),
            ));
        }
        if self.ticker.trim().is_empty() {
            return Err(HoldingError::InvalidData(
                "Ticker cannot be empty".to_string(),
            ));
        }
        if self.positions.is_empty() {
            return Err(HoldingError::InvalidData(
                "A holding needs at least one position".to_string(),
            ));
        }
        for entry in &self.positions {
            entry.validate()?;
        }
        Ok(())
    }
}

/// A holding together with its full position ledger, for the detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingWithPositions {
    pub holding: Holding,
    pub positions: Vec<Position>,
}

/// Database model for holdings
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingDb {
    pub id: String,
    pub portfolio_id: String,
    pub ticker: String,
    pub stock_name: String,
    pub shares: String,
    pub avg_buy_price: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<HoldingDb> for Holding {
    fn from(db: HoldingDb) -> Self {
        Holding {
            id: db.id,
            portfolio_id: db.portfolio_id,
            ticker: db.ticker,
            stock_name: db.stock_name,
            shares: Decimal::from_str(&db.shares).unwrap_or_default(),
            avg_buy_price: Decimal::from_str(&db.avg_buy_price).unwrap_or_default(),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Holding> for HoldingDb {
    fn from(holding: Holding) -> Self {
        HoldingDb {
            id: holding.id,
            portfolio_id: holding.portfolio_id,
            ticker: holding.ticker,
            stock_name: holding.stock_name,
            shares: holding.shares.to_string(),
            avg_buy_price: holding.avg_buy_price.to_string(),
            created_at: holding.created_at,
            updated_at: holding.updated_at,
        }
    }
}

/// Database model for positions
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, Associations, Debug, Clone,
)]
#[diesel(table_name = positions)]
#[diesel(belongs_to(HoldingDb, foreign_key = holding_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PositionDb {
    pub id: String,
    pub holding_id: String,
    pub shares: String,
    pub buy_price: String,
    pub buy_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<PositionDb> for Position {
    fn from(db: PositionDb) -> Self {
        Position {
            id: db.id,
            holding_id: db.holding_id,
            shares: Decimal::from_str(&db.shares).unwrap_or_default(),
            buy_price: Decimal::from_str(&db.buy_price).unwrap_or_default(),
            buy_date: db
                .buy_date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok()),
            notes: db.notes,
            created_at: db.created_at,
        }
    }
}

impl From<Position> for PositionDb {
    fn from(position: Position) -> Self {
        PositionDb {
            id: position.id,
            holding_id: position.holding_id,
            shares: position.shares.to_string(),
            buy_price: position.buy_price.to_string(),
            buy_date: position.buy_date.map(|d| d.format(DATE_FORMAT).to_string()),
            notes: position.notes,
            created_at: position.created_at,
        }
    }
}
