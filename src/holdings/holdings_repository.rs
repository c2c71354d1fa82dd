use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use crate::constants::DATE_FORMAT;
use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::schema::{holdings, positions};

use super::holdings_calculator::{self, HoldingAggregate};
use super::holdings_errors::HoldingError;
use super::holdings_model::{
    Holding, HoldingDb, NewHolding, NewPosition, Position, PositionDb,
};
use super::holdings_traits::HoldingRepositoryTrait;

/// Repository for managing holdings and their position ledger in the database
pub struct HoldingRepository {
    pool: Arc<DbPool>,
}

impl HoldingRepository {
    /// Creates a new HoldingRepository instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn load_positions(
        conn: &mut SqliteConnection,
        input_holding_id: &str,
    ) -> std::result::Result<Vec<Position>, HoldingError> {
        let rows = positions::table
            .filter(positions::holding_id.eq(input_holding_id))
            .order(positions::created_at.asc())
            .load::<PositionDb>(conn)?;
        Ok(rows.into_iter().map(Position::from).collect())
    }

    fn write_aggregate(
        conn: &mut SqliteConnection,
        input_holding_id: &str,
        aggregate: &HoldingAggregate,
    ) -> std::result::Result<(), HoldingError> {
        diesel::update(holdings::table.find(input_holding_id))
            .set((
                holdings::shares.eq(aggregate.total_shares.to_string()),
                holdings::avg_buy_price.eq(aggregate.avg_buy_price.to_string()),
                holdings::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;
        Ok(())
    }
}

impl HoldingRepositoryTrait for HoldingRepository {
    fn get_holdings_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;

        let results = holdings::table
            .filter(holdings::portfolio_id.eq(portfolio_id))
            .order(holdings::ticker.asc())
            .load::<HoldingDb>(&mut conn)?;

        Ok(results.into_iter().map(Holding::from).collect())
    }

    fn get_holding(&self, holding_id: &str) -> Result<Holding> {
        let mut conn = get_connection(&self.pool)?;

        let result = holdings::table
            .find(holding_id)
            .first::<HoldingDb>(&mut conn)
            .optional()?
            .ok_or_else(|| {
                HoldingError::NotFound(format!("Holding '{}' not found", holding_id))
            })?;

        Ok(result.into())
    }

    fn get_positions(&self, holding_id: &str) -> Result<Vec<Position>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(Self::load_positions(&mut conn, holding_id)?)
    }

    /// Persists the holding and all of its initial positions atomically,
    /// with the aggregate computed in the same transaction.
    fn create_holding_with_positions(&self, new_holding: &NewHolding) -> Result<Holding> {
        let mut conn = get_connection(&self.pool)?;
        let now = Utc::now().naive_utc();

        let aggregate = holdings_calculator::weighted_average(
            new_holding
                .positions
                .iter()
                .map(|entry| (entry.shares, entry.buy_price)),
        );

        let holding_db = HoldingDb {
            id: Uuid::new_v4().to_string(),
            portfolio_id: new_holding.portfolio_id.clone(),
            ticker: new_holding.ticker.clone(),
            stock_name: new_holding.stock_name.clone(),
            shares: aggregate.total_shares.to_string(),
            avg_buy_price: aggregate.avg_buy_price.to_string(),
            created_at: now,
            updated_at: now,
        };

        let position_dbs: Vec<PositionDb> = new_holding
            .positions
            .iter()
            .map(|entry| PositionDb {
                id: Uuid::new_v4().to_string(),
                holding_id: holding_db.id.clone(),
                shares: entry.shares.to_string(),
                buy_price: entry.buy_price.to_string(),
                buy_date: entry.buy_date.map(|d| d.format(DATE_FORMAT).to_string()),
                notes: entry.notes.clone(),
                created_at: now,
            })
            .collect();

        let created = conn.transaction::<HoldingDb, HoldingError, _>(|conn| {
            diesel::insert_into(holdings::table)
                .values(&holding_db)
                .execute(conn)
                .map_err(|e| match e {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        HoldingError::InvalidData(format!(
                            "A holding for '{}' already exists in this portfolio",
                            new_holding.ticker
                        ))
                    }
                    other => other.into(),
                })?;
            diesel::insert_into(positions::table)
                .values(&position_dbs)
                .execute(conn)?;
            Ok(holding_db)
        })?;

        debug!(
            "Created holding {} with {} initial positions",
            created.id,
            position_dbs.len()
        );
        Ok(created.into())
    }

    /// Inserts the position and recomputes the parent holding's aggregate in
    /// one transaction; ledger state and holding aggregate never diverge.
    fn add_position(&self, new_position: &NewPosition) -> Result<Position> {
        let mut conn = get_connection(&self.pool)?;
        let now = Utc::now().naive_utc();

        let position_db = PositionDb {
            id: Uuid::new_v4().to_string(),
            holding_id: new_position.holding_id.clone(),
            shares: new_position.shares.to_string(),
            buy_price: new_position.buy_price.to_string(),
            buy_date: new_position
                .buy_date
                .map(|d| d.format(DATE_FORMAT).to_string()),
            notes: new_position.notes.clone(),
            created_at: now,
        };

        let created = conn.transaction::<Position, HoldingError, _>(|conn| {
            let holding_exists = holdings::table
                .find(&new_position.holding_id)
                .first::<HoldingDb>(conn)
                .optional()?
                .is_some();
            if !holding_exists {
                return Err(HoldingError::NotFound(format!(
                    "Holding '{}' not found",
                    new_position.holding_id
                )));
            }

            diesel::insert_into(positions::table)
                .values(&position_db)
                .execute(conn)?;

            let ledger = Self::load_positions(conn, &new_position.holding_id)?;
            let aggregate = holdings_calculator::aggregate_positions(&ledger);
            Self::write_aggregate(conn, &new_position.holding_id, &aggregate)?;

            Ok(position_db.into())
        })?;

        Ok(created)
    }

    /// Deletes the position and recomputes the parent holding; the holding
    /// itself is deleted when its last position goes away.
    fn delete_position(&self, position_id: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        conn.transaction::<(), HoldingError, _>(|conn| {
            let position_db = positions::table
                .find(position_id)
                .first::<PositionDb>(conn)
                .optional()?
                .ok_or_else(|| {
                    HoldingError::NotFound(format!("Position '{}' not found", position_id))
                })?;

            diesel::delete(positions::table.find(position_id)).execute(conn)?;

            let remaining = Self::load_positions(conn, &position_db.holding_id)?;
            if remaining.is_empty() {
                debug!(
                    "Holding {} has no remaining positions, deleting it",
                    position_db.holding_id
                );
                diesel::delete(holdings::table.find(&position_db.holding_id)).execute(conn)?;
            } else {
                let aggregate = holdings_calculator::aggregate_positions(&remaining);
                Self::write_aggregate(conn, &position_db.holding_id, &aggregate)?;
            }

            Ok(())
        })?;

        Ok(())
    }

    /// Deletes the holding and cascades deletion of all its positions.
    fn delete_holding(&self, holding_id: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        conn.transaction::<(), HoldingError, _>(|conn| {
            diesel::delete(positions::table.filter(positions::holding_id.eq(holding_id)))
                .execute(conn)?;

            let deleted =
                diesel::delete(holdings::table.find(holding_id)).execute(conn)?;
            if deleted == 0 {
                return Err(HoldingError::NotFound(format!(
                    "Holding '{}' not found",
                    holding_id
                )));
            }

            Ok(())
        })?;

        Ok(())
    }
}
