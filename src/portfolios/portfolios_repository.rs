use chrono::Utc;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{get_connection, DbPool, DbTransactionExecutor};
use crate::errors::Result;
use crate::schema::{holdings, portfolio_history, portfolios, positions};

use super::portfolios_errors::PortfolioError;
use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioDb};
use super::portfolios_traits::PortfolioRepositoryTrait;

/// Repository for managing portfolio rows in the database
pub struct PortfolioRepository {
    pool: Arc<DbPool>,
}

impl PortfolioRepository {
    /// Creates a new PortfolioRepository instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl PortfolioRepositoryTrait for PortfolioRepository {
    fn create(&self, new_portfolio: &NewPortfolio) -> Result<Portfolio> {
        let mut conn = get_connection(&self.pool)?;
        let now = Utc::now().naive_utc();

        let portfolio_db = PortfolioDb {
            id: Uuid::new_v4().to_string(),
            user_id: new_portfolio.user_id.clone(),
            name: new_portfolio.name.clone(),
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(portfolios::table)
            .values(&portfolio_db)
            .execute(&mut conn)?;

        Ok(portfolio_db.into())
    }

    fn get(&self, portfolio_id: &str) -> Result<Portfolio> {
        let mut conn = get_connection(&self.pool)?;

        let result = portfolios::table
            .find(portfolio_id)
            .first::<PortfolioDb>(&mut conn)
            .optional()?
            .ok_or_else(|| {
                PortfolioError::NotFound(format!("Portfolio '{}' not found", portfolio_id))
            })?;

        Ok(result.into())
    }

    fn get_by_user(&self, user_id: &str) -> Result<Option<Portfolio>> {
        let mut conn = get_connection(&self.pool)?;

        let result = portfolios::table
            .filter(portfolios::user_id.eq(user_id))
            .order(portfolios::created_at.asc())
            .first::<PortfolioDb>(&mut conn)
            .optional()?;

        Ok(result.map(Portfolio::from))
    }

    fn rename(&self, portfolio_id: &str, name: &str) -> Result<Portfolio> {
        let mut conn = get_connection(&self.pool)?;

        let result = diesel::update(portfolios::table.find(portfolio_id))
            .set((
                portfolios::name.eq(name),
                portfolios::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<PortfolioDb>(&mut conn)
            .optional()?
            .ok_or_else(|| {
                PortfolioError::NotFound(format!("Portfolio '{}' not found", portfolio_id))
            })?;

        Ok(result.into())
    }

    fn list(&self) -> Result<Vec<Portfolio>> {
        let mut conn = get_connection(&self.pool)?;

        let results = portfolios::table
            .order(portfolios::created_at.asc())
            .load::<PortfolioDb>(&mut conn)?;

        Ok(results.into_iter().map(Portfolio::from).collect())
    }

    fn delete(&self, portfolio_id: &str) -> Result<()> {
        let portfolio_id = portfolio_id.to_string();

        self.pool.execute(move |conn| {
            let holding_ids: Vec<String> = holdings::table
                .filter(holdings::portfolio_id.eq(&portfolio_id))
                .select(holdings::id)
                .load::<String>(conn)?;

            diesel::delete(positions::table.filter(positions::holding_id.eq_any(&holding_ids)))
                .execute(conn)?;
            diesel::delete(holdings::table.filter(holdings::portfolio_id.eq(&portfolio_id)))
                .execute(conn)?;
            diesel::delete(
                portfolio_history::table
                    .filter(portfolio_history::portfolio_id.eq(&portfolio_id)),
            )
            .execute(conn)?;

            let deleted = diesel::delete(portfolios::table.find(&portfolio_id)).execute(conn)?;
            if deleted == 0 {
                return Err(PortfolioError::NotFound(format!(
                    "Portfolio '{}' not found",
                    portfolio_id
                )));
            }

            debug!("Deleted portfolio {} and its dependents", portfolio_id);
            Ok(())
        })
    }
}
