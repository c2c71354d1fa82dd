use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::portfolios;
use crate::valuation::{PortfolioValuation, SectorBucket};

use super::portfolios_errors::{PortfolioError, Result};

/// A named container of holdings owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    pub user_id: String,
    pub name: String,
}

impl NewPortfolio {
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(PortfolioError::InvalidData(
                "User id cannot be empty".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(PortfolioError::InvalidData(
                "Portfolio name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything the dashboard needs to render one portfolio: valuation with
/// per-holding breakdown and the sector allocation derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioView {
    pub valuation: PortfolioValuation,
    pub sectors: Vec<SectorBucket>,
}

/// Outcome of one run of the daily snapshot job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotJobSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Database model for portfolios
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioDb {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<PortfolioDb> for Portfolio {
    fn from(db: PortfolioDb) -> Self {
        Portfolio {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Portfolio> for PortfolioDb {
    fn from(portfolio: Portfolio) -> Self {
        PortfolioDb {
            id: portfolio.id,
            user_id: portfolio.user_id,
            name: portfolio.name,
            created_at: portfolio.created_at,
            updated_at: portfolio.updated_at,
        }
    }
}
