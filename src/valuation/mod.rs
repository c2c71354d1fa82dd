pub mod valuation_model;
pub mod valuation_service;

pub use valuation_model::{HoldingValuation, PortfolioValuation, SectorBucket};
pub use valuation_service::{aggregate_sectors, value_holding, value_portfolio};
