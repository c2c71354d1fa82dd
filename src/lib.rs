pub mod constants;
pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

pub mod history;
pub mod holdings;
pub mod market_data;
pub mod portfolios;
pub mod valuation;

pub use errors::{Error, Result};
