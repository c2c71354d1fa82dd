use crate::errors::Result;

use super::holdings_model::{
    Holding, HoldingWithPositions, NewHolding, NewPosition, Position,
};

/// Trait defining the contract for Holding service operations.
pub trait HoldingServiceTrait: Send + Sync {
    fn get_holdings(&self, portfolio_id: &str) -> Result<Vec<Holding>>;
    fn get_holding_with_positions(&self, holding_id: &str) -> Result<HoldingWithPositions>;
    fn create_holding(&self, new_holding: NewHolding) -> Result<Holding>;
    fn add_position(&self, new_position: NewPosition) -> Result<Position>;
    fn delete_position(&self, position_id: &str) -> Result<()>;
    fn remove_holding(&self, holding_id: &str) -> Result<()>;
}

/// Trait defining the contract for Holding repository operations.
pub trait HoldingRepositoryTrait: Send + Sync {
    fn get_holdings_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Holding>>;
    fn get_holding(&self, holding_id: &str) -> Result<Holding>;
    fn get_positions(&self, holding_id: &str) -> Result<Vec<Position>>;
    fn create_holding_with_positions(&self, new_holding: &NewHolding) -> Result<Holding>;
    fn add_position(&self, new_position: &NewPosition) -> Result<Position>;
    fn delete_position(&self, position_id: &str) -> Result<()>;
    fn delete_holding(&self, holding_id: &str) -> Result<()>;
}
