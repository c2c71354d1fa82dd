pub mod holdings_calculator;
pub mod holdings_errors;
pub mod holdings_model;
pub mod holdings_repository;
pub mod holdings_service;
pub mod holdings_traits;

pub use holdings_calculator::{aggregate_positions, weighted_average, HoldingAggregate};
pub use holdings_errors::HoldingError;
pub use holdings_model::{
    Holding, HoldingWithPositions, NewHolding, NewPosition, NewPositionEntry, Position,
};
pub use holdings_repository::HoldingRepository;
pub use holdings_service::HoldingService;
pub use holdings_traits::{HoldingRepositoryTrait, HoldingServiceTrait};
