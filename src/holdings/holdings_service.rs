use log::debug;
use std::sync::Arc;

use crate::errors::Result;

use super::holdings_model::{
    Holding, HoldingWithPositions, NewHolding, NewPosition, Position,
};
use super::holdings_traits::{HoldingRepositoryTrait, HoldingServiceTrait};

/// Service implementing the position ledger and holding aggregator contract.
///
/// The position ledger is the source of truth; the holding's `shares` and
/// `avg_buy_price` are recomputed by the repository inside the same
/// transaction as every ledger mutation.
pub struct HoldingService {
    repository: Arc<dyn HoldingRepositoryTrait>,
}

impl HoldingService {
    /// Creates a new HoldingService instance
    pub fn new(repository: Arc<dyn HoldingRepositoryTrait>) -> Self {
        Self { repository }
    }
}

impl HoldingServiceTrait for HoldingService {
    fn get_holdings(&self, portfolio_id: &str) -> Result<Vec<Holding>> {
        self.repository.get_holdings_by_portfolio(portfolio_id)
    }

    fn get_holding_with_positions(&self, holding_id: &str) -> Result<HoldingWithPositions> {
        let holding = self.repository.get_holding(holding_id)?;
        let positions = self.repository.get_positions(holding_id)?;
        Ok(HoldingWithPositions { holding, positions })
    }

    /// Creates a holding together with its initial batch of positions.
    fn create_holding(&self, mut new_holding: NewHolding) -> Result<Holding> {
        new_holding.ticker = new_holding.ticker.trim().to_uppercase();
        new_holding.validate()?;

        debug!(
            "Creating holding {} with {} positions",
            new_holding.ticker,
            new_holding.positions.len()
        );
        self.repository.create_holding_with_positions(&new_holding)
    }

    /// Records a buy transaction against an existing holding.
    fn add_position(&self, new_position: NewPosition) -> Result<Position> {
        new_position.validate()?;
        self.repository.add_position(&new_position)
    }

    fn delete_position(&self, position_id: &str) -> Result<()> {
        self.repository.delete_position(position_id)
    }

    fn remove_holding(&self, holding_id: &str) -> Result<()> {
        self.repository.delete_holding(holding_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holdings::holdings_errors::HoldingError;
    use crate::holdings::holdings_model::NewPositionEntry;
    use crate::Error;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRepository {
        created: Mutex<Vec<NewHolding>>,
        added: Mutex<Vec<NewPosition>>,
    }

    impl HoldingRepositoryTrait for RecordingRepository {
        fn get_holdings_by_portfolio(&self, _portfolio_id: &str) -> Result<Vec<Holding>> {
            Ok(Vec::new())
        }
        fn get_holding(&self, holding_id: &str) -> Result<Holding> {
            Err(HoldingError::NotFound(format!("Holding '{}' not found", holding_id)).into())
        }
        fn get_positions(&self, _holding_id: &str) -> Result<Vec<Position>> {
            Ok(Vec::new())
        }
        fn create_holding_with_positions(&self, new_holding: &NewHolding) -> Result<Holding> {
            self.created.lock().unwrap().push(new_holding.clone());
            Err(HoldingError::NotFound("not under test".to_string()).into())
        }
        fn add_position(&self, new_position: &NewPosition) -> Result<Position> {
            self.added.lock().unwrap().push(new_position.clone());
            Err(HoldingError::NotFound("not under test".to_string()).into())
        }
        fn delete_position(&self, _position_id: &str) -> Result<()> {
            Ok(())
        }
        fn delete_holding(&self, _holding_id: &str) -> Result<()> {
            Ok(())
        }
    }

    fn entry(shares: Decimal, price: Decimal) -> NewPositionEntry {
        NewPositionEntry {
            shares,
            buy_price: price,
            buy_date: None,
            notes: None,
        }
    }

    #[test]
    fn test_add_position_rejects_non_positive_shares() {
        let repository = Arc::new(RecordingRepository::default());
        let service = HoldingService::new(repository.clone());

        let result = service.add_position(NewPosition {
            holding_id: "h1".to_string(),
            shares: dec!(0),
            buy_price: dec!(100),
            buy_date: None,
            notes: None,
        });

        assert!(matches!(
            result,
            Err(Error::Holding(HoldingError::InvalidData(_)))
        ));
        // Validation failures make no mutation at all
        assert!(repository.added.lock().unwrap().is_empty());
    }

    #[test]
    fn test_add_position_rejects_non_positive_price() {
        let repository = Arc::new(RecordingRepository::default());
        let service = HoldingService::new(repository);

        let result = service.add_position(NewPosition {
            holding_id: "h1".to_string(),
            shares: dec!(10),
            buy_price: dec!(-1),
            buy_date: None,
            notes: None,
        });

        assert!(matches!(
            result,
            Err(Error::Holding(HoldingError::InvalidData(_)))
        ));
    }

    #[test]
    fn test_create_holding_rejects_empty_position_batch() {
        let repository = Arc::new(RecordingRepository::default());
        let service = HoldingService::new(repository.clone());

        let result = service.create_holding(NewHolding {
            portfolio_id: "p1".to_string(),
            ticker: "HBL".to_string(),
            stock_name: "Habib Bank".to_string(),
            positions: Vec::new(),
        });

        assert!(matches!(
            result,
            Err(Error::Holding(HoldingError::InvalidData(_)))
        ));
        assert!(repository.created.lock().unwrap().is_empty());
    }

    #[test]
    fn test_create_holding_rejects_batch_with_invalid_entry() {
        let repository = Arc::new(RecordingRepository::default());
        let service = HoldingService::new(repository.clone());

        let result = service.create_holding(NewHolding {
            portfolio_id: "p1".to_string(),
            ticker: "HBL".to_string(),
            stock_name: "Habib Bank".to_string(),
            positions: vec![entry(dec!(100), dec!(150)), entry(dec!(50), dec!(0))],
        });

        assert!(matches!(
            result,
            Err(Error::Holding(HoldingError::InvalidData(_)))
        ));
        assert!(repository.created.lock().unwrap().is_empty());
    }

    #[test]
    fn test_create_holding_uppercases_ticker() {
        let repository = Arc::new(RecordingRepository::default());
        let service = HoldingService::new(repository.clone());

        let _ = service.create_holding(NewHolding {
            portfolio_id: "p1".to_string(),
            ticker: " luck ".to_string(),
            stock_name: "Lucky Cement".to_string(),
            positions: vec![entry(dec!(40), dec!(400))],
        });

        let created = repository.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].ticker, "LUCK");
    }
}
