use rust_decimal::Decimal;

use super::holdings_model::Position;

/// Aggregate derived from a holding's full position set.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingAggregate {
    pub total_shares: Decimal,
    pub avg_buy_price: Decimal,
}

impl HoldingAggregate {
    pub fn is_empty(&self) -> bool {
        self.total_shares.is_zero()
    }
}

/// Computes total shares and the share-quantity-weighted average buy price
/// over a set of (shares, buy_price) lots, at full precision.
///
/// The average is zero when total shares are zero; callers must not persist
/// a holding in that state.
pub fn weighted_average<I>(lots: I) -> HoldingAggregate
where
    I: IntoIterator<Item = (Decimal, Decimal)>,
{
    let mut total_shares = Decimal::ZERO;
    let mut total_cost = Decimal::ZERO;

    for (shares, buy_price) in lots {
        total_shares += shares;
        total_cost += shares * buy_price;
    }

    let avg_buy_price = if total_shares.is_zero() {
        Decimal::ZERO
    } else {
        total_cost / total_shares
    };

    HoldingAggregate {
        total_shares,
        avg_buy_price,
    }
}

/// Recomputes the aggregate for a holding from its stored positions.
pub fn aggregate_positions(positions: &[Position]) -> HoldingAggregate {
    weighted_average(positions.iter().map(|p| (p.shares, p.buy_price)))
}
