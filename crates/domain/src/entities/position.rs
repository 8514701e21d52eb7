use crate::entities::pool::PoolId;
use crate::math::liquidity_share;
use crate::value_objects::{Address, Percentage, PriceRange};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique position identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionId(pub Uuid);

impl PositionId {
    /// A fresh random ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A wallet's deposit in one pool. At most one exists per (wallet, pool).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Unique identifier.
    pub id: PositionId,
    /// Pool the deposit sits in.
    pub pool_id: PoolId,
    /// Owning wallet.
    pub wallet_address: Address,
    /// `token0` currently deposited.
    pub token0_amount: Decimal,
    /// `token1` currently deposited.
    pub token1_amount: Decimal,
    /// `sqrt(token0_amount * token1_amount)`.
    pub liquidity: Decimal,
    /// Price band chosen at the first deposit.
    pub range: PriceRange,
    /// Not accrued yet; always zero.
    pub unclaimed_fees: Decimal,
    /// Cleared when the position is emptied.
    pub in_range: bool,
    /// Time of the first deposit.
    pub created_at: DateTime<Utc>,
    /// Time of the last deposit or withdrawal.
    pub updated_at: DateTime<Utc>,
}

/// Amounts taken out of a position by a withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Withdrawal {
    /// `token0` withdrawn.
    pub amount0: Decimal,
    /// `token1` withdrawn.
    pub amount1: Decimal,
    /// Whether the withdrawal emptied the position.
    pub closes_position: bool,
}

impl Position {
    /// Opens a position with a first deposit.
    pub fn open(
        pool_id: PoolId,
        wallet: Address,
        amount0: Decimal,
        amount1: Decimal,
        range: PriceRange,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PositionId::generate(),
            pool_id,
            wallet_address: wallet,
            token0_amount: amount0,
            token1_amount: amount1,
            liquidity: liquidity_share(amount0, amount1),
            range,
            unclaimed_fees: Decimal::ZERO,
            in_range: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges another deposit into the position; the new range replaces the
    /// old one.
    pub fn deposit(&self, amount0: Decimal, amount1: Decimal, range: PriceRange) -> Option<Self> {
        let token0_amount = self.token0_amount.checked_add(amount0)?;
        let token1_amount = self.token1_amount.checked_add(amount1)?;
        Some(Self {
            token0_amount,
            token1_amount,
            liquidity: liquidity_share(token0_amount, token1_amount),
            range,
            updated_at: Utc::now(),
            ..self.clone()
        })
    }

    /// Computes what withdrawing `percent` of the position removes.
    pub fn withdrawal(&self, percent: Percentage) -> Option<Withdrawal> {
        Some(Withdrawal {
            amount0: percent.of(self.token0_amount)?,
            amount1: percent.of(self.token1_amount)?,
            closes_position: percent.is_full(),
        })
    }

    /// The position after a partial withdrawal.
    pub fn after_withdrawal(&self, withdrawal: &Withdrawal) -> Self {
        let token0_amount = self.token0_amount - withdrawal.amount0;
        let token1_amount = self.token1_amount - withdrawal.amount1;
        Self {
            token0_amount,
            token1_amount,
            liquidity: liquidity_share(token0_amount, token1_amount),
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    /// Representation returned after the position was fully withdrawn and
    /// deleted: same id, zero amounts, out of range.
    pub fn closed(&self) -> Self {
        Self {
            token0_amount: Decimal::ZERO,
            token1_amount: Decimal::ZERO,
            liquidity: Decimal::ZERO,
            range: PriceRange::new(Default::default(), Some(Default::default())),
            unclaimed_fees: Decimal::ZERO,
            in_range: false,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    /// Whether nothing is left in the position.
    pub fn is_closed(&self) -> bool {
        self.liquidity.is_zero() && self.token0_amount.is_zero() && self.token1_amount.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn open(a0: Decimal, a1: Decimal) -> Position {
        Position::open(
            PoolId::generate(),
            Address::parse("0xwallet").unwrap(),
            a0,
            a1,
            PriceRange::unbounded(),
        )
    }

    #[test]
    fn test_open_computes_liquidity() {
        let position = open(dec!(4), dec!(9));
        assert!((position.liquidity - dec!(6)).abs() < dec!(0.0000001));
        assert!(position.in_range);
        assert_eq!(position.unclaimed_fees, Decimal::ZERO);
    }

    #[test]
    fn test_deposit_merges_amounts() {
        let position = open(dec!(4), dec!(9))
            .deposit(dec!(12), dec!(16), PriceRange::unbounded())
            .unwrap();
        assert_eq!(position.token0_amount, dec!(16));
        assert_eq!(position.token1_amount, dec!(25));
        assert!((position.liquidity - dec!(20)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_partial_withdrawal() {
        let position = open(dec!(100), dec!(100));
        let withdrawal = position.withdrawal(Percentage(dec!(25))).unwrap();
        assert_eq!(withdrawal.amount0, dec!(25));
        assert!(!withdrawal.closes_position);

        let rest = position.after_withdrawal(&withdrawal);
        assert_eq!(rest.token0_amount, dec!(75));
        assert!((rest.liquidity - dec!(75)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_full_withdrawal_closes() {
        let position = open(dec!(100), dec!(245));
        let withdrawal = position.withdrawal(Percentage::HUNDRED).unwrap();
        assert!(withdrawal.closes_position);
        assert_eq!(withdrawal.amount1, dec!(245));

        let closed = position.closed();
        assert_eq!(closed.id, position.id);
        assert!(closed.is_closed());
        assert!(!closed.in_range);
    }
}
