use crate::math::{estimated_apr, total_value_locked};
use crate::value_objects::{Address, Percentage};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique pool identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(pub Uuid);

impl PoolId {
    /// A fresh random ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A two-token liquidity pool.
///
/// Reserves are never negative; `tvl` and `apr` are recomputed from the
/// reserves on every reserve mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Unique identifier.
    pub id: PoolId,
    /// First token of the pair.
    pub token0_address: Address,
    /// Second token of the pair.
    pub token1_address: Address,
    /// Fee tier in percent (`0.3` is 0.3 %).
    pub fee: Decimal,
    /// `token0` held by the pool.
    pub token0_reserve: Decimal,
    /// `token1` held by the pool.
    pub token1_reserve: Decimal,
    /// Value of both reserves at current token prices.
    pub tvl: Decimal,
    /// Accumulated swap volume in quote units.
    pub volume_24h: Decimal,
    /// Estimated APR in percent, capped at 100.
    pub apr: Decimal,
    /// When set, only this wallet may change the reserves.
    pub creator_address: Option<Address>,
    /// On-chain pair contract; stored, never verified.
    pub pair_address: Option<Address>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Pool {
    /// An empty pool for the given pair and fee tier.
    pub fn new(token0: Address, token1: Address, fee: Decimal) -> Self {
        Self {
            id: PoolId::generate(),
            token0_address: token0,
            token1_address: token1,
            fee,
            token0_reserve: Decimal::ZERO,
            token1_reserve: Decimal::ZERO,
            tvl: Decimal::ZERO,
            volume_24h: Decimal::ZERO,
            apr: Decimal::ZERO,
            creator_address: None,
            pair_address: None,
            created_at: Utc::now(),
        }
    }

    /// Restricts reserve changes to `creator`.
    #[must_use]
    pub fn with_creator(mut self, creator: Option<Address>) -> Self {
        self.creator_address = creator;
        self
    }

    /// Records the on-chain pair contract.
    #[must_use]
    pub fn with_pair_address(mut self, pair: Option<Address>) -> Self {
        self.pair_address = pair;
        self
    }

    /// `fee` as a percentage.
    pub fn fee_tier(&self) -> Percentage {
        Percentage(self.fee)
    }

    /// Whether `wallet` may change this pool's reserves.
    pub fn accepts_liquidity_from(&self, wallet: &Address) -> bool {
        self.creator_address
            .as_ref()
            .is_none_or(|creator| creator == wallet)
    }

    /// Whether the pool trades exactly this unordered pair.
    pub fn matches_pair(&self, a: &Address, b: &Address) -> bool {
        (&self.token0_address == a && &self.token1_address == b)
            || (&self.token0_address == b && &self.token1_address == a)
    }

    /// Applies reserve deltas, clamping each reserve at zero, and reprices
    /// TVL and APR with the given token prices.
    ///
    /// Returns `None` if a value leaves the decimal range.
    pub fn with_reserve_delta(
        &self,
        delta0: Decimal,
        delta1: Decimal,
        price0: Decimal,
        price1: Decimal,
    ) -> Option<Self> {
        let reserve0 = self.token0_reserve.checked_add(delta0)?.max(Decimal::ZERO);
        let reserve1 = self.token1_reserve.checked_add(delta1)?.max(Decimal::ZERO);
        let tvl = total_value_locked(reserve0, price0, reserve1, price1)?;

        Some(Self {
            token0_reserve: reserve0,
            token1_reserve: reserve1,
            tvl,
            apr: estimated_apr(self.fee, tvl),
            ..self.clone()
        })
    }

    /// Adds swap volume (quote units) to the running counter.
    pub fn with_volume(&self, volume: Decimal) -> Option<Self> {
        Some(Self {
            volume_24h: self.volume_24h.checked_add(volume)?,
            ..self.clone()
        })
    }
}
