//! Per-key async mutexes.
//!
//! Every mutation of a pool runs while holding that pool's key, so two
//! concurrent updates of the same pool never interleave their
//! read-compute-write steps. Acquisition order is always
//! swap hash, then pair or pool, then stats.

use pioswap_domain::entities::PoolId;
use pioswap_domain::value_objects::Address;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Unused entries are pruned once the table grows past this size.
const PRUNE_THRESHOLD: usize = 1024;

/// What a lock protects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LockKey {
    /// Reserves, volume and positions of one pool.
    Pool(PoolId),
    /// Creation of a pool for an unordered pair and fee tier.
    Pair {
        low: Address,
        high: Address,
        fee: Decimal,
    },
    /// Execution of a swap carrying this external hash.
    Swap(String),
    /// The protocol stats singleton.
    Stats,
}

impl LockKey {
    /// Key for a pair; argument order does not matter.
    #[must_use]
    pub fn pair(a: &Address, b: &Address, fee: Decimal) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self::Pair {
            low: low.clone(),
            high: high.clone(),
            fee: fee.normalize(),
        }
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pool(id) => write!(f, "pool:{id}"),
            Self::Pair { low, high, fee } => write!(f, "pair:{low}:{high}:{fee}"),
            Self::Swap(hash) => write!(f, "swap:{hash}"),
            Self::Stats => f.write_str("stats"),
        }
    }
}

/// A table of async mutexes created on demand.
#[derive(Clone, Default)]
pub struct KeyedLocks {
    table: Arc<Mutex<HashMap<LockKey, Arc<Mutex<()>>>>>,
}

impl KeyedLocks {
    /// An empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`. Access ends when the guard drops.
    pub async fn lock(&self, key: LockKey) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut table = self.table.lock().await;
            if table.len() >= PRUNE_THRESHOLD {
                table.retain(|_, m| Arc::strong_count(m) > 1);
            }
            table.entry(key).or_default().clone()
        };
        mutex.lock_owned().await
    }

    /// Number of keys currently tracked.
    pub async fn len(&self) -> usize {
        self.table.lock().await.len()
    }
}
