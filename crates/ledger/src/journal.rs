//! Compensating rollback for multi-record mutations.
//!
//! The store only guarantees per-record atomicity. A mutation that touches a
//! position, a pool and the log records each successful write here; if a
//! later write fails, the earlier ones are undone in reverse order. Callers
//! hold the pool lock for the whole sequence, so nothing else observes the
//! intermediate state through the ledger.

use crate::error::{LedgerError, LedgerResult};
use pioswap_data::{LedgerStore, PoolStore, PositionStore, StoreResult, TransactionStore};
use pioswap_domain::entities::{Pool, Position, Transaction};
use tracing::{error, warn};

enum Undo {
    RestorePool(Pool),
    RestorePosition(Position),
    DeletePosition(Position),
}

/// Records undo steps for writes made during one mutation.
pub(crate) struct RollbackJournal<'a> {
    store: &'a dyn LedgerStore,
    undo: Vec<Undo>,
}

impl<'a> RollbackJournal<'a> {
    pub(crate) fn new(store: &'a dyn LedgerStore) -> Self {
        Self {
            store,
            undo: Vec::new(),
        }
    }

    /// Writes `after` over `before`.
    pub(crate) async fn write_pool(&mut self, before: &Pool, after: &Pool) -> StoreResult<()> {
        self.store.upsert_pool(after).await?;
        self.undo.push(Undo::RestorePool(before.clone()));
        Ok(())
    }

    /// Writes `after`; `before` is `None` when the position is new.
    pub(crate) async fn write_position(
        &mut self,
        before: Option<&Position>,
        after: &Position,
    ) -> StoreResult<()> {
        self.store.upsert_position(after).await?;
        self.undo.push(match before {
            Some(before) => Undo::RestorePosition(before.clone()),
            None => Undo::DeletePosition(after.clone()),
        });
        Ok(())
    }

    pub(crate) async fn delete_position(&mut self, before: &Position) -> StoreResult<()> {
        self.store.delete_position(before.id).await?;
        self.undo.push(Undo::RestorePosition(before.clone()));
        Ok(())
    }

    /// Appends the log entry. This is always the last write of a mutation,
    /// so nothing needs undoing for it.
    pub(crate) async fn append(&mut self, tx: &Transaction) -> StoreResult<()> {
        self.store.append_transaction(tx).await
    }

    /// Turns the outcome of the write sequence into the operation result,
    /// rolling back on failure.
    pub(crate) async fn settle(self, outcome: StoreResult<()>) -> LedgerResult<()> {
        match outcome {
            Ok(()) => Ok(()),
            Err(err) => {
                error!(error = %err, steps = self.undo.len(), "write failed, rolling back");
                self.rollback().await;
                Err(LedgerError::Store(err))
            }
        }
    }

    async fn rollback(self) {
        for step in self.undo.into_iter().rev() {
            let result = match &step {
                Undo::RestorePool(pool) => self.store.upsert_pool(pool).await,
                Undo::RestorePosition(position) => self.store.upsert_position(position).await,
                Undo::DeletePosition(position) => {
                    self.store.delete_position(position.id).await.map(|_| ())
                }
            };
            if let Err(err) = result {
                // Nothing left to compensate with; the record stays as written.
                error!(error = %err, step = step.describe(), "rollback step failed");
            } else {
                warn!(step = step.describe(), "rolled back");
            }
        }
    }
}

impl Undo {
    fn describe(&self) -> String {
        match self {
            Self::RestorePool(pool) => format!("restore pool {}", pool.id),
            Self::RestorePosition(position) => format!("restore position {}", position.id),
            Self::DeletePosition(position) => format!("delete position {}", position.id),
        }
    }
}
