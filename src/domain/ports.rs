use super::bet::Identity;
use crate::error::Result;
use async_trait::async_trait;

/// The host ledger's value-transfer primitive.
///
/// A transfer either fully succeeds or fails with no partial effect.
#[async_trait]
pub trait ValueLedger: Send + Sync {
    /// Moves `amount` base units from the pool's held balance to `to`.
    async fn transfer(&self, to: &Identity, amount: u128) -> Result<()>;
}

pub type LedgerBox = Box<dyn ValueLedger>;
