use crate::domain::bet::Identity;
use crate::domain::ports::ValueLedger;
use crate::error::{PoolError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory stand-in for the host ledger.
///
/// Credits recipients in a `HashMap` behind `Arc<RwLock<..>>`, so clones share
/// balances. Recipients registered through `reject_transfers_to` refuse every
/// transfer, which is how tests and the CLI exercise partial distribution.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    balances: Arc<RwLock<HashMap<Identity, u128>>>,
    rejecting: Arc<RwLock<HashSet<Identity>>>,
}

impl InMemoryLedger {
    /// Creates a new, empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rejecting<I>(identities: I) -> Self
    where
        I: IntoIterator<Item = Identity>,
    {
        Self {
            balances: Arc::default(),
            rejecting: Arc::new(RwLock::new(identities.into_iter().collect())),
        }
    }

    pub async fn reject_transfers_to(&self, identity: Identity) {
        self.rejecting.write().await.insert(identity);
    }

    pub async fn accept_transfers_to(&self, identity: &Identity) {
        self.rejecting.write().await.remove(identity);
    }

    pub async fn balance_of(&self, identity: &Identity) -> u128 {
        self.balances
            .read()
            .await
            .get(identity)
            .copied()
            .unwrap_or_default()
    }

    pub async fn balances(&self) -> HashMap<Identity, u128> {
        self.balances.read().await.clone()
    }
}

#[async_trait]
impl ValueLedger for InMemoryLedger {
    async fn transfer(&self, to: &Identity, amount: u128) -> Result<()> {
        if self.rejecting.read().await.contains(to) {
            return Err(PoolError::TransferFailed {
                to: to.to_string(),
                amount,
                reason: "recipient rejected the transfer".to_string(),
            });
        }

        let mut balances = self.balances.write().await;
        let balance = balances.entry(to.clone()).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or(PoolError::ArithmeticOverflow)?;
        Ok(())
    }
}
