use serde::{Deserialize, Serialize};

/// Lifecycle of a pool. Both non-open states are terminal for betting.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum PoolState {
    #[default]
    Open,
    Resolved,
    EmergencyClosed,
}

impl PoolState {
    pub fn is_open(&self) -> bool {
        *self == PoolState::Open
    }
}

/// What a resolution does when nobody staked on the winning outcome.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoWinnerPolicy {
    /// Every bet is returned to its bettor.
    #[default]
    Refund,
    /// Nothing is transferred; the pool stays held for the manager to sweep.
    Retain,
}
