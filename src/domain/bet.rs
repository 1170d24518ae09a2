use super::outcome::OutcomeId;
use crate::error::PoolError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a participant as supplied by the caller's authenticated context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A strictly positive stake in the ledger's smallest unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(u128);

impl Amount {
    pub fn new(value: u128) -> Result<Self, PoolError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(PoolError::ZeroAmount)
        }
    }

    pub fn value(&self) -> u128 {
        self.0
    }
}

impl TryFrom<u128> for Amount {
    type Error = PoolError;

    fn try_from(value: u128) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A single wager. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bet {
    pub bettor: Identity,
    pub outcome: OutcomeId,
    pub amount: Amount,
}

/// Running totals for one outcome, maintained as bets are appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OutcomeAggregate {
    pub total_staked: u128,
    pub bet_count: u64,
}

impl OutcomeAggregate {
    /// Returns the aggregate with `amount` added, leaving `self` untouched.
    pub fn with_bet(&self, amount: Amount) -> Result<Self, PoolError> {
        Ok(Self {
            total_staked: self
                .total_staked
                .checked_add(amount.value())
                .ok_or(PoolError::ArithmeticOverflow)?,
            bet_count: self
                .bet_count
                .checked_add(1)
                .ok_or(PoolError::ArithmeticOverflow)?,
        })
    }
}
