use crate::domain::bet::Identity;
use crate::domain::outcome::Outcomes;
use crate::domain::pool::NoWinnerPolicy;
use crate::error::{PoolError, Result};
use serde::Deserialize;

/// Everything needed to open a pool.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    pub outcomes: Vec<String>,
    pub manager: Identity,
    #[serde(default)]
    pub no_winner_policy: NoWinnerPolicy,
}

impl PoolConfig {
    pub fn new(outcomes: Vec<String>, manager: impl Into<Identity>) -> Self {
        Self {
            outcomes,
            manager: manager.into(),
            no_winner_policy: NoWinnerPolicy::default(),
        }
    }

    pub fn with_no_winner_policy(mut self, policy: NoWinnerPolicy) -> Self {
        self.no_winner_policy = policy;
        self
    }

    /// Validates the configuration and interns its outcomes.
    pub fn validate(&self) -> Result<Outcomes> {
        if self.manager.as_str().is_empty() {
            return Err(PoolError::InvalidConfiguration(
                "manager identity must not be empty".to_string(),
            ));
        }
        Outcomes::new(self.outcomes.clone())
    }
}
