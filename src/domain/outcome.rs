use crate::error::{PoolError, Result};
use serde::Serialize;
use std::collections::HashMap;

/// Index of an outcome inside the pool's fixed outcome table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OutcomeId(usize);

impl OutcomeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The ordered set of outcomes a pool accepts, interned to `OutcomeId`s.
///
/// Order is fixed at construction and defines index-based lookup.
#[derive(Debug, Clone)]
pub struct Outcomes {
    names: Vec<String>,
    ids: HashMap<String, OutcomeId>,
}

impl Outcomes {
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(PoolError::InvalidConfiguration(
                "at least one outcome is required".to_string(),
            ));
        }

        let mut ids = HashMap::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(PoolError::InvalidConfiguration(format!(
                    "outcome at index {} is empty",
                    index
                )));
            }
            if ids.insert(name.clone(), OutcomeId(index)).is_some() {
                return Err(PoolError::InvalidConfiguration(format!(
                    "duplicate outcome {:?}",
                    name
                )));
            }
        }

        Ok(Self { names, ids })
    }

    /// Resolves a name to its id. Empty or unknown names yield `None`.
    pub fn lookup(&self, name: &str) -> Option<OutcomeId> {
        self.ids.get(name).copied()
    }

    pub fn resolve(&self, name: &str) -> Result<OutcomeId> {
        self.lookup(name)
            .ok_or_else(|| PoolError::UnknownOutcome(name.to_string()))
    }

    pub fn get(&self, index: usize) -> Result<&str> {
        self.names
            .get(index)
            .map(String::as_str)
            .ok_or(PoolError::IndexOutOfRange(index))
    }

    pub fn name(&self, id: OutcomeId) -> &str {
        &self.names[id.0]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
