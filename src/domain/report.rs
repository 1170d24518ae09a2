use super::bet::Identity;
use super::pool::NoWinnerPolicy;
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransferKind {
    Payout,
    Refund,
    Withdrawal,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Sent,
    Failed(String),
}

/// One outgoing transfer and what the ledger made of it.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct TransferLine {
    pub kind: TransferKind,
    pub recipient: Identity,
    pub amount: u128,
    pub status: TransferStatus,
}

impl TransferLine {
    pub fn is_sent(&self) -> bool {
        self.status == TransferStatus::Sent
    }
}

/// How a resolution settled the pool.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Settlement {
    Winner { outcome: String },
    Draw,
    NoWinners { policy: NoWinnerPolicy },
}

/// Result of a resolution.
///
/// Failed transfers are not retried; they stay in `lines` for manual
/// remediation and their value remains in the pool's held balance.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct PayoutReport {
    pub settlement: Settlement,
    pub total_pool: u128,
    pub winning_pool: u128,
    pub lines: Vec<TransferLine>,
    /// Integer-division dust plus anything a policy chose not to distribute.
    pub undistributed: u128,
}

impl PayoutReport {
    pub fn sent_total(&self) -> u128 {
        self.lines
            .iter()
            .filter(|line| line.is_sent())
            .map(|line| line.amount)
            .sum()
    }

    pub fn failed_total(&self) -> u128 {
        self.failures().map(|line| line.amount).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TransferLine> {
        self.lines.iter().filter(|line| !line.is_sent())
    }
}
