use crate::domain::bet::{Bet, Identity, OutcomeAggregate};
use crate::domain::outcome::OutcomeId;
use crate::domain::pool::NoWinnerPolicy;
use crate::domain::ports::ValueLedger;
use crate::domain::report::{PayoutReport, Settlement, TransferKind, TransferLine, TransferStatus};
use crate::error::{PoolError, Result};
use tracing::warn;

/// A transfer the engine intends to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTransfer {
    pub kind: TransferKind,
    pub recipient: Identity,
    pub amount: u128,
}

/// Fully computed resolution, not yet executed.
///
/// Building a plan never touches the ledger, so a failing computation leaves
/// no trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutPlan {
    pub settlement: Settlement,
    pub total_pool: u128,
    pub winning_pool: u128,
    pub transfers: Vec<PlannedTransfer>,
}

impl PayoutPlan {
    /// Sum of every planned transfer.
    pub fn planned_total(&self) -> u128 {
        self.transfers.iter().map(|t| t.amount).sum()
    }
}

/// Pari-mutuel payout computation and sequential distribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayoutEngine {
    no_winner_policy: NoWinnerPolicy,
}

impl PayoutEngine {
    /// Creates an engine applying `no_winner_policy` when the winning side is empty.
    pub fn new(no_winner_policy: NoWinnerPolicy) -> Self {
        Self { no_winner_policy }
    }

    /// Plans the proportional split of the whole pool among bets on `winner`.
    ///
    /// Each winning bet receives `amount * total_pool / winning_pool`, multiplied
    /// first and floored. Overflow aborts the whole plan.
    pub fn plan_winner(
        &self,
        bets: &[Bet],
        aggregates: &[OutcomeAggregate],
        winner: OutcomeId,
        outcome_name: &str,
    ) -> Result<PayoutPlan> {
        let total_pool = total_pool(aggregates)?;
        let winning_pool = aggregates
            .get(winner.index())
            .map(|aggregate| aggregate.total_staked)
            .ok_or_else(|| PoolError::UnknownOutcome(outcome_name.to_string()))?;

        if winning_pool == 0 {
            return Ok(self.plan_no_winners(bets, total_pool));
        }

        let mut transfers = Vec::new();
        for bet in bets.iter().filter(|bet| bet.outcome == winner) {
            let payout = bet
                .amount
                .value()
                .checked_mul(total_pool)
                .ok_or(PoolError::ArithmeticOverflow)?
                / winning_pool;
            transfers.push(PlannedTransfer {
                kind: TransferKind::Payout,
                recipient: bet.bettor.clone(),
                amount: payout,
            });
        }

        Ok(PayoutPlan {
            settlement: Settlement::Winner {
                outcome: outcome_name.to_string(),
            },
            total_pool,
            winning_pool,
            transfers,
        })
    }

    /// Plans returning every stake to its bettor.
    pub fn plan_draw(&self, bets: &[Bet], aggregates: &[OutcomeAggregate]) -> Result<PayoutPlan> {
        Ok(PayoutPlan {
            settlement: Settlement::Draw,
            total_pool: total_pool(aggregates)?,
            winning_pool: 0,
            transfers: refunds(bets),
        })
    }

    fn plan_no_winners(&self, bets: &[Bet], total_pool: u128) -> PayoutPlan {
        let transfers = match self.no_winner_policy {
            NoWinnerPolicy::Refund => refunds(bets),
            NoWinnerPolicy::Retain => Vec::new(),
        };
        PayoutPlan {
            settlement: Settlement::NoWinners {
                policy: self.no_winner_policy,
            },
            total_pool,
            winning_pool: 0,
            transfers,
        }
    }

    /// Executes the plan one transfer at a time, in plan order.
    ///
    /// A failed transfer is recorded and skipped; it never stops the batch.
    pub async fn distribute(&self, plan: PayoutPlan, ledger: &dyn ValueLedger) -> PayoutReport {
        let undistributed = plan.total_pool.saturating_sub(plan.planned_total());
        let mut lines = Vec::with_capacity(plan.transfers.len());

        for transfer in plan.transfers {
            let status = match ledger.transfer(&transfer.recipient, transfer.amount).await {
                Ok(()) => TransferStatus::Sent,
                Err(e) => {
                    warn!(
                        recipient = %transfer.recipient,
                        amount = %transfer.amount,
                        error = %e,
                        "Transfer failed"
                    );
                    TransferStatus::Failed(e.to_string())
                }
            };
            lines.push(TransferLine {
                kind: transfer.kind,
                recipient: transfer.recipient,
                amount: transfer.amount,
                status,
            });
        }

        PayoutReport {
            settlement: plan.settlement,
            total_pool: plan.total_pool,
            winning_pool: plan.winning_pool,
            lines,
            undistributed,
        }
    }
}

fn total_pool(aggregates: &[OutcomeAggregate]) -> Result<u128> {
    aggregates.iter().try_fold(0u128, |acc, aggregate| {
        acc.checked_add(aggregate.total_staked)
            .ok_or(PoolError::ArithmeticOverflow)
    })
}

fn refunds(bets: &[Bet]) -> Vec<PlannedTransfer> {
    bets.iter()
        .map(|bet| PlannedTransfer {
            kind: TransferKind::Refund,
            recipient: bet.bettor.clone(),
            amount: bet.amount.value(),
        })
        .collect()
}
