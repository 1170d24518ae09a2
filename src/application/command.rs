use crate::application::pool::PoolLedger;
use crate::domain::bet::Identity;
use crate::domain::report::{PayoutReport, TransferKind, TransferLine, TransferStatus};
use crate::domain::units::Units;
use crate::error::{PoolError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Bet,
    Pick,
    Draw,
    Withdraw,
}

/// One externally issued operation against a pool.
///
/// `amount` is in whole tokens and only meaningful for bets.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct PoolCommand {
    pub r#type: CommandType,
    pub caller: Identity,
    pub outcome: Option<String>,
    pub amount: Option<Decimal>,
}

/// What an accepted command produced.
#[derive(Debug, PartialEq)]
pub enum Receipt {
    BetAccepted,
    Resolved(PayoutReport),
    Withdrawn(TransferLine),
}

impl Receipt {
    /// Outgoing transfers caused by the command.
    pub fn transfers(&self) -> &[TransferLine] {
        match self {
            Receipt::BetAccepted => &[],
            Receipt::Resolved(report) => &report.lines,
            Receipt::Withdrawn(line) => std::slice::from_ref(line),
        }
    }
}

/// Applies `command` to `pool`, converting token amounts with `units`.
pub async fn execute(pool: &PoolLedger, command: PoolCommand, units: Units) -> Result<Receipt> {
    match command.r#type {
        CommandType::Bet => {
            let outcome = command.outcome.unwrap_or_default();
            let amount = command
                .amount
                .ok_or_else(|| PoolError::InvalidCommand("bet is missing an amount".to_string()))?;
            pool.place_bet(command.caller, &outcome, units.to_base(amount)?)
                .await?;
            Ok(Receipt::BetAccepted)
        }
        CommandType::Pick => {
            let outcome = command.outcome.unwrap_or_default();
            let report = pool.pick_winner(&command.caller, &outcome).await?;
            Ok(Receipt::Resolved(report))
        }
        CommandType::Draw => {
            let report = pool.declare_draw(&command.caller).await?;
            Ok(Receipt::Resolved(report))
        }
        CommandType::Withdraw => {
            // a failed transfer still closed the pool, so it is reported, not rejected
            let (amount, status) = match pool.emergency_withdraw(&command.caller).await {
                Ok(amount) => (amount, TransferStatus::Sent),
                Err(PoolError::TransferFailed { amount, reason, .. }) => {
                    (amount, TransferStatus::Failed(reason))
                }
                Err(e) => return Err(e),
            };
            Ok(Receipt::Withdrawn(TransferLine {
                kind: TransferKind::Withdrawal,
                recipient: pool.manager().clone(),
                amount,
                status,
            }))
        }
    }
}
