use crate::application::payout::PayoutEngine;
use crate::config::PoolConfig;
use crate::domain::bet::{Amount, Bet, Identity, OutcomeAggregate};
use crate::domain::outcome::Outcomes;
use crate::domain::pool::PoolState;
use crate::domain::ports::LedgerBox;
use crate::domain::report::PayoutReport;
use crate::error::{PoolError, Result};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Totals for one outcome as seen by external queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TeamBetInfo {
    pub total_staked: u128,
    pub bet_count: u64,
    pub is_known: bool,
}

/// Mutable part of the pool, guarded as one unit.
#[derive(Debug)]
struct Book {
    state: PoolState,
    bets: Vec<Bet>,
    aggregates: Vec<OutcomeAggregate>,
    held: u128,
}

impl Book {
    fn settle(&mut self, report: &PayoutReport) {
        self.held = self.held.saturating_sub(report.sent_total());
    }
}

/// The canonical state of one betting pool.
///
/// `PoolLedger` owns the outcome table, the bet log with its per-outcome
/// aggregates, the lifecycle state and the held balance. Every mutating
/// operation holds the write half of a single lock for its whole duration,
/// distribution loop included, so at most one is in flight per pool. Queries
/// take the read half and always see complete updates.
pub struct PoolLedger {
    outcomes: Outcomes,
    manager: Identity,
    engine: PayoutEngine,
    book: RwLock<Book>,
    ledger: LedgerBox,
}

impl PoolLedger {
    /// Opens a pool accepting bets on `outcomes`, resolvable only by `manager`.
    pub fn create(
        outcomes: Vec<String>,
        manager: impl Into<Identity>,
        ledger: LedgerBox,
    ) -> Result<Self> {
        Self::from_config(PoolConfig::new(outcomes, manager), ledger)
    }

    /// Opens a pool from a validated `PoolConfig`.
    pub fn from_config(config: PoolConfig, ledger: LedgerBox) -> Result<Self> {
        let outcomes = config.validate()?;
        let aggregates = vec![OutcomeAggregate::default(); outcomes.len()];

        info!(
            outcomes = outcomes.len(),
            manager = %config.manager,
            "Pool opened"
        );

        Ok(Self {
            outcomes,
            manager: config.manager,
            engine: PayoutEngine::new(config.no_winner_policy),
            book: RwLock::new(Book {
                state: PoolState::Open,
                bets: Vec::new(),
                aggregates,
                held: 0,
            }),
            ledger,
        })
    }

    /// The only identity allowed to resolve or close the pool.
    pub fn manager(&self) -> &Identity {
        &self.manager
    }

    /// Outcome name at `index` in creation order.
    pub fn allowed_outcome(&self, index: usize) -> Result<&str> {
        self.outcomes.get(index)
    }

    /// Number of outcomes fixed at creation.
    pub fn outcome_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> PoolState {
        self.book.read().await.state
    }

    /// Value the pool currently holds: stakes in, minus successful transfers out.
    pub async fn held_balance(&self) -> u128 {
        self.book.read().await.held
    }

    /// Records a stake whose value the host ledger has already moved into the pool.
    pub async fn place_bet(&self, caller: Identity, outcome: &str, amount: u128) -> Result<()> {
        let mut book = self.book.write().await;

        if !book.state.is_open() {
            return Err(PoolError::PoolClosed);
        }
        let id = self.outcomes.resolve(outcome)?;
        let amount = Amount::new(amount)?;

        let aggregate = book.aggregates[id.index()].with_bet(amount)?;
        let held = book
            .held
            .checked_add(amount.value())
            .ok_or(PoolError::ArithmeticOverflow)?;

        book.aggregates[id.index()] = aggregate;
        book.held = held;
        book.bets.push(Bet {
            bettor: caller,
            outcome: id,
            amount,
        });

        debug!(
            outcome,
            amount = %amount.value(),
            total_staked = %aggregate.total_staked,
            "Bet placed"
        );
        Ok(())
    }

    /// Totals for `outcome`; unknown outcomes report zeros and `is_known == false`.
    pub async fn team_bet_info(&self, outcome: &str) -> TeamBetInfo {
        let Some(id) = self.outcomes.lookup(outcome) else {
            return TeamBetInfo::default();
        };
        let aggregate = self.book.read().await.aggregates[id.index()];
        TeamBetInfo {
            total_staked: aggregate.total_staked,
            bet_count: aggregate.bet_count,
            is_known: true,
        }
    }

    /// Bets on `outcome` in the order they were placed.
    pub async fn team_bets(&self, outcome: &str) -> Vec<Bet> {
        let Some(id) = self.outcomes.lookup(outcome) else {
            return Vec::new();
        };
        self.book
            .read()
            .await
            .bets
            .iter()
            .filter(|bet| bet.outcome == id)
            .cloned()
            .collect()
    }

    /// Sum of all per-outcome totals.
    pub async fn total_bets_balance(&self) -> u128 {
        self.book
            .read()
            .await
            .aggregates
            .iter()
            .map(|aggregate| aggregate.total_staked)
            .sum()
    }

    /// Resolves the pool in favour of `outcome` and pays the winners.
    ///
    /// Payouts are computed before anything changes: an arithmetic overflow
    /// leaves the pool open. Once computed, the pool is `Resolved` for good and
    /// individual transfer failures only show up in the report.
    pub async fn pick_winner(&self, caller: &Identity, outcome: &str) -> Result<PayoutReport> {
        self.authorize(caller)?;
        let mut book = self.book.write().await;

        if !book.state.is_open() {
            return Err(PoolError::PoolClosed);
        }
        let id = self.outcomes.resolve(outcome)?;
        let plan = self
            .engine
            .plan_winner(&book.bets, &book.aggregates, id, self.outcomes.name(id))?;

        book.state = PoolState::Resolved;
        info!(
            outcome,
            total_pool = %plan.total_pool,
            winning_pool = %plan.winning_pool,
            transfers = plan.transfers.len(),
            "Pool resolved"
        );

        let report = self.engine.distribute(plan, self.ledger.as_ref()).await;
        book.settle(&report);
        Ok(report)
    }

    /// Settles the pool as a draw: every stake goes back to its bettor.
    pub async fn declare_draw(&self, caller: &Identity) -> Result<PayoutReport> {
        self.authorize(caller)?;
        let mut book = self.book.write().await;

        if !book.state.is_open() {
            return Err(PoolError::PoolClosed);
        }
        let plan = self.engine.plan_draw(&book.bets, &book.aggregates)?;

        book.state = PoolState::Resolved;
        info!(
            total_pool = %plan.total_pool,
            transfers = plan.transfers.len(),
            "Pool settled as a draw"
        );

        let report = self.engine.distribute(plan, self.ledger.as_ref()).await;
        book.settle(&report);
        Ok(report)
    }

    /// Sends everything the pool holds to the manager and closes it.
    ///
    /// Legal in any state. The pool is `EmergencyClosed` afterwards even if the
    /// transfer fails; the held balance is then untouched so the call can be
    /// repeated.
    pub async fn emergency_withdraw(&self, caller: &Identity) -> Result<u128> {
        self.authorize(caller)?;
        let mut book = self.book.write().await;

        book.state = PoolState::EmergencyClosed;
        let amount = book.held;
        if amount == 0 {
            info!("Emergency withdrawal with empty pool");
            return Ok(0);
        }

        match self.ledger.transfer(&self.manager, amount).await {
            Ok(()) => {
                book.held = 0;
                info!(amount = %amount, "Emergency withdrawal completed");
                Ok(amount)
            }
            Err(e) => {
                warn!(amount = %amount, error = %e, "Emergency withdrawal failed");
                Err(e)
            }
        }
    }

    fn authorize(&self, caller: &Identity) -> Result<()> {
        if *caller == self.manager {
            Ok(())
        } else {
            Err(PoolError::Unauthorized(caller.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pool::NoWinnerPolicy;
    use crate::domain::report::Settlement;
    use crate::infrastructure::in_memory::InMemoryLedger;

    fn pool_with(ledger: &InMemoryLedger) -> PoolLedger {
        PoolLedger::create(
            vec!["Team A".to_string(), "Team B".to_string()],
            "manager",
            Box::new(ledger.clone()),
        )
        .unwrap()
    }

    fn id(name: &str) -> Identity {
        Identity::from(name)
    }

    #[tokio::test]
    async fn test_place_bet_updates_aggregates() {
        let pool = pool_with(&InMemoryLedger::new());
        pool.place_bet(id("alice"), "Team A", 10).await.unwrap();
        pool.place_bet(id("bob"), "Team A", 5).await.unwrap();

        let info = pool.team_bet_info("Team A").await;
        assert_eq!(info.total_staked, 15);
        assert_eq!(info.bet_count, 2);
        assert!(info.is_known);
        assert_eq!(pool.total_bets_balance().await, 15);
        assert_eq!(pool.held_balance().await, 15);

        let bets = pool.team_bets("Team A").await;
        assert_eq!(bets[0].bettor, id("alice"));
        assert_eq!(bets[1].bettor, id("bob"));
        assert!(pool.team_bets("Team B").await.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_bets_leave_no_trace() {
        let pool = pool_with(&InMemoryLedger::new());

        assert!(matches!(
            pool.place_bet(id("alice"), "Team C", 10).await,
            Err(PoolError::UnknownOutcome(_))
        ));
        assert!(matches!(
            pool.place_bet(id("alice"), "", 10).await,
            Err(PoolError::UnknownOutcome(_))
        ));
        assert!(matches!(
            pool.place_bet(id("alice"), "Team A", 0).await,
            Err(PoolError::ZeroAmount)
        ));

        assert_eq!(pool.total_bets_balance().await, 0);
        assert_eq!(pool.team_bet_info("Team A").await.bet_count, 0);
    }

    #[tokio::test]
    async fn test_place_bet_overflow_is_rejected() {
        let pool = pool_with(&InMemoryLedger::new());
        pool.place_bet(id("alice"), "Team A", u128::MAX).await.unwrap();

        assert!(matches!(
            pool.place_bet(id("bob"), "Team B", 1).await,
            Err(PoolError::ArithmeticOverflow)
        ));
        assert_eq!(pool.team_bet_info("Team B").await.bet_count, 0);
        assert_eq!(pool.held_balance().await, u128::MAX);
    }

    #[tokio::test]
    async fn test_unknown_outcome_info_is_zero() {
        let pool = pool_with(&InMemoryLedger::new());
        assert_eq!(pool.team_bet_info("Team Z").await, TeamBetInfo::default());
    }

    #[tokio::test]
    async fn test_pick_winner_pays_and_closes() {
        let ledger = InMemoryLedger::new();
        let pool = pool_with(&ledger);
        pool.place_bet(id("alice"), "Team A", 30).await.unwrap();
        pool.place_bet(id("bob"), "Team B", 10).await.unwrap();

        let report = pool.pick_winner(&id("manager"), "Team B").await.unwrap();

        assert_eq!(report.sent_total(), 40);
        assert_eq!(ledger.balance_of(&id("bob")).await, 40);
        assert_eq!(pool.state().await, PoolState::Resolved);
        assert_eq!(pool.held_balance().await, 0);
        assert!(matches!(
            pool.place_bet(id("carol"), "Team A", 1).await,
            Err(PoolError::PoolClosed)
        ));
        assert!(matches!(
            pool.pick_winner(&id("manager"), "Team A").await,
            Err(PoolError::PoolClosed)
        ));
    }

    #[tokio::test]
    async fn test_pick_winner_requires_manager() {
        let pool = pool_with(&InMemoryLedger::new());
        assert!(matches!(
            pool.pick_winner(&id("alice"), "Team A").await,
            Err(PoolError::Unauthorized(_))
        ));
        assert_eq!(pool.state().await, PoolState::Open);
    }

    #[tokio::test]
    async fn test_pick_winner_overflow_keeps_pool_open() {
        let ledger = InMemoryLedger::new();
        let pool = pool_with(&ledger);
        pool.place_bet(id("alice"), "Team A", u128::MAX / 2).await.unwrap();
        pool.place_bet(id("bob"), "Team B", u128::MAX / 4).await.unwrap();

        assert!(matches!(
            pool.pick_winner(&id("manager"), "Team A").await,
            Err(PoolError::ArithmeticOverflow)
        ));
        assert_eq!(pool.state().await, PoolState::Open);
        assert!(ledger.balances().await.is_empty());

        // the manager can still recover the funds
        let withdrawn = pool.emergency_withdraw(&id("manager")).await.unwrap();
        assert_eq!(withdrawn, u128::MAX / 2 + u128::MAX / 4);
    }

    #[tokio::test]
    async fn test_failed_payout_stays_held() {
        let ledger = InMemoryLedger::with_rejecting([id("bob")]);
        let pool = pool_with(&ledger);
        pool.place_bet(id("alice"), "Team A", 10).await.unwrap();
        pool.place_bet(id("bob"), "Team A", 10).await.unwrap();
        pool.place_bet(id("carol"), "Team B", 20).await.unwrap();

        let report = pool.pick_winner(&id("manager"), "Team A").await.unwrap();

        assert_eq!(report.failures().count(), 1);
        assert_eq!(pool.state().await, PoolState::Resolved);
        assert_eq!(ledger.balance_of(&id("alice")).await, 20);
        assert_eq!(pool.held_balance().await, 20);

        let swept = pool.emergency_withdraw(&id("manager")).await.unwrap();
        assert_eq!(swept, 20);
        assert_eq!(pool.state().await, PoolState::EmergencyClosed);
    }

    #[tokio::test]
    async fn test_no_winner_retain_leaves_funds_held() {
        let ledger = InMemoryLedger::new();
        let config = PoolConfig::new(vec!["Yes".into(), "No".into()], "manager")
            .with_no_winner_policy(NoWinnerPolicy::Retain);
        let pool = PoolLedger::from_config(config, Box::new(ledger.clone())).unwrap();
        pool.place_bet(id("alice"), "Yes", 7).await.unwrap();

        let report = pool.pick_winner(&id("manager"), "No").await.unwrap();

        assert!(report.lines.is_empty());
        assert_eq!(report.undistributed, 7);
        assert_eq!(pool.held_balance().await, 7);
        assert_eq!(pool.state().await, PoolState::Resolved);
    }

    #[tokio::test]
    async fn test_declare_draw_refunds_everyone() {
        let ledger = InMemoryLedger::new();
        let pool = pool_with(&ledger);
        pool.place_bet(id("alice"), "Team A", 3).await.unwrap();
        pool.place_bet(id("bob"), "Team B", 4).await.unwrap();
        pool.place_bet(id("alice"), "Team B", 2).await.unwrap();

        assert!(matches!(
            pool.declare_draw(&id("bob")).await,
            Err(PoolError::Unauthorized(_))
        ));
        let report = pool.declare_draw(&id("manager")).await.unwrap();

        assert_eq!(report.settlement, Settlement::Draw);
        assert_eq!(ledger.balance_of(&id("alice")).await, 5);
        assert_eq!(ledger.balance_of(&id("bob")).await, 4);
        assert_eq!(pool.held_balance().await, 0);
        assert!(matches!(
            pool.declare_draw(&id("manager")).await,
            Err(PoolError::PoolClosed)
        ));
    }

    #[tokio::test]
    async fn test_emergency_withdraw_failure_closes_and_allows_retry() {
        let ledger = InMemoryLedger::with_rejecting([id("manager")]);
        let pool = pool_with(&ledger);
        pool.place_bet(id("alice"), "Team A", 9).await.unwrap();

        assert!(matches!(
            pool.emergency_withdraw(&id("manager")).await,
            Err(PoolError::TransferFailed { .. })
        ));
        assert_eq!(pool.state().await, PoolState::EmergencyClosed);
        assert_eq!(pool.held_balance().await, 9);

        ledger.accept_transfers_to(&id("manager")).await;
        assert_eq!(pool.emergency_withdraw(&id("manager")).await.unwrap(), 9);
        assert_eq!(ledger.balance_of(&id("manager")).await, 9);
        assert_eq!(pool.held_balance().await, 0);
    }

    #[test]
    fn test_allowed_outcomes_by_index() {
        let pool = pool_with(&InMemoryLedger::new());
        assert_eq!(pool.allowed_outcome(0).unwrap(), "Team A");
        assert_eq!(pool.allowed_outcome(1).unwrap(), "Team B");
        assert!(matches!(
            pool.allowed_outcome(2),
            Err(PoolError::IndexOutOfRange(2))
        ));
        assert_eq!(pool.outcome_count(), 2);
        assert_eq!(pool.manager(), &id("manager"));
    }
}
