//! Application layer containing the pool's business logic.
//!
//! `PoolLedger` is the single owner of a pool's state and serializes every
//! mutating operation behind one `tokio` lock. `PayoutEngine` computes and
//! drives the distribution on its behalf, and `command` maps parsed front-end
//! commands onto pool operations.

pub mod command;
pub mod payout;
pub mod pool;
