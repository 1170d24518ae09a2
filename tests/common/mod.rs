#![allow(dead_code)]

use betpool::application::pool::PoolLedger;
use betpool::domain::bet::Identity;
use betpool::infrastructure::in_memory::InMemoryLedger;
use rand::Rng;
use std::io::{Error, Write};
use std::path::Path;

pub const ETHER: u128 = 1_000_000_000_000_000_000;
pub const MANAGER: &str = "manager";

pub fn id(name: &str) -> Identity {
    Identity::from(name)
}

pub fn teams() -> Vec<String> {
    vec!["Team A".to_string(), "Team B".to_string()]
}

/// A two-team pool whose ledger shares balances with `ledger`.
pub fn two_team_pool(ledger: &InMemoryLedger) -> PoolLedger {
    PoolLedger::create(teams(), MANAGER, Box::new(ledger.clone())).expect("Failed to create pool")
}

/// Random bets as (bettor, outcome index, amount) over `outcomes` outcomes.
pub fn random_bets<R: Rng>(rng: &mut R, count: usize, outcomes: usize) -> Vec<(String, usize, u128)> {
    (0..count)
        .map(|i| {
            (
                format!("bettor-{}", i % 17),
                rng.gen_range(0..outcomes),
                rng.gen_range(1..=1_000_000_000_000u128),
            )
        })
        .collect()
}

pub fn write_commands(path: &Path, rows: &[[&str; 4]]) -> Result<(), Error> {
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "type, caller, outcome, amount")?;
    for row in rows {
        writeln!(file, "{}", row.join(", "))?;
    }
    Ok(())
}
