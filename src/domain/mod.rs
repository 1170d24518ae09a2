//! Domain layer: value types of the betting pool and the ports it talks through.

pub mod bet;
pub mod outcome;
pub mod pool;
pub mod ports;
pub mod report;
pub mod units;
