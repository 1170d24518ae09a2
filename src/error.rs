use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Invalid pool configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Pool is closed")]
    PoolClosed,
    #[error("Unknown outcome: {0:?}")]
    UnknownOutcome(String),
    #[error("Bet amount must be greater than zero")]
    ZeroAmount,
    #[error("Caller {0} is not the pool manager")]
    Unauthorized(String),
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
    #[error("Outcome index {0} is out of range")]
    IndexOutOfRange(usize),
    #[error("Transfer of {amount} to {to} failed: {reason}")]
    TransferFailed {
        to: String,
        amount: u128,
        reason: String,
    },
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PoolError>;
