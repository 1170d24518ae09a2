use crate::application::command::PoolCommand;
use crate::error::{PoolError, Result};
use std::io::Read;

/// Reads pool commands from a CSV source with columns `type, caller, outcome, amount`.
///
/// Whitespace is trimmed and rows may omit trailing empty fields.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes commands; a malformed row yields an error and reading continues.
    pub fn commands(self) -> impl Iterator<Item = Result<PoolCommand>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PoolError::from))
    }
}
