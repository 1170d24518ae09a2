use crate::domain::report::{TransferKind, TransferLine, TransferStatus};
use crate::domain::units::Units;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct TransferRow<'a> {
    kind: TransferKind,
    recipient: &'a str,
    amount: String,
    status: &'static str,
    reason: &'a str,
}

impl<'a> TransferRow<'a> {
    fn new(line: &'a TransferLine, units: Units) -> Self {
        let (status, reason) = match &line.status {
            TransferStatus::Sent => ("sent", ""),
            TransferStatus::Failed(reason) => ("failed", reason.as_str()),
        };
        Self {
            kind: line.kind,
            recipient: line.recipient.as_str(),
            amount: units.format(line.amount),
            status,
            reason,
        }
    }
}

/// Writes transfer lines as CSV, amounts rendered in whole tokens.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
    units: Units,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W, units: Units) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
            units,
        }
    }

    pub fn write_lines<'a, I>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a TransferLine>,
    {
        let mut wrote_any = false;
        for line in lines {
            self.writer.serialize(TransferRow::new(line, self.units))?;
            wrote_any = true;
        }
        if !wrote_any {
            self.writer
                .write_record(["kind", "recipient", "amount", "status", "reason"])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
