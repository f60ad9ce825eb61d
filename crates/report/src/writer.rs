//! CSV output and diagnostics.
//!
//! The report stream holds the block table followed by the validator table.
//! Diagnostic lines go to their own stream when one is given, otherwise they
//! are interleaved with the CSV rows.

use crate::assembler::ReportRow;
use crate::scanner::BlockSummary;
use std::io::{self, Write};

/// Header line of the block table
pub const BLOCK_CSV_HEADER: &str = "height,proposer,num_txs,gas_used,gas_wanted";

/// Progress line written before each bonded validator page request
pub const VALIDATOR_PAGE_PROGRESS: &str = "Load validators page ...";

pub struct ReportWriter<O: Write, D: Write = io::Sink> {
    out: O,
    diagnostics: Option<D>,
}

impl<O: Write> ReportWriter<O, io::Sink> {
    /// Writes diagnostics into the report stream.
    pub fn inline(out: O) -> Self {
        Self {
            out,
            diagnostics: None,
        }
    }
}

impl<O: Write, D: Write> ReportWriter<O, D> {
    /// `diagnostics: None` interleaves diagnostic lines with the report.
    pub fn new(out: O, diagnostics: Option<D>) -> Self {
        Self { out, diagnostics }
    }

    pub fn write_block_header(&mut self) -> io::Result<()> {
        writeln!(self.out, "{BLOCK_CSV_HEADER}")
    }

    pub fn write_block(&mut self, block: &BlockSummary) -> io::Result<()> {
        writeln!(
            self.out,
            "{},{},{},{},{}",
            block.height, block.proposer, block.tx_count, block.gas_used, block.gas_wanted
        )
    }

    pub fn write_validator_row(&mut self, row: &ReportRow) -> io::Result<()> {
        writeln!(self.out, "{row}")
    }

    pub fn diagnostic(&mut self, line: &str) -> io::Result<()> {
        match self.diagnostics.as_mut() {
            Some(diagnostics) => {
                writeln!(diagnostics, "{line}")?;
                diagnostics.flush()
            }
            None => writeln!(self.out, "{line}"),
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()?;
        if let Some(diagnostics) = self.diagnostics.as_mut() {
            diagnostics.flush()?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> (O, Option<D>) {
        (self.out, self.diagnostics)
    }
}
