use crate::domain::model::DoseReport;
use crate::domain::ports::ResultReporter;
use crate::utils::error::Result;
use std::io::Write;

pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultReporter for JsonReporter<W> {
    fn report(&mut self, report: &DoseReport) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, report)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
