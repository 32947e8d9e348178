use crate::domain::model::{DoseReport, ExperimentPlan};
use crate::utils::error::Result;

/// Anything that can produce a validated plan: CLI flags, parameter files, TOML profiles.
pub trait ParameterSource {
    /// Human readable origin used in logs and error messages.
    fn origin(&self) -> String;
    fn load_plan(&self) -> Result<ExperimentPlan>;
}

impl<T: ParameterSource + ?Sized> ParameterSource for Box<T> {
    fn origin(&self) -> String {
        (**self).origin()
    }

    fn load_plan(&self) -> Result<ExperimentPlan> {
        (**self).load_plan()
    }
}

pub trait Storage {
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ResultReporter {
    fn report(&mut self, report: &DoseReport) -> Result<()>;
}
