pub mod calculator;
pub mod engine;

pub use crate::domain::model::{DoseReport, DoseResult, DoseTarget, ExperimentParameters};
pub use crate::domain::ports::{ParameterSource, ResultReporter, Storage};
pub use crate::utils::error::Result;
