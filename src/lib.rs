pub mod config;
pub mod core;
pub mod domain;
pub mod report;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::LocalStorage;
pub use config::param_file::ParameterFile;
pub use config::profile::{Profile, RawParameters};
pub use config::toml_config::TomlProfile;
pub use crate::core::{calculator::compute, calculator::DoseCalculator, engine::DoseEngine};
pub use domain::model::{
    AttenuatorTier, DoseReport, DoseResult, DoseRow, DoseTarget, ExperimentParameters,
    ExperimentPlan, RunSummary,
};
pub use report::{DoseFileReporter, JsonReporter, OutputFormat, TableReporter};
pub use utils::error::{DoseError, Result};
