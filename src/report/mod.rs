pub mod dose_file;
pub mod json;
pub mod table;

pub use dose_file::{DoseFileReporter, DEFAULT_DOSE_FILE};
pub use json::JsonReporter;
pub use table::TableReporter;

use serde::{Deserialize, Serialize};

/// What goes to stdout after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Grid table followed by the run summary
    #[default]
    Table,
    /// Parameters, rows and summary as one JSON document
    Json,
}
