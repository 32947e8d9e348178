//! Six-line parameter files.
//!
//! ```text
//! 100 10 1          sample doses (Gy)
//! 2300              dose rate (Gy/s)
//! 100               SNR dose (Gy)
//! 200               volume limit (uL)
//! 0.321 0.303 1     beam width, beam height, cell path length (mm)
//! 0.1 0.01          attenuator transmissions
//! ```
//!
//! A file given on the command line replaces every parameter flag.

use crate::config::profile::{Illumination, RawParameters};
use crate::domain::model::ExperimentPlan;
use crate::domain::ports::ParameterSource;
use crate::utils::error::{DoseError, Result};
use crate::utils::validation::validate_count;
use std::path::PathBuf;

const LINE_NAMES: [&str; 6] = [
    "sample_doses",
    "dose_rate",
    "snr_dose",
    "volume_limit",
    "beam_dimensions",
    "attenuators",
];

#[derive(Debug, Clone)]
pub struct ParameterFile {
    path: PathBuf,
}

impl ParameterFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn read(&self) -> Result<RawParameters> {
        let origin = self.origin();
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| DoseError::input_format(&origin, format!("cannot read file: {}", e)))?;
        parse_parameters(&content, &origin)
    }
}

impl ParameterSource for ParameterFile {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn load_plan(&self) -> Result<ExperimentPlan> {
        self.read()?.into_plan(&self.origin())
    }
}

pub fn parse_parameters(content: &str, origin: &str) -> Result<RawParameters> {
    let mut lines: Vec<&str> = content.lines().collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    if lines.len() != LINE_NAMES.len() {
        return Err(DoseError::input_format(
            origin,
            format!(
                "expected {} lines ({}), found {}",
                LINE_NAMES.len(),
                LINE_NAMES.join(", "),
                lines.len()
            ),
        ));
    }

    let values = lines
        .iter()
        .enumerate()
        .map(|(i, line)| parse_line(line, i + 1, origin))
        .collect::<Result<Vec<_>>>()?;

    let [sample_doses, dose_rate, snr_dose, volume_limit, beam_dimensions, attenuators]: [Vec<f64>; 6] =
        values.try_into().map_err(|_| {
            DoseError::input_format(origin, format!("expected {} lines", LINE_NAMES.len()))
        })?;

    Ok(RawParameters {
        sample_doses,
        dose_rate: scalar(origin, LINE_NAMES[1], &dose_rate)?,
        snr_dose: scalar(origin, LINE_NAMES[2], &snr_dose)?,
        volume_limit: scalar(origin, LINE_NAMES[3], &volume_limit)?,
        illumination: Illumination::Beam(beam_dimensions),
        attenuators,
    })
}

fn scalar(origin: &str, name: &str, values: &[f64]) -> Result<f64> {
    validate_count(origin, name, values, 1, Some(1))?;
    Ok(values[0])
}

fn parse_line(line: &str, line_no: usize, origin: &str) -> Result<Vec<f64>> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<f64>().map_err(|_| {
                DoseError::input_format(
                    origin,
                    format!("line {}: '{}' is not a number", line_no, token),
                )
            })
        })
        .collect()
}
