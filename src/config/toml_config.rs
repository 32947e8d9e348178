use crate::config::profile::{Illumination, RawParameters};
use crate::domain::model::ExperimentPlan;
use crate::domain::ports::ParameterSource;
use crate::utils::error::{DoseError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Parameter profile in TOML. Keys left out keep the command line values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlParameters {
    pub sample_doses: Option<Vec<f64>>,
    pub dose_rate: Option<f64>,
    pub snr_dose: Option<f64>,
    pub volume_limit: Option<f64>,
    pub beam_dimensions: Option<Vec<f64>>,
    pub illuminated_volume: Option<f64>,
    pub attenuators: Option<Vec<f64>>,
}

impl TomlParameters {
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let parsed: Self = toml::from_str(&processed_content).map_err(|e| {
            DoseError::input_format(origin, format!("TOML parsing error: {}", e))
        })?;

        if parsed.beam_dimensions.is_some() && parsed.illuminated_volume.is_some() {
            return Err(DoseError::input_format(
                origin,
                "set either beam_dimensions or illuminated_volume, not both",
            ));
        }
        Ok(parsed)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DoseError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn apply(self, mut base: RawParameters) -> RawParameters {
        if let Some(doses) = self.sample_doses {
            base.sample_doses = doses;
        }
        if let Some(rate) = self.dose_rate {
            base.dose_rate = rate;
        }
        if let Some(snr) = self.snr_dose {
            base.snr_dose = snr;
        }
        if let Some(limit) = self.volume_limit {
            base.volume_limit = limit;
        }
        if let Some(dims) = self.beam_dimensions {
            base.illumination = Illumination::Beam(dims);
        }
        if let Some(volume) = self.illuminated_volume {
            base.illumination = Illumination::Volume(volume);
        }
        if let Some(attenuators) = self.attenuators {
            base.attenuators = attenuators;
        }
        base
    }
}

/// A TOML file layered over the parameters resolved from the command line.
#[derive(Debug, Clone)]
pub struct TomlProfile {
    path: PathBuf,
    base: RawParameters,
}

impl TomlProfile {
    pub fn new(path: impl Into<PathBuf>, base: RawParameters) -> Self {
        Self {
            path: path.into(),
            base,
        }
    }

    pub fn read(&self) -> Result<TomlParameters> {
        let origin = self.origin();
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| DoseError::input_format(&origin, format!("cannot read file: {}", e)))?;
        TomlParameters::from_toml_str(&content, &origin)
    }
}

impl ParameterSource for TomlProfile {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn load_plan(&self) -> Result<ExperimentPlan> {
        let overrides = self.read()?;
        tracing::debug!("TOML overrides from {}: {:?}", self.origin(), overrides);
        overrides.apply(self.base.clone()).into_plan(&self.origin())
    }
}
