use crate::domain::model::{DoseTarget, ExperimentParameters, ExperimentPlan};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_all_positive, validate_count, validate_fraction, validate_positive, Validate,
};
use serde::{Deserialize, Serialize};

/// Named default sets. Explicit flags and files override them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// CHESS G1 beamline (Acerbo et al., JSR 2015), 0.321 x 0.303 mm beam, 1 mm cell
    #[default]
    ChessG1,
    /// Original calculator with a fixed 0.125 mm^3 illuminated volume
    Legacy,
}

impl Profile {
    pub fn defaults(self) -> RawParameters {
        match self {
            Profile::ChessG1 => RawParameters {
                sample_doses: vec![100.0, 10.0, 1.0],
                dose_rate: 2300.0,
                snr_dose: 100.0,
                volume_limit: 200.0,
                illumination: Illumination::Beam(vec![0.321, 0.303, 1.0]),
                attenuators: vec![0.1, 0.01],
            },
            Profile::Legacy => RawParameters {
                sample_doses: vec![100.0, 10.0, 1.0],
                dose_rate: 2300.0,
                snr_dose: 100.0,
                volume_limit: 200.0,
                illumination: Illumination::Volume(0.125),
                attenuators: vec![0.1, 0.01],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Illumination {
    /// Beam width, beam height and cell path length in mm.
    Beam(Vec<f64>),
    Volume(f64),
}

impl Illumination {
    fn volume(&self, origin: &str) -> Result<f64> {
        match self {
            Illumination::Beam(dims) => {
                validate_count(origin, "beam_dimensions", dims, 3, Some(3))?;
                validate_all_positive("beam_dimensions", dims)?;
                Ok(dims[0] * dims[1] * dims[2])
            }
            Illumination::Volume(volume) => Ok(*volume),
        }
    }
}

/// Parameters as read from a source, before shape and range checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawParameters {
    pub sample_doses: Vec<f64>,
    pub dose_rate: f64,
    pub snr_dose: f64,
    pub volume_limit: f64,
    pub illumination: Illumination,
    pub attenuators: Vec<f64>,
}

impl RawParameters {
    pub fn into_plan(self, origin: &str) -> Result<ExperimentPlan> {
        validate_count(origin, "sample_doses", &self.sample_doses, 1, None)?;
        validate_count(origin, "attenuators", &self.attenuators, 2, None)?;
        if self.attenuators.len() > 2 {
            tracing::debug!(
                "{}: only the first two attenuators are used, ignoring {:?}",
                origin,
                &self.attenuators[2..]
            );
        }

        let illuminated_volume = self.illumination.volume(origin)?;

        let plan = ExperimentPlan {
            targets: self.sample_doses.into_iter().map(DoseTarget).collect(),
            parameters: ExperimentParameters {
                dose_rate: self.dose_rate,
                snr_dose: self.snr_dose,
                volume_limit: self.volume_limit,
                illuminated_volume,
                attenuator_factors: [self.attenuators[0], self.attenuators[1]],
            },
        };
        plan.validate()?;
        Ok(plan)
    }
}

impl Validate for ExperimentPlan {
    fn validate(&self) -> Result<()> {
        for (i, dose) in self.targets.iter().enumerate() {
            validate_positive(&format!("sample_doses[{}]", i), dose.gray())?;
        }

        let p = &self.parameters;
        validate_positive("dose_rate", p.dose_rate)?;
        validate_positive("snr_dose", p.snr_dose)?;
        validate_positive("volume_limit", p.volume_limit)?;
        validate_positive("illuminated_volume", p.illuminated_volume)?;
        validate_fraction("attenuators[0]", p.attenuator_factors[0])?;
        validate_fraction("attenuators[1]", p.attenuator_factors[1])?;
        Ok(())
    }
}
