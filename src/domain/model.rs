use serde::{Deserialize, Serialize};
use std::fmt;

/// A single requested sample dose in Gy.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoseTarget(pub f64);

impl DoseTarget {
    pub fn gray(self) -> f64 {
        self.0
    }
}

/// Beam and cell settings shared by every dose of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperimentParameters {
    /// Gy/s delivered by the unattenuated beam.
    pub dose_rate: f64,
    /// Cumulative dose (Gy) needed for acceptable signal to noise.
    pub snr_dose: f64,
    /// Sample volume ceiling per injection (uL).
    pub volume_limit: f64,
    /// Beam width x height x cell path length (mm^3, equivalently uL).
    pub illuminated_volume: f64,
    /// Transmission of the first and second attenuator stages.
    pub attenuator_factors: [f64; 2],
}

/// Number of attenuation stages engaged for a dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum AttenuatorTier {
    Open,
    First,
    Second,
}

impl AttenuatorTier {
    pub fn index(self) -> u8 {
        match self {
            AttenuatorTier::Open => 0,
            AttenuatorTier::First => 1,
            AttenuatorTier::Second => 2,
        }
    }

    /// Transmission applied to the base dose rate. Tiers do not compound.
    pub fn transmission(self, params: &ExperimentParameters) -> Option<f64> {
        match self {
            AttenuatorTier::Open => None,
            AttenuatorTier::First => Some(params.attenuator_factors[0]),
            AttenuatorTier::Second => Some(params.attenuator_factors[1]),
        }
    }

    pub fn next(self) -> Option<AttenuatorTier> {
        match self {
            AttenuatorTier::Open => Some(AttenuatorTier::First),
            AttenuatorTier::First => Some(AttenuatorTier::Second),
            AttenuatorTier::Second => None,
        }
    }
}

impl From<AttenuatorTier> for u8 {
    fn from(tier: AttenuatorTier) -> Self {
        tier.index()
    }
}

impl TryFrom<u8> for AttenuatorTier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AttenuatorTier::Open),
            1 => Ok(AttenuatorTier::First),
            2 => Ok(AttenuatorTier::Second),
            other => Err(format!("attenuator tier must be 0, 1 or 2, got {}", other)),
        }
    }
}

impl fmt::Display for AttenuatorTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoseResult {
    pub flow_rate: f64,
    pub exposure_time: f64,
    pub sample_volume: f64,
    pub attenuator_tier: AttenuatorTier,
}

impl DoseResult {
    pub fn exceeds(&self, volume_limit: f64) -> bool {
        self.sample_volume > volume_limit
    }

    /// False when an intermediate product overflowed or underflowed to inf/NaN.
    pub fn is_finite(&self) -> bool {
        self.flow_rate.is_finite()
            && self.exposure_time.is_finite()
            && self.sample_volume.is_finite()
    }
}

/// Validated input for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentPlan {
    pub targets: Vec<DoseTarget>,
    pub parameters: ExperimentParameters,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DoseRow {
    pub dose: DoseTarget,
    #[serde(flatten)]
    pub result: DoseResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub snr_dose: f64,
    pub volume_limit: f64,
    pub total_sample_volume: f64,
    pub total_time: f64,
    /// Rows still above the volume limit with both attenuators engaged.
    pub over_limit: usize,
}

impl RunSummary {
    // Integer casts truncate toward zero, matching the historical report.
    pub fn snr_dose_truncated(&self) -> i64 {
        self.snr_dose as i64
    }

    pub fn volume_limit_truncated(&self) -> i64 {
        self.volume_limit as i64
    }

    pub fn total_sample_volume_truncated(&self) -> i64 {
        self.total_sample_volume as i64
    }

    pub fn total_time_truncated(&self) -> i64 {
        self.total_time as i64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoseReport {
    pub parameters: ExperimentParameters,
    pub rows: Vec<DoseRow>,
    pub summary: RunSummary,
}
