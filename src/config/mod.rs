pub mod cli;
pub mod param_file;
pub mod profile;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ParameterSource;
#[cfg(feature = "cli")]
use crate::domain::model::ExperimentPlan;
#[cfg(feature = "cli")]
use crate::report::{OutputFormat, DEFAULT_DOSE_FILE};
#[cfg(feature = "cli")]
use crate::utils::error::{DoseError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use param_file::ParameterFile;
#[cfg(feature = "cli")]
use profile::{Illumination, Profile, RawParameters};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use toml_config::TomlProfile;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "dose-flow", version)]
#[command(
    about = "Calculate sample flow rate to deliver specific dose in solution scattering experiments"
)]
pub struct CliConfig {
    /// Space separated list of sample doses in Gy [profile default: 100 10 1]
    #[arg(short = 'a', long = "sampledoses", num_args = 1.., allow_negative_numbers = true)]
    pub sample_doses: Option<Vec<f64>>,

    /// Beam dose rate in Gy/s [profile default: 2300]
    #[arg(short = 'b', long = "doserate", allow_negative_numbers = true)]
    pub dose_rate: Option<f64>,

    /// Dose in Gy required for acceptable signal to noise [profile default: 100]
    #[arg(short = 'c', long = "snr", allow_negative_numbers = true)]
    pub snr_dose: Option<f64>,

    /// Sample volume limit per injection in uL [profile default: 200]
    #[arg(short = 'd', long = "volumelimit", allow_negative_numbers = true)]
    pub volume_limit: Option<f64>,

    /// Beam width, beam height and sample cell path length in mm [profile default: 0.321 0.303 1]
    #[arg(
        short = 'e',
        long = "beamdimensions",
        num_args = 1..,
        allow_negative_numbers = true,
        conflicts_with = "illuminated_volume"
    )]
    pub beam_dimensions: Option<Vec<f64>>,

    /// Illuminated sample volume in mm^3, instead of beam dimensions
    #[arg(long = "illuminated-volume", allow_negative_numbers = true)]
    pub illuminated_volume: Option<f64>,

    /// Two attenuator transmissions as fractions, e.g. 10% = 0.1 [profile default: 0.1 0.01]
    #[arg(short = 'f', long = "attenuators", num_args = 1.., allow_negative_numbers = true)]
    pub attenuators: Option<Vec<f64>>,

    /// Parameter file: six-line text file, or a .toml profile layered over the flags
    #[arg(short = 'i', long = "filename")]
    pub filename: Option<PathBuf>,

    /// Default parameter set
    #[arg(short = 'p', long, value_enum, default_value_t = Profile::ChessG1)]
    pub profile: Profile,

    /// Directory for the dose file
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,

    /// Name of the dose file
    #[arg(long = "output-file", default_value = DEFAULT_DOSE_FILE)]
    pub output_file: String,

    /// Skip writing the dose file
    #[arg(long)]
    pub no_save: bool,

    /// Console output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Profile defaults with every explicit flag applied.
    pub fn raw_parameters(&self) -> RawParameters {
        let mut raw = self.profile.defaults();
        if let Some(doses) = &self.sample_doses {
            raw.sample_doses = doses.clone();
        }
        if let Some(rate) = self.dose_rate {
            raw.dose_rate = rate;
        }
        if let Some(snr) = self.snr_dose {
            raw.snr_dose = snr;
        }
        if let Some(limit) = self.volume_limit {
            raw.volume_limit = limit;
        }
        if let Some(dims) = &self.beam_dimensions {
            raw.illumination = Illumination::Beam(dims.clone());
        }
        if let Some(volume) = self.illuminated_volume {
            raw.illumination = Illumination::Volume(volume);
        }
        if let Some(attenuators) = &self.attenuators {
            raw.attenuators = attenuators.clone();
        }
        raw
    }

    pub fn parameter_source(&self) -> Box<dyn ParameterSource> {
        match &self.filename {
            None => Box::new(self.clone()),
            Some(path) if is_toml(path) => {
                Box::new(TomlProfile::new(path.clone(), self.raw_parameters()))
            }
            Some(path) => Box::new(ParameterFile::new(path.clone())),
        }
    }
}

#[cfg(feature = "cli")]
fn is_toml(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

#[cfg(feature = "cli")]
impl ParameterSource for CliConfig {
    fn origin(&self) -> String {
        "command line".to_string()
    }

    fn load_plan(&self) -> Result<ExperimentPlan> {
        self.raw_parameters().into_plan(&self.origin())
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let name = self.output_file.trim();
        if name.is_empty() || name.contains(['/', '\\', '\0']) {
            return Err(DoseError::ConfigError {
                message: format!(
                    "output file '{}' must be a plain file name; use --output-dir for the location",
                    self.output_file
                ),
            });
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        let mut argv = vec!["dose-flow"];
        argv.extend_from_slice(args);
        CliConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_match_chess_profile() {
        let config = parse(&[]);
        assert_eq!(config.raw_parameters(), Profile::ChessG1.defaults());
        assert_eq!(config.output_file, "dose.txt");
        assert_eq!(config.format, OutputFormat::Table);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_override_profile() {
        let config = parse(&[
            "-a", "50", "5", "0.5", "-b", "1000", "-c", "80", "-d", "150", "-e", "0.2", "0.2",
            "1.5", "-f", "0.2", "0.02",
        ]);
        let raw = config.raw_parameters();
        assert_eq!(raw.sample_doses, vec![50.0, 5.0, 0.5]);
        assert_eq!(raw.dose_rate, 1000.0);
        assert_eq!(raw.snr_dose, 80.0);
        assert_eq!(raw.volume_limit, 150.0);
        assert_eq!(raw.illumination, Illumination::Beam(vec![0.2, 0.2, 1.5]));
        assert_eq!(raw.attenuators, vec![0.2, 0.02]);
    }

    #[test]
    fn test_long_flags_and_legacy_profile() {
        let config = parse(&["--profile", "legacy", "--sampledoses", "20", "--doserate", "500"]);
        let plan = config.load_plan().unwrap();
        assert_eq!(plan.parameters.illuminated_volume, 0.125);
        assert_eq!(plan.parameters.dose_rate, 500.0);
        assert_eq!(plan.targets.len(), 1);
    }

    #[test]
    fn test_negative_values_reach_validation() {
        let config = parse(&["-b", "-2300"]);
        assert!(matches!(
            config.load_plan().unwrap_err(),
            DoseError::InvalidPhysicalParameter { .. }
        ));
    }

    #[test]
    fn test_non_numeric_flag_is_a_parse_error() {
        assert!(CliConfig::try_parse_from(["dose-flow", "-b", "fast"]).is_err());
    }

    #[test]
    fn test_beam_and_volume_conflict() {
        let result = CliConfig::try_parse_from([
            "dose-flow",
            "-e",
            "0.3",
            "0.3",
            "1",
            "--illuminated-volume",
            "0.1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_source_selection() {
        assert_eq!(parse(&[]).parameter_source().origin(), "command line");
        assert_eq!(
            parse(&["-i", "params.txt"]).parameter_source().origin(),
            "params.txt"
        );
        assert_eq!(
            parse(&["-i", "beamline.TOML"]).parameter_source().origin(),
            "beamline.TOML"
        );
    }

    #[test]
    fn test_output_file_must_be_plain_name() {
        assert!(parse(&["--output-file", "runs/dose.txt"]).validate().is_err());
        assert!(parse(&["--output-file", ""]).validate().is_err());
    }
}
