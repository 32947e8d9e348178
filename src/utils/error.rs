use thiserror::Error;

#[derive(Error, Debug)]
pub enum DoseError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV writing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Input format error in {origin}: {message}")]
    InputFormatError { origin: String, message: String },

    #[error("Invalid physical parameter '{field}' = {value}: {reason}")]
    InvalidPhysicalParameter {
        field: String,
        value: f64,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Physical,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Bad values supplied by the user, fixable by editing the input.
    High,
    /// Malformed input or an environment failure.
    Critical,
}

impl DoseError {
    pub fn input_format(origin: impl Into<String>, message: impl Into<String>) -> Self {
        DoseError::InputFormatError {
            origin: origin.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DoseError::InputFormatError { .. } => ErrorCategory::Input,
            DoseError::InvalidPhysicalParameter { .. } => ErrorCategory::Physical,
            DoseError::ConfigError { .. } => ErrorCategory::Configuration,
            DoseError::IoError(_) | DoseError::CsvError(_) | DoseError::SerializationError(_) => {
                ErrorCategory::Output
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Physical | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Input | ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    /// Process exit code; input format errors share clap's usage code.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Input => 2,
            ErrorCategory::Physical | ErrorCategory::Configuration => 1,
            ErrorCategory::Output => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DoseError::InputFormatError { origin, message } => {
                format!("Could not read parameters from {}: {}", origin, message)
            }
            DoseError::InvalidPhysicalParameter {
                field,
                value,
                reason,
            } => format!("Parameter '{}' has an unusable value {}: {}", field, value, reason),
            DoseError::ConfigError { message } => format!("Configuration problem: {}", message),
            DoseError::IoError(e) => format!("File system error: {}", e),
            DoseError::CsvError(e) => format!("Could not write the dose file: {}", e),
            DoseError::SerializationError(e) => format!("Could not render JSON output: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => {
                "Parameter files need six lines: doses, dose rate, SNR dose, volume limit, beam dimensions, attenuators"
            }
            ErrorCategory::Physical => {
                "Doses, rates, volumes and beam dimensions must be positive; attenuator factors must lie between 0 and 1"
            }
            ErrorCategory::Configuration => "Check the command line options and the selected profile",
            ErrorCategory::Output => "Check that the output directory exists and is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, DoseError>;
