use thiserror::Error;

#[derive(Error, Debug)]
pub enum PopuvizError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Insight provider returned status {status}: {message}")]
    InsightProviderError { status: u16, message: String },

    #[error("Malformed insight response: {message}")]
    InsightResponseError { message: String },

    #[error("Export failed: {message}")]
    ExportError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PopuvizError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PopuvizError::ConfigValidationError { .. }
            | PopuvizError::InvalidConfigValueError { .. }
            | PopuvizError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PopuvizError::ApiError(_) | PopuvizError::InsightProviderError { .. } => {
                ErrorCategory::Network
            }
            PopuvizError::CsvError(_)
            | PopuvizError::SerializationError(_)
            | PopuvizError::ExportError { .. }
            | PopuvizError::InsightResponseError { .. } => ErrorCategory::Data,
            PopuvizError::IoError(_) | PopuvizError::ZipError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Insight failures are always recovered with the static fallback.
            PopuvizError::InsightResponseError { .. } => ErrorSeverity::Low,
            PopuvizError::ApiError(_) | PopuvizError::InsightProviderError { .. } => {
                ErrorSeverity::Medium
            }
            PopuvizError::ConfigValidationError { .. }
            | PopuvizError::InvalidConfigValueError { .. }
            | PopuvizError::MissingConfigError { .. }
            | PopuvizError::CsvError(_)
            | PopuvizError::SerializationError(_)
            | PopuvizError::ExportError { .. } => ErrorSeverity::High,
            PopuvizError::IoError(_) | PopuvizError::ZipError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PopuvizError::ConfigValidationError { field, .. } => {
                format!("Check the '{}' entry of your TOML configuration", field)
            }
            PopuvizError::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            PopuvizError::MissingConfigError { field } => {
                format!("Set '{}' in the config file or environment", field)
            }
            PopuvizError::ApiError(_) | PopuvizError::InsightProviderError { .. } => {
                "Check network access and the insight endpoint, or run with --offline".to_string()
            }
            PopuvizError::InsightResponseError { .. } => {
                "The provider answered with unexpected content; the static insight is used instead"
                    .to_string()
            }
            PopuvizError::CsvError(_)
            | PopuvizError::SerializationError(_)
            | PopuvizError::ExportError { .. } => {
                "Retry the export; if it persists, report the failing year and archetype"
                    .to_string()
            }
            PopuvizError::IoError(_) | PopuvizError::ZipError(_) => {
                "Check that the output path exists and is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Could not reach the insight service: {}", self),
            ErrorCategory::Data => format!("Unexpected data: {}", self),
            ErrorCategory::System => format!("System error while writing output: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, PopuvizError>;
