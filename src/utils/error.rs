use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Source fetch failed: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Parse error in {file}: {message}")]
    ParseError { file: String, message: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Source,
    Scan,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScanError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScanError::ConfigValidationError { .. }
            | ScanError::InvalidConfigValueError { .. }
            | ScanError::MissingConfigError { .. } => ErrorCategory::Config,
            ScanError::IoError(_) | ScanError::FetchError(_) => ErrorCategory::Source,
            ScanError::ParseError { .. } | ScanError::ProcessingError { .. } => ErrorCategory::Scan,
            ScanError::CsvError(_) | ScanError::ZipError(_) | ScanError::SerializationError(_) => {
                ErrorCategory::Output
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ScanError::ConfigValidationError { .. }
            | ScanError::InvalidConfigValueError { .. }
            | ScanError::MissingConfigError { .. } => ErrorSeverity::Critical,
            ScanError::FetchError(_) | ScanError::ProcessingError { .. } => ErrorSeverity::Medium,
            ScanError::IoError(_)
            | ScanError::ParseError { .. }
            | ScanError::CsvError(_)
            | ScanError::ZipError(_)
            | ScanError::SerializationError(_) => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ScanError::IoError(_) => {
                "Check that the source files exist and are readable".to_string()
            }
            ScanError::FetchError(_) | ScanError::ProcessingError { .. } => {
                "Check the remote endpoint and network connectivity, then retry".to_string()
            }
            ScanError::ConfigValidationError { field, .. }
            | ScanError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting and run again", field)
            }
            ScanError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            ScanError::ParseError { file, .. } => {
                format!("Inspect '{}' for unsupported constructs", file)
            }
            ScanError::CsvError(_) | ScanError::ZipError(_) | ScanError::SerializationError(_) => {
                "Check that the output directory is writable and has free space".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ScanError::IoError(e) => format!("Cannot read a source file: {}", e),
            ScanError::FetchError(_) => "The remote source could not be fetched".to_string(),
            ScanError::ConfigValidationError { field, message } => {
                format!("Configuration problem ({}): {}", field, message)
            }
            ScanError::InvalidConfigValueError { field, value, .. } => {
                format!("'{}' is not a valid value for {}", value, field)
            }
            ScanError::MissingConfigError { field } => {
                format!("Required setting '{}' was not provided", field)
            }
            other => other.to_string(),
        }
    }
}
