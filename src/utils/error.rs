use thiserror::Error;

#[derive(Error, Debug)]
pub enum CapacityError {
    #[error("Data source '{source_name}' unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    #[error("Report archive failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration field '{field}' is invalid: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid date input: {message}")]
    InvalidDateInput { message: String },
}

/// 錯誤類別，供 CLI 記錄用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    DataSource,
    Output,
    Configuration,
    Input,
}

/// 錯誤嚴重程度，決定 CLI 退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CapacityError {
    pub fn source_unavailable(source_name: &str, reason: impl std::fmt::Display) -> Self {
        CapacityError::SourceUnavailable {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CapacityError::SourceUnavailable { .. } => ErrorCategory::DataSource,
            CapacityError::ZipError(_)
            | CapacityError::IoError(_)
            | CapacityError::SerializationError(_) => ErrorCategory::Output,
            CapacityError::ConfigError { .. }
            | CapacityError::ConfigValidationError { .. }
            | CapacityError::MissingConfigError { .. }
            | CapacityError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CapacityError::InvalidDateInput { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::DataSource => ErrorSeverity::Critical,
            ErrorCategory::Output => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
        }
    }

    /// Source failures abort the run; nothing else reaches the caller mid-report.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CapacityError::SourceUnavailable { .. })
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CapacityError::SourceUnavailable { .. } => {
                "Check that the data source is reachable and returns well-formed rows, then rerun the report"
            }
            CapacityError::ZipError(_) | CapacityError::IoError(_) => {
                "Check that the output path exists and is writable"
            }
            CapacityError::SerializationError(_) => "Rerun with --verbose and report the failing payload",
            CapacityError::ConfigError { .. }
            | CapacityError::ConfigValidationError { .. }
            | CapacityError::MissingConfigError { .. }
            | CapacityError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line flags"
            }
            CapacityError::InvalidDateInput { .. } => "Use YYYY-MM-DD dates and a window of at least one day",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CapacityError::SourceUnavailable { source_name, .. } => {
                format!("Could not load {} data; no report was produced", source_name)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CapacityError>;
