use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Import error at line {line}: {message}")]
    ImportError { line: u64, message: String },

    #[error("Store rejected {operation} of '{product}': {message}")]
    StoreError {
        operation: String,
        product: String,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Format,
    Configuration,
    Validation,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl OrderError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) => ErrorCategory::Io,
            Self::CsvError(_) | Self::SerializationError(_) | Self::ImportError { .. } => {
                ErrorCategory::Format
            }
            Self::TomlError(_)
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::ValidationError { .. } => ErrorCategory::Validation,
            Self::StoreError { .. } => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Format | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            // 部分套用的對帳可以重跑
            ErrorCategory::Storage => ErrorSeverity::Medium,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::IoError(_) => "Check that the file exists and is readable/writable",
            Self::CsvError(_) | Self::ImportError { .. } => {
                "Each imported row must look like LINE;<product>;<count>"
            }
            Self::SerializationError(_) => "Check that the order file is valid JSON",
            Self::TomlError(_)
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => "Fix the configuration file and retry",
            Self::ValidationError { .. } => "Correct the submitted line items and retry",
            Self::StoreError { .. } => {
                "Re-run the reconciliation; lines already applied produce no operations"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("Could not access a file: {}", e),
            Self::ValidationError { message } => format!("Invalid input: {}", message),
            Self::ImportError { line, message } => {
                format!("Could not read line {} of the import file: {}", line, message)
            }
            Self::StoreError { operation, product, .. } => format!(
                "Saving the order failed while trying to {} '{}'",
                operation, product
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OrderError>;
