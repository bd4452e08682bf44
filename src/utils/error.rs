use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Workbook read error: {0}")]
    WorkbookError(#[from] calamine::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Excel export failed: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Unsupported file format: {path}")]
    UnsupportedFormatError { path: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Processing,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SearchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SearchError::ConfigError { .. }
            | SearchError::InvalidConfigValueError { .. }
            | SearchError::MissingConfigError { .. }
            | SearchError::TomlError(_) => ErrorCategory::Configuration,
            SearchError::CsvError(_)
            | SearchError::WorkbookError(_)
            | SearchError::UnsupportedFormatError { .. } => ErrorCategory::Input,
            SearchError::ProcessingError { .. } => ErrorCategory::Processing,
            SearchError::SerializationError(_)
            | SearchError::ZipError(_)
            | SearchError::XlsxError(_) => ErrorCategory::Output,
            SearchError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單一檔案讀取失敗不影響其他檔案
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Processing | ErrorCategory::Output => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SearchError::ConfigError { .. } | SearchError::MissingConfigError { .. } => {
                "Check the command line flags and the TOML configuration file"
            }
            SearchError::InvalidConfigValueError { .. } => {
                "Correct the reported value and run the search again"
            }
            SearchError::TomlError(_) => "Make sure the configuration file is valid TOML",
            SearchError::CsvError(_) => {
                "Re-save the file as UTF-8 CSV or check it for broken rows"
            }
            SearchError::WorkbookError(_) => {
                "Open the workbook in a spreadsheet program and save it as .xlsx"
            }
            SearchError::UnsupportedFormatError { .. } => {
                "Only .csv, .xls, .xlsx, .et and .ods files can be searched"
            }
            SearchError::SerializationError(_)
            | SearchError::ZipError(_)
            | SearchError::XlsxError(_) => {
                "Try a different export format"
            }
            SearchError::ProcessingError { .. } => "Run again with --verbose and inspect the log",
            SearchError::IoError(_) => "Check that the paths exist and are readable/writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SearchError::IoError(e) => format!("File system error: {}", e),
            SearchError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            SearchError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            other => other.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
