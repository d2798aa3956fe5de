use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Measurement failure: {reason}")]
    MeasurementFailure { reason: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Dataset '{dataset}' is malformed: {reason}")]
    DatasetError { dataset: String, reason: String },
}

/// 錯誤分類，用於日誌與退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Measurement,
    Io,
    Configuration,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BenchError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn measurement(reason: impl Into<String>) -> Self {
        Self::MeasurementFailure {
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::Input,
            Self::MeasurementFailure { .. } => ErrorCategory::Measurement,
            Self::IoError(_) => ErrorCategory::Io,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::CsvError(_) | Self::SerializationError(_) | Self::DatasetError { .. } => {
                ErrorCategory::Data
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            // 量測失敗代表 harness 本身有缺陷
            ErrorCategory::Measurement | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => {
                "Check that weights and values have the same length, weights are non-negative integers and capacity is non-negative"
            }
            Self::MeasurementFailure { .. } => {
                "Memory tracking was misused; make sure only one measurement window is active per thread"
            }
            Self::CsvError(_) | Self::DatasetError { .. } => {
                "Make sure the dataset is a CSV file with 'weight' and 'value' columns"
            }
            Self::IoError(_) => "Check that the data directory and output path exist and are writable",
            Self::SerializationError(_) => "Report data could not be serialized; re-run with --verbose",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Review the configuration file or command line arguments",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidInput { reason } => format!("輸入資料無效: {}", reason),
            Self::MeasurementFailure { reason } => format!("量測失敗: {}", reason),
            Self::DatasetError { dataset, reason } => {
                format!("資料集 {} 格式錯誤: {}", dataset, reason)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("設定 {} 無效: {}", field, reason)
            }
            Self::MissingConfigError { field } => format!("缺少必要設定: {}", field),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
