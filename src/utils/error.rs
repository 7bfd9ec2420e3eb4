use thiserror::Error;

/// 建立員工輸入的驗證失敗種類，依規則順序只回報第一個
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("Invalid or missing name")]
    MissingOrInvalidName,

    #[error("Invalid or missing salary")]
    MissingOrInvalidSalary,

    #[error("Salary cannot be less than zero")]
    SalaryBelowMinimum,

    #[error("Invalid or missing age")]
    MissingOrInvalidAge,

    #[error("Age cannot be less than 16")]
    AgeBelowMinimum,

    #[error("Age cannot be more than 75")]
    AgeAboveMaximum,

    #[error("Invalid or missing Title")]
    MissingOrInvalidTitle,
}

impl ValidationFailure {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationFailure::MissingOrInvalidName => "E004",
            ValidationFailure::MissingOrInvalidSalary => "E005",
            ValidationFailure::SalaryBelowMinimum => "E006",
            ValidationFailure::MissingOrInvalidAge => "E007",
            ValidationFailure::AgeBelowMinimum => "E008",
            ValidationFailure::AgeAboveMaximum => "E009",
            ValidationFailure::MissingOrInvalidTitle => "E011",
        }
    }
}

/// 上游員工 API 呼叫失敗，一律視為「上游不可用」
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API request failed with status: {0}")]
    Status(reqwest::StatusCode),

    #[error("Failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum FacadeError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("Error while making a Rest API call")]
    UpstreamUnavailable,

    #[error("No Employees found")]
    NoDataFound,

    #[error("No Employees present for the given name")]
    NoMatchingName,

    #[error("Id cannot be null")]
    MissingIdentifier,

    #[error("Failed to get response")]
    UpstreamRetryExhausted,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Upstream,
    Internal,
}

impl FacadeError {
    /// 錯誤分類表中的穩定代碼；不在分類表內的錯誤回傳 None
    pub fn code(&self) -> Option<&'static str> {
        match self {
            FacadeError::Validation(failure) => Some(failure.code()),
            FacadeError::UpstreamUnavailable => Some("E001"),
            FacadeError::NoDataFound => Some("E002"),
            FacadeError::NoMatchingName => Some("E003"),
            FacadeError::MissingIdentifier => Some("E010"),
            FacadeError::UpstreamRetryExhausted => Some("E012"),
            FacadeError::ConfigError { .. }
            | FacadeError::InvalidConfigValueError { .. }
            | FacadeError::IoError(_)
            | FacadeError::Unexpected { .. } => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            FacadeError::Validation(_) | FacadeError::MissingIdentifier => {
                ErrorCategory::Validation
            }
            FacadeError::NoDataFound | FacadeError::NoMatchingName => ErrorCategory::NotFound,
            FacadeError::UpstreamUnavailable | FacadeError::UpstreamRetryExhausted => {
                ErrorCategory::Upstream
            }
            _ => ErrorCategory::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, FacadeError>;
