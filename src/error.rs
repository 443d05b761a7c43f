use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastReportError {
    #[error("Failed to fetch product data: {0}")]
    FetchFailed(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("No active session")]
    NotAuthenticated,

    #[error("Invalid page size {0}: must be greater than zero")]
    InvalidPageSize(usize),

    #[error("Invalid minimum weeks per month {0}: must be between 1 and 5")]
    InvalidMinimumWeeks(u32),

    #[error("Invalid top-N value {0}: must be greater than zero")]
    InvalidTopN(usize),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ForecastReportError>;
