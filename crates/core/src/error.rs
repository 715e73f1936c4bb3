use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvSafeError {
    /// Training or trend analysis was called without any historical records.
    #[error("No historical data provided")]
    EmptyHistory,

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, EnvSafeError>;
