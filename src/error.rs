//! Error type shared by the library and the `gsv` binary.
//!
//! Exit codes follow one convention across the crate:
//! - `2`: bad input, configuration, or file I/O
//! - `3`: no usable data (empty input, insufficient training points)
//! - `4`: numeric/internal failures

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GsvError {
    /// A required column is absent from the input table.
    #[error("Missing required column: `{field}`")]
    MissingColumn { field: String },

    /// Nothing is left after dropping non-positive prices.
    #[error("No rows with a positive `{field}` value remain.")]
    EmptyInput { field: String },

    /// Too few points to fit or evaluate the trend.
    #[error("Insufficient training data: {0}")]
    InsufficientData(String),

    /// Valuation or plotting requested on a fit that holds no data.
    #[error("Model is not fitted: {0}")]
    NotFitted(String),

    /// A metric could not be computed without dividing by zero or leaving its domain.
    #[error("Computation error: {0}")]
    Computation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl GsvError {
    pub fn exit_code(&self) -> u8 {
        match self {
            GsvError::MissingColumn { .. }
            | GsvError::InvalidConfig(_)
            | GsvError::Io(_)
            | GsvError::Parse(_) => 2,
            GsvError::EmptyInput { .. } | GsvError::InsufficientData(_) | GsvError::NotFitted(_) => 3,
            GsvError::Computation(_) | GsvError::Render(_) => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, GsvError>;
