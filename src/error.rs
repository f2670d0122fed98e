#[cfg(feature = "python")]
use pyo3::exceptions::{PyRuntimeError, PyValueError};
#[cfg(feature = "python")]
use pyo3::PyErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelkitError {
    #[error("Load error: {0}")]
    Load(String),

    #[error("Invalid range: start {start} > end {end} for trajectory of {len} points")]
    InvalidRange { start: i64, end: i64, len: usize },

    #[error("Persistence schema mismatch: {0}")]
    PersistenceSchema(String),

    #[error("Invalid label: {0}")]
    LabelValidation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No trajectory loaded")]
    NotLoaded,

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LabelkitError {
    /// Whether the interaction can simply be retried with different input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LabelkitError::InvalidRange { .. } | LabelkitError::LabelValidation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LabelkitError>;

#[cfg(feature = "python")]
impl From<LabelkitError> for PyErr {
    fn from(err: LabelkitError) -> PyErr {
        if err.is_recoverable() {
            PyValueError::new_err(err.to_string())
        } else {
            PyRuntimeError::new_err(err.to_string())
        }
    }
}
