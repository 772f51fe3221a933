//! Error types for the Neuro-Architect system.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid parameter {name}: {value} is outside [0, 100]")]
    InvalidParameter { name: &'static str, value: i64 },

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Unknown scenario preset: {0}")]
    UnknownScenario(String),
}

pub type Result<T> = std::result::Result<T, Error>;

