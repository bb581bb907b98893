//! Error types for trajkit

use std::fmt;

/// Result type for trajkit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in trajkit operations
#[derive(Debug)]
pub enum Error {
    /// Malformed or unsupported CRS, skill method or gridding parameters
    Configuration(String),

    /// Geodesic operation requested on data without georeferencing
    UndefinedOperation(String),

    /// Dimensional precondition violated
    Shape(String),

    /// PROJ failed to build a transform
    Projection(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            Error::UndefinedOperation(msg) => write!(f, "Undefined operation: {}", msg),
            Error::Shape(msg) => write!(f, "Shape error: {}", msg),
            Error::Projection(msg) => write!(f, "Projection error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<ndarray::ShapeError> for Error {
    fn from(error: ndarray::ShapeError) -> Self {
        Error::Shape(error.to_string())
    }
}
