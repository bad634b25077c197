use std::fmt;

/// Result type for DPG operations
pub type Result<T> = std::result::Result<T, DpgError>;

/// Main error type for the DPG optimizer
#[derive(Debug, Clone)]
pub enum DpgError {
    /// Invalid dimensions for operations
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// IO errors (configuration files)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),

    /// Numerical computation errors
    NumericalError(String),

    /// Failure reported by a caller-supplied collaborator
    Collaborator(String),
}

impl fmt::Display for DpgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DpgError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            DpgError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            DpgError::IoError(msg) => write!(f, "IO error: {}", msg),
            DpgError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            DpgError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            DpgError::Collaborator(msg) => write!(f, "Collaborator error: {}", msg),
        }
    }
}

impl std::error::Error for DpgError {}

// Conversion from std::io::Error
impl From<std::io::Error> for DpgError {
    fn from(err: std::io::Error) -> Self {
        DpgError::IoError(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for DpgError {
    fn from(err: serde_json::Error) -> Self {
        DpgError::SerializationError(err.to_string())
    }
}

// Helper functions for common error patterns
impl DpgError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        DpgError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        DpgError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Fails with `DimensionMismatch` unless `actual == expected`.
    pub fn check_len(what: &str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(DpgError::dimension_mismatch(
                format!("{} of length {}", what, expected),
                format!("length {}", actual),
            ))
        }
    }
}
