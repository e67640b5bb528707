//! Error types for schemabridge

use std::fmt;

/// Result type alias for schemabridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for schemabridge
#[derive(Debug)]
pub enum Error {
    /// Declared type has no tag or field mapping
    UnsupportedType { column: String, declared: String, role: &'static str },
    /// A stream model declared no sharding key
    EmptyEntityKeys { model: String },
    /// Two columns share the same sharding key index
    DuplicateShardingKey { idx: u32, first: String, second: String },
    /// Two columns share the same storage name
    DuplicateColumn { model: String, column: String },
    /// Measure declared without a usable downsampling interval
    UnsupportedDownsampling { model: String },
    /// Structurally invalid model definition
    InvalidModel(String),
    /// Configuration errors
    Config(String),
    /// Error reported by the storage engine
    Remote(RemoteError),
    /// Serialization errors
    Serialization(String),
    /// IO errors
    Io(std::io::Error),
}

/// Status codes reported by the storage engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    NotFound,
    AlreadyExists,
    InvalidArgument,
    Unavailable,
    DeadlineExceeded,
    Internal,
}

impl StatusCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::NotFound => "NOT_FOUND",
            StatusCode::AlreadyExists => "ALREADY_EXISTS",
            StatusCode::InvalidArgument => "INVALID_ARGUMENT",
            StatusCode::Unavailable => "UNAVAILABLE",
            StatusCode::DeadlineExceeded => "DEADLINE_EXCEEDED",
            StatusCode::Internal => "INTERNAL",
        }
    }
}

/// A failed call against the storage engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub code: StatusCode,
    pub message: String,
}

impl RemoteError {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NotFound, message)
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl Error {
    /// True for model or deployment misconfiguration. These are fatal for
    /// the model and must not be retried.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedType { .. }
                | Error::EmptyEntityKeys { .. }
                | Error::DuplicateShardingKey { .. }
                | Error::DuplicateColumn { .. }
                | Error::UnsupportedDownsampling { .. }
                | Error::InvalidModel(_)
                | Error::Config(_)
        )
    }

    /// True when the storage engine reported that the object does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Remote(e) if e.code == StatusCode::NotFound)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedType {
                column,
                declared,
                role,
            } => write!(
                f,
                "Unsupported type: {} of column {} is not supported for {}",
                declared, column, role
            ),
            Error::EmptyEntityKeys { model } => write!(
                f,
                "Illegal state: sharding keys of model[stream.{}] must not be empty",
                model
            ),
            Error::DuplicateShardingKey { idx, first, second } => write!(
                f,
                "Duplicate sharding key index {}: columns {} and {}",
                idx, first, second
            ),
            Error::DuplicateColumn { model, column } => {
                write!(f, "Duplicate column {} in model {}", column, model)
            }
            Error::UnsupportedDownsampling { model } => write!(
                f,
                "Unsupported downsampling interval for measure {}",
                model
            ),
            Error::InvalidModel(msg) => write!(f, "Invalid model: {}", msg),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Remote(e) => write!(f, "Remote error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Error::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl From<RemoteError> for Error {
    fn from(e: RemoteError) -> Self {
        Error::Remote(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
