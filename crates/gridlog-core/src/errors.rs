use thiserror::Error;

/// Result type alias using GridLogError
pub type Result<T> = std::result::Result<T, GridLogError>;

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that diagnostics and callers can
/// match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required argument was absent or unusable
    InvalidArgument,
    /// The embedding application's backend callback failed
    BackendInitializationFailure,
    /// Some identity-aware outputs could not re-derive their configuration
    PartialPropagationFailure,
    /// File output could not be opened or written
    Io,
}

impl ErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "ERR_INVALID_ARGUMENT",
            ErrorKind::BackendInitializationFailure => "ERR_BACKEND_INIT",
            ErrorKind::PartialPropagationFailure => "ERR_PARTIAL_PROPAGATION",
            ErrorKind::Io => "ERR_IO",
        }
    }
}

/// One output that failed to adopt a new identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropagationFailure {
    /// Name of the failing output
    pub output: String,
    /// Why re-activation failed
    pub reason: String,
}

impl std::fmt::Display for PropagationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.output, self.reason)
    }
}

/// Error taxonomy for gridlog operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridLogError {
    /// Required argument absent or unusable
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    /// Backend construction failed inside a caller-supplied callback
    #[error("Backend initialization failed: {reason}")]
    BackendInit { reason: String },

    /// Identity reached some outputs but not all of them
    #[error("Identity propagation failed for {} output(s): {}", failed.len(), join_failures(failed))]
    PartialPropagation { failed: Vec<PropagationFailure> },

    /// File output could not be opened or written
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

fn join_failures(failed: &[PropagationFailure]) -> String {
    failed
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl GridLogError {
    /// Create an invalid-argument error
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        GridLogError::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an I/O error for the given path
    pub fn io(path: impl Into<String>, err: &std::io::Error) -> Self {
        GridLogError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            GridLogError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            GridLogError::BackendInit { .. } => ErrorKind::BackendInitializationFailure,
            GridLogError::PartialPropagation { .. } => ErrorKind::PartialPropagationFailure,
            GridLogError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Names of the outputs that failed propagation, empty for other kinds
    pub fn failed_outputs(&self) -> Vec<&str> {
        match self {
            GridLogError::PartialPropagation { failed } => {
                failed.iter().map(|f| f.output.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}
