//! Error types.
//!
//! - [`PsignifitError`] is the domain error returned by the library. Every invalid
//!   option ends up as [`PsignifitError::Configuration`] with a readable message.
//! - [`AppError`] is what the `psig` binary reports: a message plus a process exit code.

use thiserror::Error;

/// Domain error for sigmoid construction and configuration handling.
#[derive(Debug, Error)]
pub enum PsignifitError {
    /// An option is malformed, out of range, or contradicts another option.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A configuration mapping could not be (de)serialized.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Reading or writing a configuration file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl PsignifitError {
    pub fn config(message: impl Into<String>) -> Self {
        PsignifitError::Configuration(message.into())
    }

    /// True for the fatal validation kind (as opposed to I/O or JSON plumbing).
    pub fn is_configuration(&self) -> bool {
        matches!(self, PsignifitError::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, PsignifitError>;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<PsignifitError> for AppError {
    fn from(err: PsignifitError) -> Self {
        let exit_code = match err {
            PsignifitError::Io(_) => 3,
            PsignifitError::Configuration(_) | PsignifitError::Json(_) => 2,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
