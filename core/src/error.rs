//! Error taxonomy for the PAGESIM client
//!
//! Errors are split by where they originate: the form (`InputError`), the
//! computation service (`ServiceError`) and configuration (`ConfigError`).
//! `ErrorKind` classifies them for the single user-visible status slot.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use thiserror::Error;

/// Result alias for computation service calls
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// How an error is surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input or business-rule problem; recoverable by editing and resubmitting
    Validation,

    /// The service could not be reached or answered with something unusable
    Connectivity,
}

/// Form validation failures detected before any request is made
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Please select at least one algorithm")]
    NoAlgorithmSelected,

    #[error("Please enter a reference string")]
    EmptyReferenceString,
}

/// Failures talking to the computation service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service answered with an `error` field
    #[error("{0}")]
    Rejected(String),

    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded
    #[error("malformed response: {0}")]
    Decode(String),

    /// Non-success status without a usable error body
    #[error("unexpected status {0}")]
    Status(u16),

    /// The worker running the request did not complete
    #[error("request task failed: {0}")]
    Task(String),
}

impl ServiceError {
    /// Classify for display
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Rejected(_) => ErrorKind::Validation,
            Self::Transport(_) | Self::Decode(_) | Self::Status(_) | Self::Task(_) => {
                ErrorKind::Connectivity
            }
        }
    }
}

impl From<ureq::Error> for ServiceError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => Self::Status(code),
            ureq::Error::Transport(transport) => Self::Transport(transport.to_string()),
        }
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_kinds() {
        assert_eq!(ServiceError::Rejected("bad".into()).kind(), ErrorKind::Validation);
        assert_eq!(ServiceError::Transport("refused".into()).kind(), ErrorKind::Connectivity);
        assert_eq!(ServiceError::Decode("eof".into()).kind(), ErrorKind::Connectivity);
        assert_eq!(ServiceError::Status(502).kind(), ErrorKind::Connectivity);
        assert_eq!(ServiceError::Task("cancelled".into()).kind(), ErrorKind::Connectivity);
    }

    #[test]
    fn test_input_error_messages() {
        assert_eq!(
            InputError::NoAlgorithmSelected.to_string(),
            "Please select at least one algorithm"
        );
        assert_eq!(
            InputError::EmptyReferenceString.to_string(),
            "Please enter a reference string"
        );
    }

    #[test]
    fn test_rejected_shows_backend_message_verbatim() {
        let err = ServiceError::Rejected("Frames must be >= 1".into());
        assert_eq!(err.to_string(), "Frames must be >= 1");
    }
}
