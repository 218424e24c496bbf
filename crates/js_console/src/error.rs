//! Console error types.

use thiserror::Error;

/// Errors surfaced by the console bridge itself.
///
/// Script failures (syntax errors, uncaught exceptions) are not errors at this
/// level; they are rendered into the message log instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("Message index {index} out of range (log length {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;

impl ConsoleError {
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        Self::protocol(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConsoleError::OutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "Message index 4 out of range (log length 2)");
        assert_eq!(ConsoleError::engine("no realm").to_string(), "Engine error: no realm");
    }

    #[test]
    fn test_from_json_error() {
        let err: ConsoleError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ConsoleError::Protocol(_)));
        assert!(err.to_string().starts_with("Protocol error: expected value"));
    }
}
