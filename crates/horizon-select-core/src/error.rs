//! Error types for Horizon Select core systems.

use std::fmt;

/// The main error type for core system operations.
#[derive(Debug)]
pub enum CoreError {
    /// Timer-related error.
    Timer(TimerError),
    /// Completion-related error.
    Completion(CompletionError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timer(err) => write!(f, "Timer error: {err}"),
            Self::Completion(err) => write!(f, "Completion error: {err}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timer(err) => Some(err),
            Self::Completion(err) => Some(err),
        }
    }
}

/// Timer-specific errors.
#[derive(Debug)]
pub enum TimerError {
    /// The timer ID is invalid or has already been removed.
    InvalidTimerId,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimerId => write!(f, "Invalid or expired timer ID"),
        }
    }
}

impl std::error::Error for TimerError {}

impl From<TimerError> for CoreError {
    fn from(err: TimerError) -> Self {
        Self::Timer(err)
    }
}

/// Completion-specific errors.
#[derive(Debug)]
pub enum CompletionError {
    /// The resolving side was dropped without resolving or failing.
    Abandoned,
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abandoned => write!(f, "Completion handle dropped before resolving"),
        }
    }
}

impl std::error::Error for CompletionError {}

impl From<CompletionError> for CoreError {
    fn from(err: CompletionError) -> Self {
        Self::Completion(err)
    }
}

/// A convenience `Result` type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::from(TimerError::InvalidTimerId);
        assert_eq!(err.to_string(), "Timer error: Invalid or expired timer ID");
    }

    #[test]
    fn test_error_source() {
        use std::error::Error;

        let err = CoreError::from(CompletionError::Abandoned);
        assert!(err.source().is_some());
    }
}
