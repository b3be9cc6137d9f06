//! Error taxonomy shared by the client, terminal, window manager and desktop.

use crate::window::{WindowId, WindowKind};
use thiserror::Error;

/// Line shown whenever the backend cannot be reached.
pub const OFFLINE_MESSAGE: &str = "⚠ CONNECTION_REFUSED: Backend offline";

/// Failure reported by a file client or command dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("network error: {0}")]
    Network(String),
}

impl ClientError {
    /// Classify an application-level error message returned by the backend.
    pub fn from_message(message: &str) -> Self {
        let message = if message.trim().is_empty() {
            "Command failed".to_string()
        } else {
            message.to_string()
        };
        let lower = message.to_lowercase();
        if lower.contains("not found") || lower.contains("no such") {
            ClientError::NotFound(message)
        } else {
            ClientError::Conflict(message)
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }

    /// Text rendered into the scrollback for this failure.
    pub fn message(&self) -> &str {
        match self {
            ClientError::NotFound(m) | ClientError::Conflict(m) => m,
            ClientError::Network(_) => OFFLINE_MESSAGE,
        }
    }
}

/// Recoverable failure of a terminal command. Always rendered as one error line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerminalError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{}", OFFLINE_MESSAGE)]
    Network,
}

impl TerminalError {
    pub fn usage(text: &str) -> Self {
        TerminalError::Usage(format!("Usage: {}", text))
    }
}

impl From<ClientError> for TerminalError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(m) => TerminalError::NotFound(m),
            ClientError::Conflict(m) => TerminalError::Conflict(m),
            ClientError::Network(_) => TerminalError::Network,
        }
    }
}

/// A submission arrived while the session was not ready for input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("a command is still awaiting its response")]
    AwaitingResponse,
    #[error("output is still being typed out")]
    TypingOut,
}

/// Broken window-manager invariant. Indicates a bug, never a user error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("more than one window is focused: {0:?}")]
    MultipleFocused(Vec<WindowId>),
    #[error("exclusive window kind {0:?} is open more than once")]
    DuplicateExclusive(WindowKind),
    #[error("window id {0} is used more than once")]
    DuplicateId(WindowId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DesktopError {
    #[error("no window with id {0}")]
    UnknownWindow(WindowId),
    #[error("window {0} is not a terminal")]
    NotATerminal(WindowId),
    #[error("desktop is locked")]
    Locked,
    #[error(transparent)]
    Rejected(#[from] SubmitRejected),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_messages() {
        assert_eq!(
            ClientError::from_message("Directory not found"),
            ClientError::NotFound("Directory not found".into())
        );
        assert_eq!(
            ClientError::from_message("[Errno 2] No such file or directory: 'x'"),
            ClientError::NotFound("[Errno 2] No such file or directory: 'x'".into())
        );
        assert_eq!(
            ClientError::from_message("Access denied"),
            ClientError::Conflict("Access denied".into())
        );
        assert_eq!(
            ClientError::from_message(""),
            ClientError::Conflict("Command failed".into())
        );
    }

    #[test]
    fn test_network_message_is_generic() {
        let err = ClientError::Network("fetch rejected".into());
        assert!(err.is_network());
        assert_eq!(err.message(), OFFLINE_MESSAGE);
        assert_eq!(TerminalError::from(err).to_string(), OFFLINE_MESSAGE);
    }
}
