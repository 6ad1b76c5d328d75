use std::fmt;

use crate::constants::MSG_INVALID_DATE;

/// The three ways a reward operation can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller-fixable: malformed timestamp, unknown week, future or expired reward.
    InvalidArgument,
    /// Legitimate conflict with current state (already redeemed).
    InvalidState,
    /// A data-model invariant was violated.
    InternalError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidArgument => write!(f, "invalid argument"),
            ErrorKind::InvalidState => write!(f, "invalid state"),
            ErrorKind::InternalError => write!(f, "internal error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardError {
    kind: ErrorKind,
    message: String,
}

impl RewardError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidState, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, message)
    }

    /// The fixed error for unparseable or out-of-range timestamps.
    pub fn invalid_date() -> Self {
        Self::invalid_argument(MSG_INVALID_DATE)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RewardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RewardError {}

pub type Result<T> = std::result::Result<T, RewardError>;
