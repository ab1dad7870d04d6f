pub type KinemaResult<T> = Result<T, KinemaError>;

/// Failure taxonomy of the action engine.
///
/// Nothing here is retried internally: every variant describes a mistake in how an action tree
/// was assembled (or a failing user callback) and is surfaced to the caller immediately.
#[derive(thiserror::Error, Debug)]
pub enum KinemaError {
    /// Unknown parameter, kind, or hook name while building an action.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed value discovered at construction or first use (e.g. a range shape mismatch).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A user supplied callback failed; the engine does not recover from it.
    #[error("callback error: {0}")]
    Callback(#[source] anyhow::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KinemaError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn callback(err: anyhow::Error) -> Self {
        Self::Callback(err)
    }

    /// `true` for errors raised by user code rather than by the engine.
    pub fn is_callback(&self) -> bool {
        matches!(self, Self::Callback(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
