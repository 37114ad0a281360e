use thiserror::Error;

/// Error kinds surfaced by the widget core.
#[derive(Debug, Error)]
pub enum Error {
    /// The event transport is missing or misconfigured. Fatal to the
    /// fetch attempt, not to the widget.
    #[error("event source unavailable: {0}")]
    FetchUnavailable(String),

    /// The transport rejected a fetch. Previously cached ranges stay
    /// usable; the next request for the same range retries.
    #[error("failed to fetch events: {0}")]
    FetchFailed(String),

    /// Missing or contradictory setup input. Fatal at initialization.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::InvalidConfiguration(err.to_string())
    }
}

/// Type alias for Result with the crate error type.
pub type Result<T> = std::result::Result<T, Error>;
