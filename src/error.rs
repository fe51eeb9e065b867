//! Error types for the device flow.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between reading configuration and printing a
/// token. Only `Pending`/`SlowDown` poll outcomes are recoverable, and those
/// never surface as errors; every variant here is terminal for the process.
#[derive(Debug, Error)]
pub enum Error {
    /// A required environment variable is unset or empty.
    #[error("{0} is required")]
    MissingVar(&'static str),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The server answered with something that is not JSON. The raw body is
    /// carried along so the binary can dump it for diagnosis.
    #[error("server returned a non-JSON response")]
    NonJsonResponse { body: String },

    /// Terminal OAuth error from either endpoint (`invalid_scope`,
    /// `access_denied`, ...). Displays as the server-supplied description.
    #[error("{description}")]
    Authorization { description: String },

    /// HTTP 200 from the device endpoint but the success body is missing
    /// `device_code`, `user_code`, or a verification URI.
    #[error("Missing device_code/user_code/verification_uri")]
    IncompleteAuthorization { response: serde_json::Value },

    #[error("Device code expired. Start the flow again.")]
    Expired,

    #[error("No access_token returned")]
    MissingAccessToken,
}
