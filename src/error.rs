//! Error types for the account core.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Acquisition error: {0}")]
    Acquisition(#[from] AcquisitionError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while resolving the session's user profile.
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("No access token after {attempts} polling attempts")]
    TokenTimeout { attempts: u32 },

    #[error("Acquisition cancelled before a credential was observed")]
    Cancelled,

    #[error("Auth context has a token but no user claims")]
    MissingClaims,

    #[error("User lookup failed: {0}")]
    Lookup(#[from] PersistenceError),

    #[error("Lookup reported success but returned no user record")]
    MissingProfileData,
}

/// Errors from the middleware persistence API.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Invalid response from middleware: {0}")]
    InvalidResponse(String),
}

/// Result type alias for the account core.
pub type Result<T> = std::result::Result<T, Error>;
