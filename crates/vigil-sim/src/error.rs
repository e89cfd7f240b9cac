//! Error types for the demo world binary.
//!
//! [`SimError`] is the top-level error type that wraps all failure modes
//! during startup, so `main` can propagate everything with `?`.

/// Top-level error for the demo world binary.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// Vision parameter validation failed.
    #[error("vision error: {source}")]
    Vision {
        /// The underlying validation error.
        #[from]
        source: vigil_vision::ConfigError,
    },
}
