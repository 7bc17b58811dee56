#![forbid(unsafe_code)]

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Conditions that surface to the caller.
///
/// Recoverable situations (an unresolved selector, a missing per-step
/// callback) never appear here; they are absorbed and logged.
#[derive(Debug, Error)]
pub enum Error {
    /// The overlay svg no longer holds its path child. Something outside the
    /// library rewrote nodes it owns.
    #[error("stage overlay is missing its path element")]
    MissingStagePath,

    #[error("no steps to drive")]
    NoSteps,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON config error: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("TOML config error: {0}")]
    ConfigToml(#[from] toml::de::Error),
}
