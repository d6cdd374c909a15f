use thiserror::Error;

/// Errors surfaced by the coupling loop and its configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to parse the coupling configuration TOML.
    #[error("failed to parse coupling configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A configuration value is out of range.
    #[error("invalid coupling configuration: {0}")]
    InvalidConfig(String),

    /// The fiber or particle engine failed during a step.
    #[error("engine step failed: {0}")]
    Engine(#[from] crate::engine::Error),

    /// Converting between representations failed.
    #[error("representation translation failed: {0}")]
    Translate(#[from] crate::translate::Error),
}

impl Error {
    /// Whether the tick that raised this error may simply be retried. The
    /// coupled state is left untouched in either case.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Engine(e) if e.is_recoverable())
    }
}
