use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The engine exited abnormally or never reported completion. The
    /// captured output is kept for diagnosis.
    #[error("engine invocation failed: {}", describe_status(.status))]
    Invocation {
        status: Option<ExitStatus>,
        output: String,
    },

    /// The engine ran past its time limit and was killed.
    #[error("engine did not finish within {after:?}")]
    Timeout { after: Duration, output: String },

    #[error("trajectory codec error: {0}")]
    Codec(#[from] crate::io::error::Error),

    #[error("I/O failed for '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render engine configuration: {0}")]
    Template(String),

    /// Neither the fiber state nor the configuration provides a box extent.
    #[error("simulation box extent is unknown; set fiber_engine.box_extent or supply it with the fibers")]
    MissingBoxExtent,

    /// Failure reported by a particle engine implementation.
    #[error("particle engine failed: {0}")]
    Particle(String),
}

fn describe_status(status: &Option<ExitStatus>) -> String {
    match status {
        Some(s) if s.success() => "exited successfully without the completion marker".to_string(),
        Some(s) => s.to_string(),
        None => "no exit status".to_string(),
    }
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Timeouts leave no partial state behind and may be retried.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Captured engine output, when the failure carries any.
    pub fn output(&self) -> Option<&str> {
        match self {
            Error::Invocation { output, .. } | Error::Timeout { output, .. } => Some(output),
            _ => None,
        }
    }
}
