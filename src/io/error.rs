use super::Format;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line ~{line})")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    #[error("filament type index {index} at line ~{line} was never assigned by this codec")]
    UnknownTypeIndex { line: usize, index: usize },

    #[error(
        "cannot map {decoded} decoded fibers back onto {submitted} submitted fiber ids: {details}"
    )]
    UnmappableFiberId {
        submitted: usize,
        decoded: usize,
        details: String,
    },
}

impl Error {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }

    pub fn unmappable(submitted: usize, decoded: usize, details: impl Into<String>) -> Self {
        Self::UnmappableFiberId {
            submitted,
            decoded,
            details: details.into(),
        }
    }
}
