//! Unified error type for streamtag.
//!
//! Every failure is reported with enough diagnostic text (usually the
//! captured stderr of the external tool) for the caller to decide what to do
//! with the file. None of them are fatal to the host process.

use std::path::PathBuf;

/// Unified error type covering all failure modes in streamtag.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Probing the streams of a file failed or produced no stream list.
    #[error("Probe error: {0}")]
    Probe(String),

    /// The remux tool failed while rewriting a file.
    #[error("Remux error [{}]: {message}", path.display())]
    Remux {
        /// The source file that was being rewritten.
        path: PathBuf,
        /// Captured diagnostic text.
        message: String,
    },

    /// An external tool could not be found, spawned, or timed out.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// An input file does not exist.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Input or configuration failed validation.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Remux`].
    pub fn remux(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Remux {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::FileNotFound`].
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Error::FileNotFound { path: path.into() }
    }

    /// Whether this is a probe failure, which edit operations treat as
    /// "nothing to do" rather than an error.
    pub fn is_probe(&self) -> bool {
        matches!(self, Error::Probe(_))
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
