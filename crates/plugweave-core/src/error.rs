//! Error types for plugweave-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for plugweave-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in plugweave-core.
#[derive(Debug, Error)]
pub enum Error {
    /// A function declaration did not match the recognized shape.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to read a required input file.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error (signature store).
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A required external program could not be found or started.
    #[error("toolchain error: {0}")]
    Toolchain(String),

    /// The formatter or the plugin build exited unsuccessfully.
    #[error("{step} failed for {}: {message}", path.display())]
    Build {
        step: &'static str,
        path: PathBuf,
        message: String,
    },
}

impl Error {
    /// Short recovery hint for the error, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Parse { .. } => Some(
                "function declarations must look like `func Name(params) ... {` on one line",
            ),
            Self::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                Some("the base directory must contain the input file and a `base` template")
            }
            Self::Read { .. } => {
                Some("the input file and the `base` template must be readable UTF-8 text")
            }
            Self::Toolchain(_) => Some(
                "install the Go toolchain and goimports, or pass --no-format / --no-build",
            ),
            Self::Build { step: "format", .. } => {
                Some("the emitted source is left on disk; inspect it for syntax errors")
            }
            Self::Build { .. } => Some(
                "the emitted source is left on disk; the signature store was not updated",
            ),
            Self::Io(_) | Self::Serialization(_) => None,
        }
    }

    /// Render the error together with its recovery hint.
    pub fn with_hint(&self) -> String {
        match self.hint() {
            Some(hint) => format!("{self}\n  hint: {hint}"),
            None => self.to_string(),
        }
    }
}
