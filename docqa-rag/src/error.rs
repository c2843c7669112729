//! Error types for the `docqa-rag` crate.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while indexing a document or answering a question.
#[derive(Debug, Error)]
pub enum RagError {
    /// A configuration validation error (chunk sizes, `top_k`, missing collaborators).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A vector store was requested for a document that produced no chunks.
    #[error("Document contains no text to index")]
    EmptyDocument,

    /// An embedding's length disagrees with the store's fixed dimension.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The dimension the store was built with.
        expected: usize,
        /// The length of the offending vector.
        actual: usize,
    },

    /// A question was asked before any document was successfully indexed.
    #[error("No document has been indexed; load a document before asking questions")]
    EmptyStoreQuery,

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The generator backend failed to produce a completion.
    #[error("Generation error ({provider}): {message}")]
    Generation {
        /// The generator that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The generator did not answer within the configured timeout.
    #[error("Generation timed out after {}s", timeout.as_secs_f32())]
    GenerationTimeout {
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// Document text could not be obtained from a file.
    #[error("Extraction error ({}): {message}", path.display())]
    Extraction {
        /// The file that failed to extract.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },
}

/// Coarse classification of a [`RagError`] for user-facing reporting.
///
/// Lets a front end distinguish "no document" from "generation backend unavailable". A
/// successful "I don't know" answer is not an error and never maps here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable document is loaded.
    NoDocument,
    /// The embedding or generation backend failed or timed out.
    BackendUnavailable,
    /// The caller supplied invalid configuration or input.
    InvalidInput,
}

impl RagError {
    /// Classify this error for display.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyDocument | Self::EmptyStoreQuery | Self::Extraction { .. } => {
                ErrorKind::NoDocument
            }
            Self::Embedding { .. } | Self::Generation { .. } | Self::GenerationTimeout { .. } => {
                ErrorKind::BackendUnavailable
            }
            Self::Config(_) | Self::DimensionMismatch { .. } => ErrorKind::InvalidInput,
        }
    }

    pub(crate) fn extraction(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Extraction { path: path.into(), message: message.into() }
    }
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
