//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`TokenWindowChunker`], which splits text
//! into overlapping windows of whitespace-delimited tokens.

use crate::config::RagConfig;
use crate::error::{RagError, Result};

/// A strategy for splitting document text into chunk texts.
///
/// Embeddings are attached later, when the chunks are indexed.
pub trait Chunker: Send + Sync {
    /// Split text into chunks, in document order.
    ///
    /// Returns an empty `Vec` if the text contains no tokens.
    fn chunk(&self, text: &str) -> Vec<String>;
}

/// Splits text into fixed-size windows of whitespace tokens with configurable overlap.
///
/// Window `n` starts at token `n * (chunk_size - chunk_overlap)`. Tokens inside a chunk are
/// re-joined with single spaces, so original line breaks and runs of whitespace are not kept.
///
/// # Example
///
/// ```rust
/// use docqa_rag::{Chunker, TokenWindowChunker};
///
/// let chunker = TokenWindowChunker::new(3, 1).unwrap();
/// assert_eq!(chunker.chunk("a b c d e"), vec!["a b c", "c d e", "e"]);
/// ```
#[derive(Debug, Clone)]
pub struct TokenWindowChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TokenWindowChunker {
    /// Create a new `TokenWindowChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of tokens per chunk
    /// * `chunk_overlap` — number of tokens shared by consecutive chunks
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_size` is zero or `chunk_overlap >= chunk_size`,
    /// either of which would stop the window from advancing.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }

    /// Create a chunker from the sizes in `config`.
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Number of tokens the window advances between chunks.
    pub fn step(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }
}

impl Default for TokenWindowChunker {
    fn default() -> Self {
        let config = RagConfig::default();
        Self { chunk_size: config.chunk_size, chunk_overlap: config.chunk_overlap }
    }
}

impl Chunker for TokenWindowChunker {
    fn chunk(&self, text: &str) -> Vec<String> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        tokens
            .chunks(self.step())
            .enumerate()
            .map(|(i, _)| {
                let start = i * self.step();
                let end = start.saturating_add(self.chunk_size).min(tokens.len());
                tokens[start..end].join(" ")
            })
            .collect()
    }
}
