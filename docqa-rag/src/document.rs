//! Data types for chunks, retrieval hits, and answers.

use serde::{Deserialize, Serialize};

/// A token-window slice of the indexed document with its normalized embedding.
///
/// Chunks are created by [`VectorStore::build`](crate::VectorStore::build) and never modified
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Position of the chunk in the document, starting at 0.
    pub id: usize,
    /// The text content of the chunk.
    pub text: String,
    /// The unit-normalized embedding for this chunk's text.
    pub embedding: Vec<f32>,
}

/// A chunk id returned by the index paired with its similarity score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Inner product of the normalized query and chunk vectors.
    pub score: f32,
    /// Row of the chunk in the store.
    pub chunk_id: usize,
}

/// A retrieved chunk's text paired with its cosine similarity to the query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalHit {
    /// Cosine similarity in `[-1, 1]`; higher is more similar.
    pub score: f32,
    /// The chunk text.
    pub text: String,
}

/// The generator's answer together with the context that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Answer {
    /// The trimmed generator output.
    pub text: String,
    /// The hits used as context, in rank order.
    pub hits: Vec<RetrievalHit>,
}
