//! In-memory vector store with cosine similarity search.
//!
//! A [`VectorStore`] is an immutable snapshot of one indexed document. Every embedding is
//! L2-normalized on the way in, so the inner product computed by the flat index equals cosine
//! similarity. A new document produces a new store; stores are never updated in place.

use tracing::{debug, error, info};

use crate::document::{Chunk, Neighbor};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// Scale `vector` to unit Euclidean length in place.
///
/// Zero vectors are left unchanged.
pub fn normalize_l2(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Exhaustive inner-product index over contiguous rows of normalized vectors.
#[derive(Debug, Clone, Default)]
struct FlatIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    fn with_capacity(dimension: usize, rows: usize) -> Self {
        Self { dimension, data: Vec::with_capacity(dimension * rows) }
    }

    fn add(&mut self, row: &[f32]) {
        debug_assert_eq!(row.len(), self.dimension);
        self.data.extend_from_slice(row);
    }

    fn len(&self) -> usize {
        if self.dimension == 0 { 0 } else { self.data.len() / self.dimension }
    }

    fn search(&self, query: &[f32], k: usize) -> Vec<Neighbor> {
        if k == 0 || self.dimension == 0 {
            return Vec::new();
        }
        let mut scored: Vec<Neighbor> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(chunk_id, row)| Neighbor { score: dot(row, query), chunk_id })
            .collect();

        // Stable sort keeps index order among equal scores.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        scored
    }
}

/// An immutable, searchable snapshot of one document's chunks.
///
/// The index holds exactly one normalized embedding per chunk, in chunk order, and every
/// embedding has exactly [`dimension`](VectorStore::dimension) components.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::VectorStore;
///
/// let store = VectorStore::build(chunks, &embedder).await?;
/// let neighbors = store.search(&normalized_query, 4)?;
/// ```
#[derive(Debug, Clone)]
pub struct VectorStore {
    dimension: usize,
    chunks: Vec<Chunk>,
    index: FlatIndex,
}

impl VectorStore {
    /// Embed `chunks` with `embedder` and index them.
    ///
    /// The store's dimension is the provider's declared [`dimensions`].
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyDocument`] if `chunks` is empty
    /// - [`RagError::Embedding`] if the provider fails or returns the wrong number of vectors
    /// - [`RagError::DimensionMismatch`] if any embedding has the wrong length
    ///
    /// [`dimensions`]: EmbeddingProvider::dimensions
    pub async fn build(chunks: Vec<String>, embedder: &dyn EmbeddingProvider) -> Result<Self> {
        if chunks.is_empty() {
            return Err(RagError::EmptyDocument);
        }

        let texts: Vec<&str> = chunks.iter().map(String::as_str).collect();
        debug!(provider = embedder.name(), chunk_count = texts.len(), "embedding chunks");
        let embeddings = embedder.embed_batch(&texts).await.map_err(|e| {
            error!(provider = embedder.name(), error = %e, "embedding failed while building store");
            e
        })?;

        if embeddings.len() != chunks.len() {
            return Err(RagError::Embedding {
                provider: embedder.name().to_string(),
                message: format!(
                    "expected {} embeddings, provider returned {}",
                    chunks.len(),
                    embeddings.len()
                ),
            });
        }

        let store = Self::from_embeddings(embedder.dimensions(), chunks, embeddings)?;
        info!(chunk_count = store.len(), dimension = store.dimension, "built vector store");
        Ok(store)
    }

    /// Index precomputed embeddings, one per chunk text.
    ///
    /// Embeddings are normalized here; callers may pass raw model output.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyDocument`] if `chunks` is empty
    /// - [`RagError::Embedding`] if the two sequences differ in length
    /// - [`RagError::DimensionMismatch`] if any embedding length differs from `dimension`
    /// - [`RagError::Embedding`] if an embedding contains NaN or infinite components
    pub fn from_embeddings(
        dimension: usize,
        chunks: Vec<String>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self> {
        if chunks.is_empty() {
            return Err(RagError::EmptyDocument);
        }
        if chunks.len() != embeddings.len() {
            return Err(RagError::Embedding {
                provider: "precomputed".to_string(),
                message: format!(
                    "{} chunks but {} embeddings",
                    chunks.len(),
                    embeddings.len()
                ),
            });
        }

        let mut index = FlatIndex::with_capacity(dimension, chunks.len());
        let mut stored = Vec::with_capacity(chunks.len());
        for (id, (text, mut embedding)) in chunks.into_iter().zip(embeddings).enumerate() {
            if embedding.len() != dimension {
                return Err(RagError::DimensionMismatch {
                    expected: dimension,
                    actual: embedding.len(),
                });
            }
            if embedding.iter().any(|x| !x.is_finite()) {
                return Err(RagError::Embedding {
                    provider: "precomputed".to_string(),
                    message: format!("embedding for chunk {id} contains non-finite values"),
                });
            }
            normalize_l2(&mut embedding);
            index.add(&embedding);
            stored.push(Chunk { id, text, embedding });
        }

        Ok(Self { dimension, chunks: stored, index })
    }

    /// A store with no chunks.
    ///
    /// [`build`](VectorStore::build) never returns one; this exists for callers that need a
    /// placeholder before any document is indexed. Searching it returns no results.
    pub fn empty(dimension: usize) -> Self {
        Self { dimension, chunks: Vec::new(), index: FlatIndex::with_capacity(dimension, 0) }
    }

    /// Return the `k` chunks most similar to `query`, best first.
    ///
    /// `query` should already be unit-normalized for the scores to be cosine similarities.
    /// Returns at most `min(k, len())` neighbors. Chunks with equal scores keep their document
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if `query` has the wrong length and
    /// [`RagError::Embedding`] if it contains NaN or infinite components.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if query.iter().any(|x| !x.is_finite()) {
            return Err(RagError::Embedding {
                provider: "query".to_string(),
                message: "query embedding contains non-finite values".to_string(),
            });
        }
        Ok(self.index.search(query, k))
    }

    /// The fixed embedding dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.index.len(), self.chunks.len());
        self.chunks.len()
    }

    /// Whether the store holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// All chunks in document order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Look up a chunk by id.
    pub fn chunk(&self, id: usize) -> Option<&Chunk> {
        self.chunks.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(rows: Vec<Vec<f32>>) -> VectorStore {
        let texts = (0..rows.len()).map(|i| format!("chunk {i}")).collect();
        VectorStore::from_embeddings(rows[0].len(), texts, rows).unwrap()
    }

    #[test]
    fn normalize_scales_to_unit_length() {
        let mut v = vec![3.0, 4.0];
        normalize_l2(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        let mut zero = vec![0.0, 0.0];
        normalize_l2(&mut zero);
        assert_eq!(zero, vec![0.0, 0.0]);
    }

    #[test]
    fn stores_normalized_embeddings_in_order() {
        let store = store(vec![vec![2.0, 0.0], vec![0.0, 5.0]]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.dimension(), 2);
        assert_eq!(store.chunk(0).unwrap().embedding, vec![1.0, 0.0]);
        assert_eq!(store.chunk(1).unwrap().embedding, vec![0.0, 1.0]);
        assert_eq!(store.chunk(1).unwrap().text, "chunk 1");
        assert!(store.chunk(2).is_none());
    }

    #[test]
    fn search_orders_by_descending_score() {
        let store = store(vec![vec![1.0, 0.0], vec![0.6, 0.8], vec![0.0, 1.0]]);
        let hits = store.search(&[0.0, 1.0], 3).unwrap();
        let ids: Vec<usize> = hits.iter().map(|n| n.chunk_id).collect();
        assert_eq!(ids, vec![2, 1, 0]);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
        assert!((hits[1].score - 0.8).abs() < 1e-6);
    }

    #[test]
    fn k_larger_than_store_returns_every_chunk() {
        let store = store(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(store.search(&[1.0, 0.0], 10).unwrap().len(), 2);
        assert!(store.search(&[1.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn ties_keep_index_order() {
        let store = store(vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 0.0]]);
        let ids: Vec<usize> =
            store.search(&[1.0, 0.0], 3).unwrap().iter().map(|n| n.chunk_id).collect();
        assert_eq!(ids, vec![0, 2, 3]);
    }

    #[test]
    fn empty_store_searches_to_nothing() {
        let store = VectorStore::empty(3);
        assert!(store.is_empty());
        assert!(store.search(&[1.0, 0.0, 0.0], 4).unwrap().is_empty());
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        let err = VectorStore::from_embeddings(
            2,
            vec!["a".into(), "b".into()],
            vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]],
        )
        .unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { expected: 2, actual: 3 }));

        let store = store(vec![vec![1.0, 0.0]]);
        assert!(matches!(
            store.search(&[1.0], 1),
            Err(RagError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn rejects_non_finite_embeddings() {
        let err = VectorStore::from_embeddings(
            2,
            vec!["a".into(), "b".into()],
            vec![vec![1.0, 0.0], vec![f32::INFINITY, 1.0]],
        )
        .unwrap_err();
        assert!(matches!(err, RagError::Embedding { .. }));
    }

    #[test]
    fn index_order_is_total_with_nan_scores() {
        let mut index = FlatIndex::with_capacity(2, 3);
        index.add(&[f32::NAN, 0.0]);
        index.add(&[0.6, 0.8]);
        index.add(&[1.0, 0.0]);
        let ids: Vec<usize> = index.search(&[1.0, 0.0], 3).iter().map(|n| n.chunk_id).collect();
        assert_eq!(ids, vec![0, 2, 1]);
    }

    #[test]
    fn rejects_non_finite_queries() {
        let store = store(vec![vec![1.0, 0.0]]);
        assert!(matches!(store.search(&[f32::NAN, 1.0], 1), Err(RagError::Embedding { .. })));
    }

    #[test]
    fn rejects_empty_documents() {
        let err = VectorStore::from_embeddings(2, Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, RagError::EmptyDocument));
    }
}
