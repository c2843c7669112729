//! Query-side retrieval: embed, normalize, search, and shape hits.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::document::RetrievalHit;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::vectorstore::{VectorStore, normalize_l2};

/// Turns a question into the most similar chunks of a [`VectorStore`].
///
/// The embedding provider must be the one the store was built with.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever").field("embedder", &self.embedder.name()).finish()
    }
}

impl Retriever {
    /// Create a retriever that embeds queries with `embedder`.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embedder }
    }

    /// Return a reference to the embedding provider.
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Retrieve the `k` chunks of `store` most similar to `query`, best first.
    ///
    /// Scores are cosine similarities in `[-1, 1]`. An id returned by the index with no
    /// matching chunk is skipped and logged.
    ///
    /// # Errors
    ///
    /// Propagates embedding failures and [`RagError::DimensionMismatch`] when the query
    /// embedding does not match the store.
    ///
    /// [`RagError::DimensionMismatch`]: crate::RagError::DimensionMismatch
    pub async fn retrieve(
        &self,
        query: &str,
        store: &VectorStore,
        k: usize,
    ) -> Result<Vec<RetrievalHit>> {
        let mut query_embedding = self.embedder.embed(query).await.map_err(|e| {
            error!(provider = self.embedder.name(), error = %e, "query embedding failed");
            e
        })?;
        normalize_l2(&mut query_embedding);

        let neighbors = store.search(&query_embedding, k)?;
        let hits: Vec<RetrievalHit> = neighbors
            .into_iter()
            .filter_map(|neighbor| match store.chunk(neighbor.chunk_id) {
                Some(chunk) => {
                    Some(RetrievalHit { score: neighbor.score, text: chunk.text.clone() })
                }
                None => {
                    warn!(
                        chunk_id = neighbor.chunk_id,
                        chunk_count = store.len(),
                        "index returned an id with no chunk; skipping"
                    );
                    None
                }
            })
            .collect();

        debug!(k, hit_count = hits.len(), "retrieved chunks");
        Ok(hits)
    }
}
