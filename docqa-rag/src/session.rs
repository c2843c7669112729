//! The current document of a question-answering session.
//!
//! [`DocumentSession`] owns the pipeline and at most one indexed document. Loading a new
//! document builds a fresh [`VectorStore`] outside the lock and then swaps the snapshot in, so
//! questions already in flight finish against the store they started with.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::document::{Answer, RetrievalHit};
use crate::error::{RagError, Result};
use crate::extraction::DocumentExtractor;
use crate::pipeline::AnswerPipeline;
use crate::vectorstore::VectorStore;

/// An indexed document snapshot.
#[derive(Debug)]
pub struct LoadedDocument {
    /// Display name, usually the file name.
    pub name: String,
    /// The document's vector store.
    pub store: Arc<VectorStore>,
    /// When the document finished indexing.
    pub loaded_at: DateTime<Utc>,
}

/// Holds the document questions are answered from.
#[derive(Debug)]
pub struct DocumentSession {
    pipeline: Arc<AnswerPipeline>,
    current: RwLock<Option<Arc<LoadedDocument>>>,
}

impl DocumentSession {
    /// Create a session with no document loaded.
    pub fn new(pipeline: Arc<AnswerPipeline>) -> Self {
        Self { pipeline, current: RwLock::new(None) }
    }

    /// Return a reference to the pipeline.
    pub fn pipeline(&self) -> &Arc<AnswerPipeline> {
        &self.pipeline
    }

    /// Index `text` under `name` and make it the current document.
    ///
    /// If indexing fails the previous document stays loaded.
    pub async fn load_text(
        &self,
        name: impl Into<String>,
        text: &str,
    ) -> Result<Arc<LoadedDocument>> {
        let name = name.into();
        let store = match self.pipeline.build_store(text).await {
            Ok(store) => store,
            Err(e) => {
                warn!(document = %name, error = %e, "indexing failed; keeping previous document");
                return Err(e);
            }
        };

        let loaded = Arc::new(LoadedDocument {
            name,
            store: Arc::new(store),
            loaded_at: Utc::now(),
        });
        let previous = self.current.write().await.replace(Arc::clone(&loaded));
        info!(
            document = %loaded.name,
            chunk_count = loaded.store.len(),
            replaced = previous.as_ref().map(|doc| doc.name.as_str()),
            "document loaded"
        );
        Ok(loaded)
    }

    /// Extract the file at `path` and load it under its file name.
    pub async fn load_file(
        &self,
        path: &Path,
        extractor: &dyn DocumentExtractor,
    ) -> Result<Arc<LoadedDocument>> {
        let text = extractor.extract(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.load_text(name, &text).await
    }

    /// The current document, if any.
    pub async fn current(&self) -> Option<Arc<LoadedDocument>> {
        self.current.read().await.clone()
    }

    /// Drop the current document.
    pub async fn reset(&self) {
        if let Some(previous) = self.current.write().await.take() {
            info!(document = %previous.name, "document cleared");
        }
    }

    async fn require_document(&self) -> Result<Arc<LoadedDocument>> {
        self.current().await.ok_or(RagError::EmptyStoreQuery)
    }

    /// Answer `query` from the current document.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyStoreQuery`] when no document is loaded, and otherwise the
    /// errors of [`AnswerPipeline::answer_with_hits`].
    pub async fn ask(&self, query: &str) -> Result<Answer> {
        let document = self.require_document().await?;
        self.pipeline.answer_with_hits(query, &document.store).await
    }

    /// Retrieve the chunks of the current document most similar to `query`.
    pub async fn search(&self, query: &str) -> Result<Vec<RetrievalHit>> {
        let document = self.require_document().await?;
        self.pipeline.retrieve(query, &document.store).await
    }
}
