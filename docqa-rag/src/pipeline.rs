//! Answer pipeline orchestrator.
//!
//! The [`AnswerPipeline`] ties retrieval to generation. It composes a [`Chunker`], an
//! [`EmbeddingProvider`], and a [`Generator`], and provides both halves of the workflow:
//! indexing a document into a [`VectorStore`] and answering questions against one.
//!
//! # Example
//!
//! ```rust,ignore
//! use docqa_rag::{AnswerPipeline, RagConfig};
//!
//! let pipeline = AnswerPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .generator(Arc::new(my_generator))
//!     .build()?;
//!
//! let store = pipeline.build_store(&document_text).await?;
//! let answer = pipeline.answer("What is this document about?", &store).await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::{Chunker, TokenWindowChunker};
use crate::config::RagConfig;
use crate::document::{Answer, RetrievalHit};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::Generator;
use crate::prompt::{build_prompt, join_context};
use crate::retriever::Retriever;
use crate::vectorstore::VectorStore;

/// The question-answering pipeline.
///
/// Every call re-embeds the question and re-invokes the generator; nothing is cached.
/// Construct one via [`AnswerPipeline::builder()`].
pub struct AnswerPipeline {
    config: RagConfig,
    retriever: Retriever,
    generator: Arc<dyn Generator>,
    chunker: Arc<dyn Chunker>,
}

impl std::fmt::Debug for AnswerPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerPipeline")
            .field("config", &self.config)
            .field("retriever", &self.retriever)
            .field("generator", &self.generator.name())
            .finish_non_exhaustive()
    }
}

impl AnswerPipeline {
    /// Create a new [`AnswerPipelineBuilder`].
    pub fn builder() -> AnswerPipelineBuilder {
        AnswerPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the retriever.
    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Chunk and embed `text` into a fresh [`VectorStore`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyDocument`] if the text has no tokens, and propagates
    /// embedding and dimension errors from [`VectorStore::build`].
    pub async fn build_store(&self, text: &str) -> Result<VectorStore> {
        let chunks = self.chunker.chunk(text);
        if chunks.is_empty() {
            info!(text_len = text.len(), "document produced no chunks");
            return Err(RagError::EmptyDocument);
        }
        VectorStore::build(chunks, self.retriever.embedder().as_ref()).await
    }

    /// Retrieve the configured `top_k` chunks for `query`.
    pub async fn retrieve(&self, query: &str, store: &VectorStore) -> Result<Vec<RetrievalHit>> {
        self.retriever.retrieve(query, store, self.config.top_k).await
    }

    /// Answer `query` from the configured `top_k` chunks of `store`.
    ///
    /// # Errors
    ///
    /// See [`answer_with_hits`](AnswerPipeline::answer_with_hits).
    pub async fn answer(&self, query: &str, store: &VectorStore) -> Result<String> {
        self.answer_top_k(query, store, self.config.top_k).await.map(|answer| answer.text)
    }

    /// Answer `query` and return the retrieved context alongside the text.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyStoreQuery`] if `store` has no chunks; nothing is embedded or
    ///   generated in that case
    /// - [`RagError::Generation`] or [`RagError::GenerationTimeout`] if the generator fails
    /// - embedding errors from retrieval
    pub async fn answer_with_hits(&self, query: &str, store: &VectorStore) -> Result<Answer> {
        self.answer_top_k(query, store, self.config.top_k).await
    }

    /// Answer `query` using the `k` most similar chunks.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] when `k` is zero; nothing is embedded or generated.
    pub async fn answer_top_k(&self, query: &str, store: &VectorStore, k: usize) -> Result<Answer> {
        if k == 0 {
            return Err(RagError::Config("k must be greater than zero".to_string()));
        }
        if store.is_empty() {
            error!("question asked against an empty store");
            return Err(RagError::EmptyStoreQuery);
        }

        let hits = self.retriever.retrieve(query, store, k).await?;
        let prompt = build_prompt(&join_context(&hits), query);

        let timeout = self.config.generation_timeout;
        let completion = tokio::time::timeout(timeout, self.generator.generate(&prompt))
            .await
            .map_err(|_| {
                error!(generator = self.generator.name(), ?timeout, "generation timed out");
                RagError::GenerationTimeout { timeout }
            })?
            .map_err(|e| {
                error!(generator = self.generator.name(), error = %e, "generation failed");
                e
            })?;

        let text = completion.trim().to_string();
        info!(hit_count = hits.len(), answer_len = text.len(), "answered question");
        Ok(Answer { text, hits })
    }
}

/// Builder for constructing an [`AnswerPipeline`].
///
/// The embedding provider and generator are required. The configuration defaults to
/// [`RagConfig::default`] and the chunker to a [`TokenWindowChunker`] sized from the
/// configuration.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = AnswerPipeline::builder()
///     .config(config)
///     .embedding_provider(Arc::new(embedder))
///     .generator(Arc::new(generator))
///     .chunker(Arc::new(chunker))  // optional
///     .build()?;
/// ```
#[derive(Default)]
pub struct AnswerPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    generator: Option<Arc<dyn Generator>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl AnswerPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the generator.
    pub fn generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Override the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`AnswerPipeline`], validating the configuration and required fields.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required field is missing or the configuration is
    /// invalid.
    pub fn build(self) -> Result<AnswerPipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let generator =
            self.generator.ok_or_else(|| RagError::Config("generator is required".to_string()))?;
        let chunker = match self.chunker {
            Some(chunker) => chunker,
            None => Arc::new(TokenWindowChunker::from_config(&config)?),
        };

        Ok(AnswerPipeline {
            config,
            retriever: Retriever::new(embedding_provider),
            generator,
            chunker,
        })
    }
}
