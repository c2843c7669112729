//! Command-line arguments.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use docqa_rag::ollama::{
    DEFAULT_BASE_URL, DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_EMBEDDING_MODEL,
    DEFAULT_GENERATION_MODEL, DEFAULT_TEMPERATURE, OllamaEmbeddingProvider, OllamaGenerator,
};
use docqa_rag::config::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_GENERATION_TIMEOUT, DEFAULT_TOP_K,
};
use docqa_rag::{AnswerPipeline, RagConfig};

const DEFAULT_TIMEOUT_SECS: u64 = DEFAULT_GENERATION_TIMEOUT.as_secs();

/// Ask questions about a document, answered only from its contents.
#[derive(Debug, Parser)]
#[command(name = "docqa", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub backend: BackendArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer one question about a document.
    Ask {
        /// Document to index (txt or pdf).
        file: PathBuf,
        /// The question to answer.
        question: String,
    },
    /// Show the chunks most similar to a query without generating an answer.
    Search {
        /// Document to index (txt or pdf).
        file: PathBuf,
        /// The search query.
        query: String,
    },
    /// Interactive session; load documents and ask repeatedly.
    Chat {
        /// Document to load at startup.
        file: Option<PathBuf>,
    },
}

/// Model backend and retrieval settings shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct BackendArgs {
    /// Ollama server address.
    #[arg(long, global = true, env = "DOCQA_OLLAMA_URL", default_value = DEFAULT_BASE_URL)]
    pub ollama_url: String,

    /// Embedding model name.
    #[arg(long, global = true, env = "DOCQA_EMBED_MODEL")]
    #[arg(default_value = DEFAULT_EMBEDDING_MODEL)]
    pub embed_model: String,

    /// Dimensionality of the embedding model.
    #[arg(long, global = true, env = "DOCQA_EMBED_DIMENSIONS")]
    #[arg(default_value_t = DEFAULT_EMBEDDING_DIMENSIONS)]
    pub embed_dimensions: usize,

    /// Generation model name.
    #[arg(long, global = true, env = "DOCQA_MODEL", default_value = DEFAULT_GENERATION_MODEL)]
    pub model: String,

    /// Sampling temperature for answers.
    #[arg(long, global = true, env = "DOCQA_TEMPERATURE")]
    #[arg(default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// Tokens per chunk.
    #[arg(long, global = true, env = "DOCQA_CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Tokens shared by consecutive chunks.
    #[arg(long, global = true, env = "DOCQA_CHUNK_OVERLAP")]
    #[arg(default_value_t = DEFAULT_CHUNK_OVERLAP)]
    pub chunk_overlap: usize,

    /// Chunks used as context per question.
    #[arg(long, global = true, env = "DOCQA_TOP_K", default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,

    /// Seconds to wait for the model before giving up.
    #[arg(long, global = true, env = "DOCQA_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl BackendArgs {
    /// Validated pipeline configuration from the flags.
    pub fn config(&self) -> docqa_rag::Result<RagConfig> {
        RagConfig::builder()
            .chunk_size(self.chunk_size)
            .chunk_overlap(self.chunk_overlap)
            .top_k(self.top_k)
            .generation_timeout(Duration::from_secs(self.timeout_secs))
            .build()
    }

    /// Build a pipeline talking to the configured Ollama server.
    pub fn pipeline(&self) -> docqa_rag::Result<AnswerPipeline> {
        let embedder = OllamaEmbeddingProvider::new()
            .with_base_url(&self.ollama_url)
            .with_model(&self.embed_model)
            .with_dimensions(self.embed_dimensions);
        let generator = OllamaGenerator::new()
            .with_base_url(&self.ollama_url)
            .with_model(&self.model)
            .with_temperature(self.temperature);

        AnswerPipeline::builder()
            .config(self.config()?)
            .embedding_provider(Arc::new(embedder))
            .generator(Arc::new(generator))
            .build()
    }
}
