//! Question answering over a single document.
//!
//! `docqa-rag` splits a document into overlapping token windows, embeds them into an
//! in-memory [`VectorStore`], retrieves the chunks most similar to a question, and asks a
//! [`Generator`] to answer from those chunks only. When the context does not contain the
//! answer the generator is instructed to reply with [`NO_ANSWER`].
//!
//! The embedding model and the generator are injected as trait objects, so tests and
//! alternative backends can be swapped in without global state. The `ollama` feature provides
//! HTTP implementations of both; the `pdf` feature adds PDF text extraction.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docqa_rag::{AnswerPipeline, DocumentSession, FileExtractor, RagConfig};
//! use docqa_rag::ollama::{OllamaEmbeddingProvider, OllamaGenerator};
//!
//! let pipeline = AnswerPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(OllamaEmbeddingProvider::new()))
//!     .generator(Arc::new(OllamaGenerator::new()))
//!     .build()?;
//!
//! let session = DocumentSession::new(Arc::new(pipeline));
//! session.load_file("report.pdf".as_ref(), &FileExtractor::new()).await?;
//! let answer = session.ask("What is this document about?").await?;
//! println!("{}", answer.text);
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extraction;
pub mod generation;
pub mod pipeline;
pub mod prompt;
pub mod retriever;
pub mod session;
pub mod vectorstore;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use chunking::{Chunker, TokenWindowChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Answer, Chunk, Neighbor, RetrievalHit};
pub use embedding::EmbeddingProvider;
pub use error::{ErrorKind, RagError, Result};
pub use extraction::{DocumentExtractor, FileExtractor, FileKind};
pub use generation::Generator;
pub use pipeline::{AnswerPipeline, AnswerPipelineBuilder};
pub use prompt::NO_ANSWER;
pub use retriever::Retriever;
pub use session::{DocumentSession, LoadedDocument};
pub use vectorstore::{VectorStore, normalize_l2};
