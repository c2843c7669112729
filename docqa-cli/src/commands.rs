//! One-shot `ask` and `search` commands.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use docqa_rag::{AnswerPipeline, DocumentSession, FileExtractor, RagError};
use tracing::info;

use crate::render;

/// Keep the typed error as the source and put the user-facing guidance on top.
fn with_guidance(err: RagError) -> anyhow::Error {
    let guidance = render::error(&err);
    anyhow::Error::new(err).context(guidance)
}

async fn load(pipeline: AnswerPipeline, file: &Path) -> Result<DocumentSession> {
    let session = DocumentSession::new(Arc::new(pipeline));
    let doc = session
        .load_file(file, &FileExtractor::new())
        .await
        .map_err(with_guidance)
        .with_context(|| format!("failed to load {}", file.display()))?;
    info!(document = %doc.name, chunk_count = doc.store.len(), "indexed");
    Ok(session)
}

/// Answer `question` from `file` and print the context and answer.
pub async fn ask(pipeline: AnswerPipeline, file: &Path, question: &str) -> Result<()> {
    let session = load(pipeline, file).await?;
    let answer = session.ask(question).await.map_err(with_guidance)?;
    print!("{}", render::answer(&answer));
    Ok(())
}

/// Print the chunks of `file` most similar to `query`.
pub async fn search(pipeline: AnswerPipeline, file: &Path, query: &str) -> Result<()> {
    let session = load(pipeline, file).await?;
    let hits = session.search(query).await.map_err(with_guidance)?;
    print!("{}", render::hits(&hits));
    Ok(())
}
