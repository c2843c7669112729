//! Text generation capability used to phrase the final answer.

use async_trait::async_trait;

use crate::error::Result;

/// A language model that completes a prompt.
///
/// Implementations may block for seconds; the [`AnswerPipeline`](crate::AnswerPipeline) bounds
/// every call with its configured timeout. Failures should be reported as
/// [`RagError::Generation`](crate::RagError::Generation).
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce a free-text completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Short generator name used in logs and errors.
    fn name(&self) -> &str {
        "generator"
    }
}
