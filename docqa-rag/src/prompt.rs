//! Grounded prompt assembly.

use crate::document::RetrievalHit;

/// The literal answer the generator is told to give when the context lacks the answer.
pub const NO_ANSWER: &str = "I don't know";

/// Separator placed between chunk texts in the context block.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Join hit texts, in rank order, into a single context block.
pub fn join_context(hits: &[RetrievalHit]) -> String {
    hits.iter().map(|hit| hit.text.as_str()).collect::<Vec<_>>().join(CONTEXT_SEPARATOR)
}

/// Build the grounded prompt for `question` over `context`.
///
/// The wording is fixed and does not depend on how many hits were retrieved or their scores.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "You are an assistant answering ONLY from the provided context.\n\
         If the answer is not in the context, say \"{NO_ANSWER}\".\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Question:\n\
         {question}\n"
    )
}
