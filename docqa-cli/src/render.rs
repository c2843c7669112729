//! Plain-text rendering of hits, answers, and errors.

use docqa_rag::{Answer, ErrorKind, LoadedDocument, RagError, RetrievalHit};

/// Characters of each retrieved chunk shown to the user.
pub const PREVIEW_CHARS: usize = 1000;

/// The first `max_chars` characters of `text`.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Ranked hits, one block per chunk.
pub fn hits(hits: &[RetrievalHit]) -> String {
    let mut out = String::new();
    for (rank, hit) in hits.iter().enumerate() {
        out.push_str(&format!("Chunk {} (score {:.3})\n", rank + 1, hit.score));
        out.push_str(preview(&hit.text, PREVIEW_CHARS));
        out.push_str("\n\n");
    }
    out
}

pub fn answer(answer: &Answer) -> String {
    format!("Retrieved context:\n\n{}Answer:\n{}\n", hits(&answer.hits), answer.text)
}

pub fn document_info(document: Option<&LoadedDocument>) -> String {
    match document {
        Some(doc) => format!(
            "{} ({} chunks, loaded {})",
            doc.name,
            doc.store.len(),
            doc.loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => "No document loaded.".to_string(),
    }
}

/// A user-facing message for a failed operation.
pub fn error(err: &RagError) -> String {
    match (err.kind(), err) {
        (ErrorKind::NoDocument, RagError::EmptyStoreQuery) => {
            "Upload a document first. Use :load <path> to index one.".to_string()
        }
        (ErrorKind::NoDocument, RagError::EmptyDocument) => {
            "The document contains no text to index.".to_string()
        }
        (ErrorKind::NoDocument, _) => format!("Could not load the document: {err}"),
        (ErrorKind::BackendUnavailable, _) => {
            format!("The model backend is unavailable: {err}. Is Ollama running?")
        }
        (ErrorKind::InvalidInput, _) => format!("Invalid input: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use docqa_rag::VectorStore;

    use super::*;

    #[test]
    fn preview_counts_characters_not_bytes() {
        assert_eq!(preview("héllo wörld", 5), "héllo");
        assert_eq!(preview("short", 1000), "short");
        assert_eq!(preview("", 3), "");
    }

    #[test]
    fn hits_are_ranked_with_three_decimal_scores() {
        let rendered = hits(&[
            RetrievalHit { score: 0.91234, text: "The sky is blue.".into() },
            RetrievalHit { score: 0.5, text: "The grass is green.".into() },
        ]);
        assert_eq!(
            rendered,
            "Chunk 1 (score 0.912)\nThe sky is blue.\n\n\
             Chunk 2 (score 0.500)\nThe grass is green.\n\n"
        );
    }

    #[test]
    fn long_chunks_are_truncated() {
        let text = "x".repeat(PREVIEW_CHARS + 50);
        let rendered = hits(&[RetrievalHit { score: 1.0, text }]);
        assert!(rendered.contains(&"x".repeat(PREVIEW_CHARS)));
        assert!(!rendered.contains(&"x".repeat(PREVIEW_CHARS + 1)));
    }

    #[test]
    fn answer_follows_its_context() {
        let rendered = answer(&Answer {
            text: "The sky is blue.".into(),
            hits: vec![RetrievalHit { score: 0.8, text: "The sky is blue.".into() }],
        });
        let context_at = rendered.find("Chunk 1").unwrap();
        let answer_at = rendered.find("Answer:\nThe sky is blue.").unwrap();
        assert!(context_at < answer_at);
    }

    #[test]
    fn document_info_names_the_document() {
        assert_eq!(document_info(None), "No document loaded.");
        let doc = LoadedDocument {
            name: "notes.txt".into(),
            store: Arc::new(VectorStore::empty(3)),
            loaded_at: "2024-05-01T12:00:00Z".parse().unwrap(),
        };
        assert_eq!(
            document_info(Some(&doc)),
            "notes.txt (0 chunks, loaded 2024-05-01 12:00:00 UTC)"
        );
    }

    #[test]
    fn errors_map_to_guidance() {
        assert!(error(&RagError::EmptyStoreQuery).starts_with("Upload a document first."));
        let timeout = RagError::GenerationTimeout { timeout: Duration::from_secs(5) };
        assert!(error(&timeout).contains("Ollama"));
        assert!(error(&RagError::Config("top_k must be positive".into())).starts_with("Invalid"));
    }
}
