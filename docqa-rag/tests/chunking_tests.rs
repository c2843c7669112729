//! Property tests for token-window chunking.

use docqa_rag::{Chunker, RagError, TokenWindowChunker};
use proptest::prelude::*;

/// Generate a chunk size and an overlap strictly smaller than it.
fn arb_window() -> impl Strategy<Value = (usize, usize)> {
    (1usize..12).prop_flat_map(|size| (Just(size), 0..size))
}

/// Generate text from short tokens separated by mixed whitespace.
fn arb_text() -> impl Strategy<Value = String> {
    let separator = prop_oneof![Just(" "), Just("\n"), Just("\t  ")];
    proptest::collection::vec(("[a-z0-9.,]{1,6}", separator), 0..60)
        .prop_map(|parts| parts.into_iter().map(|(token, sep)| format!("{token}{sep}")).collect())
}

mod prop_token_windows {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Every chunk fits the window and the step-sized prefixes rebuild the token stream.
        #[test]
        fn chunks_are_bounded_and_reconstruct_tokens(
            (size, overlap) in arb_window(),
            text in arb_text(),
        ) {
            let chunker = TokenWindowChunker::new(size, overlap).unwrap();
            let chunks = chunker.chunk(&text);
            let tokens: Vec<&str> = text.split_whitespace().collect();

            let step = size - overlap;
            prop_assert_eq!(chunks.len(), tokens.len().div_ceil(step));

            let mut rebuilt: Vec<&str> = Vec::new();
            for chunk in &chunks {
                let chunk_tokens: Vec<&str> = chunk.split_whitespace().collect();
                prop_assert!(!chunk_tokens.is_empty());
                prop_assert!(chunk_tokens.len() <= size);
                rebuilt.extend(chunk_tokens.into_iter().take(step));
            }
            prop_assert_eq!(rebuilt, tokens);
        }

        /// Consecutive chunks share at most the declared overlap, token for token.
        #[test]
        fn consecutive_chunks_share_overlap(
            (size, overlap) in arb_window(),
            text in arb_text(),
        ) {
            let chunker = TokenWindowChunker::new(size, overlap).unwrap();
            let chunks = chunker.chunk(&text);
            let step = size - overlap;

            for pair in chunks.windows(2) {
                let left: Vec<&str> = pair[0].split_whitespace().collect();
                let right: Vec<&str> = pair[1].split_whitespace().collect();
                prop_assert!(left.len() >= step);
                let shared = left.len() - step;
                prop_assert!(shared <= overlap);
                prop_assert_eq!(&left[step..], &right[..shared]);
            }
        }

        /// Overlaps that would stall the window are rejected up front.
        #[test]
        fn non_advancing_windows_are_rejected(size in 0usize..20, extra in 0usize..5) {
            let result = TokenWindowChunker::new(size, size + extra);
            prop_assert!(matches!(result, Err(RagError::Config(_))));
        }
    }
}

#[test]
fn source_example_splits_as_documented() {
    let chunker = TokenWindowChunker::new(5, 1).unwrap();
    assert_eq!(
        chunker.chunk("The sky is blue. The grass is green."),
        vec!["The sky is blue. The", "The grass is green."]
    );
}
