//! Deterministic embedders and generators shared by the integration tests.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use docqa_rag::{EmbeddingProvider, Generator, NO_ANSWER, RagError, Result};

/// Lowercase a token and strip surrounding punctuation.
pub fn normalize_word(token: &str) -> String {
    token.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase()
}

/// Bag-of-words embedder over a fixed vocabulary; unknown words are ignored.
pub struct KeywordEmbedder {
    vocabulary: Vec<&'static str>,
    calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn new(vocabulary: &[&'static str]) -> Self {
        Self { vocabulary: vocabulary.to_vec(), calls: AtomicUsize::new(0) }
    }

    pub fn colors() -> Self {
        Self::new(&["sky", "blue", "grass", "green", "color", "the", "is", "photosynthesis"])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut vector = vec![0.0; self.vocabulary.len()];
        for token in text.split_whitespace() {
            let word = normalize_word(token);
            if let Some(slot) = self.vocabulary.iter().position(|v| *v == word) {
                vector[slot] += 1.0;
            }
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Hash-based embedder whose direction depends on the full text.
pub struct HashEmbedder {
    pub dimensions: usize,
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        Ok((0..self.dimensions as u64)
            .map(|i| {
                let mixed = splitmix64(hash ^ i.wrapping_mul(0x9E37_79B9_7F4A_7C15));
                (mixed >> 40) as f32 / (1u64 << 23) as f32 - 1.0
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Embedder that claims one dimension and produces another.
pub struct LyingEmbedder;

#[async_trait]
impl EmbeddingProvider for LyingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![1.0, 0.0, 0.0])
    }

    fn dimensions(&self) -> usize {
        4
    }
}

/// Split a grounded prompt into its context and question sections.
pub fn split_prompt(prompt: &str) -> (&str, &str) {
    let (head, question) = prompt.split_once("\n\nQuestion:\n").expect("question section");
    let (_, context) = head.split_once("Context:\n").expect("context section");
    (context, question.trim())
}

const STOPWORDS: &[&str] = &["what", "is", "the", "a", "an", "of", "color", "which", "does"];

/// Generator that follows the grounding instruction literally: it answers with the first
/// context sentence mentioning a content word of the question, or with the sentinel.
#[derive(Default)]
pub struct GroundedGenerator {
    prompts: Mutex<Vec<String>>,
}

impl GroundedGenerator {
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for GroundedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let (context, question) = split_prompt(prompt);
        let keywords: Vec<String> = question
            .split_whitespace()
            .map(normalize_word)
            .filter(|w| !w.is_empty() && !STOPWORDS.contains(&w.as_str()))
            .collect();

        let sentence = context.split('.').map(str::trim).find(|sentence| {
            sentence.split_whitespace().map(normalize_word).any(|w| keywords.contains(&w))
        });
        Ok(match sentence {
            Some(sentence) => format!("  {sentence}.\n"),
            None => format!("{NO_ANSWER}\n"),
        })
    }

    fn name(&self) -> &str {
        "grounded"
    }
}

/// Generator that never finishes within any reasonable timeout.
pub struct SlowGenerator;

#[async_trait]
impl Generator for SlowGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok("too late".into())
    }
}

/// Generator whose backend is down.
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(RagError::Generation {
            provider: "failing".into(),
            message: "connection refused".into(),
        })
    }
}
