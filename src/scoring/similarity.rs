//! Text similarity primitive used by the consistency checks

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Text-similarity collaborator.
///
/// Contract: result in 0-1, and `similarity(x, x) == 1.0`.
pub trait Similarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

impl<F> Similarity for F
where
    F: Fn(&str, &str) -> f64 + Send + Sync,
{
    fn similarity(&self, a: &str, b: &str) -> f64 {
        self(a, b)
    }
}

static TOKEN_PATTERN: OnceLock<Regex> = OnceLock::new();

fn get_token_pattern() -> &'static Regex {
    TOKEN_PATTERN.get_or_init(|| Regex::new(r"[a-z0-9]+").unwrap())
}

/// Words too common to say anything about overlap between two stages
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "can", "for", "from", "has", "have", "in",
    "into", "is", "it", "its", "of", "on", "or", "so", "that", "the", "their", "this", "to",
    "was", "will", "with",
];

/// Term-frequency cosine similarity over lowercase word tokens.
///
/// Identical inputs score exactly 1.0; a side with no usable tokens scores 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenCosineSimilarity;

impl TokenCosineSimilarity {
    fn term_frequencies(text: &str) -> BTreeMap<String, f64> {
        let lowered = text.to_lowercase();
        let mut counts = BTreeMap::new();
        for token in get_token_pattern().find_iter(&lowered) {
            let word = token.as_str();
            if STOP_WORDS.contains(&word) {
                continue;
            }
            *counts.entry(word.to_string()).or_insert(0.0) += 1.0;
        }
        counts
    }
}

impl Similarity for TokenCosineSimilarity {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }

        let left = Self::term_frequencies(a);
        let right = Self::term_frequencies(b);
        if left.is_empty() || right.is_empty() {
            return 0.0;
        }

        let dot: f64 = left
            .iter()
            .filter_map(|(term, count)| right.get(term).map(|other| count * other))
            .sum();
        let norm_left = left.values().map(|c| c * c).sum::<f64>().sqrt();
        let norm_right = right.values().map(|c| c * c).sum::<f64>().sqrt();

        (dot / (norm_left * norm_right)).clamp(0.0, 1.0)
    }
}
