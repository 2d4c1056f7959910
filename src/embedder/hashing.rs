//! Offline feature-hashing embedder.
//!
//! Each content token lands in one bucket picked by its SHA-256 digest, with a
//! digest-derived sign, and the vector is L2 normalised. Texts sharing
//! content words score high; everything else scores near zero. No model files
//! are needed, and the same text always yields the same vector.

use sha2::{Digest, Sha256};

use super::{EmbedError, Embedder, Embedding};
use crate::config::Number;
use crate::vector_ops::normalize_vector;

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "am", "do", "does", "did", "i", "my", "me", "you", "your",
    "to", "of", "for", "and", "or", "what", "why", "how", "when", "where", "which", "who",
    "that", "this", "it", "its", "be", "can", "could", "should", "would", "will", "while",
    "with", "in", "on", "at", "by", "from", "so", "some", "any", "there",
];

pub struct HashingEmbedder {
    dimensions: usize,
    model_name: String,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Result<Self, EmbedError> {
        if dimensions == 0 {
            return Err(EmbedError::InvalidDimensions(dimensions));
        }
        Ok(Self {
            dimensions,
            model_name: format!("hashing-sha256-d{}", dimensions),
        })
    }

    /// Lowercased content tokens with a light suffix strip ("brushing" -> "brush",
    /// "gums" -> "gum").
    pub fn tokens(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|raw| !raw.is_empty() && !STOP_WORDS.contains(raw))
            .map(stem)
            .collect()
    }

    fn bucket(&self, token: &str) -> (usize, Number) {
        let digest = Sha256::digest(token.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        let index = (u64::from_le_bytes(head) % self.dimensions as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }
}

fn stem(raw: &str) -> String {
    let mut token = raw.to_string();
    if token.len() > 5 && token.ends_with("ing") {
        token.truncate(token.len() - 3);
    }
    if token.len() > 3 && token.ends_with('s') && !token.ends_with("ss") {
        token.truncate(token.len() - 1);
    }
    token
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Embedding, EmbedError> {
        let mut vector = vec![0.0; self.dimensions];
        for token in Self::tokens(text) {
            let (index, sign) = self.bucket(&token);
            vector[index] += sign;
        }
        normalize_vector(&mut vector);
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_ops::compute_cosine_similarity_simd;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            HashingEmbedder::new(0),
            Err(EmbedError::InvalidDimensions(0))
        ));
    }

    #[test]
    fn test_tokens_drop_stop_words_and_strip_suffixes() {
        assert_eq!(
            HashingEmbedder::tokens("Why do gums bleed while brushing?"),
            vec!["gum", "bleed", "brush"]
        );
        assert_eq!(
            HashingEmbedder::tokens("Is teeth grinding harmful?"),
            vec!["teeth", "grind", "harmful"]
        );
        assert_eq!(HashingEmbedder::tokens("glass"), vec!["glass"]);
        assert!(HashingEmbedder::tokens("  ?! ").is_empty());
    }

    #[test]
    fn test_embedding_is_deterministic_and_normalized() {
        let embedder = HashingEmbedder::new(64).unwrap();
        let a = embedder.embed("How can I fix bad breath?").unwrap();
        let b = embedder.embed("How can I fix bad breath?").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        let norm: Number = a.iter().map(|x| x * x).sum::<Number>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(32).unwrap();
        let v = embedder.embed("").unwrap();
        assert_eq!(v, vec![0.0; 32]);
    }

    #[test]
    fn test_shared_words_score_higher() {
        let embedder = HashingEmbedder::new(384).unwrap();
        let query = embedder.embed("my gums bleed").unwrap();
        let near = embedder.embed("Why do gums bleed while brushing?").unwrap();
        let far = embedder.embed("Do braces hurt?").unwrap();
        let near_sim = compute_cosine_similarity_simd(&query, &near).unwrap();
        let far_sim = compute_cosine_similarity_simd(&query, &far).unwrap();
        assert!(near_sim > far_sim);
    }

    #[test]
    fn test_model_name_includes_dimensions() {
        let embedder = HashingEmbedder::new(128).unwrap();
        assert_eq!(embedder.model_name(), "hashing-sha256-d128");
        assert_eq!(embedder.dimensions(), 128);
    }
}
