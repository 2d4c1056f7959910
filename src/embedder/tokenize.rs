// Tokenization wrapper for BERT-style sentence models

use std::path::Path;
use tokenizers::{Tokenizer, TruncationParams};

use super::EmbedError;

pub struct SentenceTokenizer {
    tokenizer: Tokenizer,
}

/// Token ids ready for model inference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedInput {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
    pub token_type_ids: Vec<i64>,
}

impl TokenizedInput {
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }
}

impl SentenceTokenizer {
    /// Load `tokenizer.json`, truncating encodings to `max_length` tokens
    /// (special tokens included).
    pub fn from_file(path: &Path, max_length: usize) -> Result<Self, EmbedError> {
        let mut tokenizer = Tokenizer::from_file(path)
            .map_err(|e| EmbedError::LoadFailed(format!("{}: {}", path.display(), e)))?;

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| EmbedError::LoadFailed(format!("invalid truncation: {}", e)))?;
        tokenizer.with_padding(None);

        Ok(Self { tokenizer })
    }

    pub fn encode(&self, text: &str) -> Result<TokenizedInput, EmbedError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| EmbedError::Tokenize(e.to_string()))?;

        Ok(TokenizedInput {
            input_ids: encoding.get_ids().iter().map(|&id| id as i64).collect(),
            attention_mask: encoding
                .get_attention_mask()
                .iter()
                .map(|&m| m as i64)
                .collect(),
            token_type_ids: encoding.get_type_ids().iter().map(|&id| id as i64).collect(),
        })
    }

    pub fn encode_batch(&self, texts: &[String]) -> Result<Vec<TokenizedInput>, EmbedError> {
        texts.iter().map(|text| self.encode(text)).collect()
    }
}

/// Right-pad every input to the longest one. Returns the padded batch and its
/// sequence length.
pub fn pad_batch(inputs: Vec<TokenizedInput>) -> (Vec<TokenizedInput>, usize) {
    let max_len = inputs.iter().map(TokenizedInput::len).max().unwrap_or(0);

    let padded = inputs
        .into_iter()
        .map(|mut input| {
            let pad_len = max_len - input.len();
            input.input_ids.extend(std::iter::repeat(0).take(pad_len));
            input.attention_mask.extend(std::iter::repeat(0).take(pad_len));
            input.token_type_ids.extend(std::iter::repeat(0).take(pad_len));
            input
        })
        .collect();

    (padded, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(ids: &[i64]) -> TokenizedInput {
        TokenizedInput {
            input_ids: ids.to_vec(),
            attention_mask: vec![1; ids.len()],
            token_type_ids: vec![0; ids.len()],
        }
    }

    #[test]
    fn test_pad_batch_right_pads_with_masked_zeros() {
        let (padded, seq_len) = pad_batch(vec![input(&[101, 7592, 102]), input(&[101, 102])]);
        assert_eq!(seq_len, 3);
        assert_eq!(padded[1].input_ids, vec![101, 102, 0]);
        assert_eq!(padded[1].attention_mask, vec![1, 1, 0]);
        assert_eq!(padded[1].token_type_ids, vec![0, 0, 0]);
        assert_eq!(padded[0], input(&[101, 7592, 102]));
    }

    #[test]
    fn test_pad_empty_batch() {
        let (padded, seq_len) = pad_batch(Vec::new());
        assert!(padded.is_empty());
        assert_eq!(seq_len, 0);
    }

    #[test]
    fn test_missing_tokenizer_file() {
        let result = SentenceTokenizer::from_file(Path::new("/nonexistent/tokenizer.json"), 256);
        assert!(matches!(result, Err(EmbedError::LoadFailed(_))));
    }
}
