// ONNX sentence-embedding inference via tract
//
// Expects a sentence-transformers export of all-MiniLM-L6-v2 (or any BERT-style
// encoder with the same I/O) in `model_dir`:
//   model.onnx      inputs: input_ids, attention_mask[, token_type_ids]  (i64, [batch, seq])
//                   output 0: last hidden state (f32, [batch, seq, hidden])
//   tokenizer.json  HuggingFace tokenizer

use std::path::Path;
use std::time::Instant;
use tract_onnx::prelude::*;

use super::tokenize::{pad_batch, SentenceTokenizer, TokenizedInput};
use super::{EmbedError, Embedder, Embedding};
use crate::config::Number;
use crate::vector_ops::normalize_vector;

pub const MODEL_FILE: &str = "model.onnx";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const MINILM_DIMENSIONS: usize = 384;

type TractPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

pub struct OnnxEmbedder {
    plan: TractPlan,
    tokenizer: SentenceTokenizer,
    model_name: String,
    dimensions: usize,
    takes_token_types: bool,
}

impl OnnxEmbedder {
    pub fn load(model_dir: &Path, max_length: usize) -> Result<Self, EmbedError> {
        let started = Instant::now();
        let model_path = model_dir.join(MODEL_FILE);
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);

        if !model_path.is_file() {
            return Err(EmbedError::LoadFailed(format!(
                "model file not found: {}",
                model_path.display()
            )));
        }

        let tokenizer = SentenceTokenizer::from_file(&tokenizer_path, max_length)?;

        let plan = tract_onnx::onnx()
            .model_for_path(&model_path)
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| EmbedError::LoadFailed(format!("{}: {}", model_path.display(), e)))?;

        let takes_token_types = plan.model().inputs.len() >= 3;
        let model_name = model_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "onnx".to_string());

        let mut embedder = Self {
            plan,
            tokenizer,
            model_name,
            dimensions: MINILM_DIMENSIONS,
            takes_token_types,
        };

        // Probe once so the reported dimensionality is the model's, not an assumption.
        let probe = embedder.run(&["dimension probe".to_string()])?;
        embedder.dimensions = probe.first().map(Vec::len).unwrap_or(0);
        if embedder.dimensions == 0 {
            return Err(EmbedError::Shape("model produced an empty embedding".to_string()));
        }

        tracing::info!(
            model = %embedder.model_name,
            dimensions = embedder.dimensions,
            token_type_ids = embedder.takes_token_types,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded ONNX sentence model"
        );
        Ok(embedder)
    }

    fn run(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encoded = self.tokenizer.encode_batch(texts)?;
        let (padded, seq_len) = pad_batch(encoded);
        let batch_size = padded.len();

        let mut inputs: TVec<TValue> = tvec![
            input_tensor(&padded, seq_len, |t| &t.input_ids)?.into(),
            input_tensor(&padded, seq_len, |t| &t.attention_mask)?.into(),
        ];
        if self.takes_token_types {
            inputs.push(input_tensor(&padded, seq_len, |t| &t.token_type_ids)?.into());
        }

        let outputs = self
            .plan
            .run(inputs)
            .map_err(|e| EmbedError::Inference(e.to_string()))?;

        let hidden = outputs
            .first()
            .ok_or_else(|| EmbedError::Shape("model returned no outputs".to_string()))?
            .to_array_view::<f32>()
            .map_err(|e| EmbedError::Shape(e.to_string()))?
            .into_dimensionality::<tract_ndarray::Ix3>()
            .map_err(|e| EmbedError::Shape(format!("expected [batch, seq, hidden]: {}", e)))?;

        if hidden.shape()[0] != batch_size {
            return Err(EmbedError::Shape(format!(
                "batch of {} produced {} rows",
                batch_size,
                hidden.shape()[0]
            )));
        }

        let embeddings = padded
            .iter()
            .enumerate()
            .map(|(i, input)| {
                let tokens = hidden.index_axis(tract_ndarray::Axis(0), i);
                let mut pooled = mean_pool(
                    tokens.rows().into_iter().map(|row| row.to_vec()),
                    &input.attention_mask,
                    tokens.shape()[1],
                );
                normalize_vector(&mut pooled);
                pooled
            })
            .collect();

        Ok(embeddings)
    }
}

fn input_tensor<F>(inputs: &[TokenizedInput], seq_len: usize, field: F) -> Result<Tensor, EmbedError>
where
    F: Fn(&TokenizedInput) -> &[i64],
{
    let mut data = Vec::with_capacity(inputs.len() * seq_len);
    for input in inputs {
        data.extend_from_slice(field(input));
    }
    Tensor::from_shape(&[inputs.len(), seq_len], &data).map_err(|e| EmbedError::Shape(e.to_string()))
}

/// Mean of the token rows whose attention mask is set.
fn mean_pool<I>(rows: I, mask: &[i64], hidden_size: usize) -> Vec<Number>
where
    I: IntoIterator<Item = Vec<Number>>,
{
    let mut sum = vec![0.0; hidden_size];
    let mut count = 0.0;
    for (row, &m) in rows.into_iter().zip(mask) {
        if m > 0 {
            for (acc, value) in sum.iter_mut().zip(&row) {
                *acc += value;
            }
            count += 1.0;
        }
    }
    if count > 0.0 {
        sum.iter_mut().for_each(|v| *v /= count);
    }
    sum
}

impl Embedder for OnnxEmbedder {
    fn embed(&self, text: &str) -> Result<Embedding, EmbedError> {
        self.run(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| EmbedError::Inference("empty result".to_string()))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedError> {
        self.run(texts)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
