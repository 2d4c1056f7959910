//! Text-to-vector embedding providers.
//!
//! The matcher only sees the narrow [`Embedder`] trait, so the matching
//! logic runs the same against the ONNX sentence model, the offline
//! hashing embedder, or a fixed-vector fake in tests.

pub mod hashing;
pub mod onnx;
pub mod tokenize;

pub use hashing::HashingEmbedder;
pub use onnx::OnnxEmbedder;

use std::sync::Arc;
use thiserror::Error;

use crate::config::{Number, ProviderKind, Settings};

pub type Embedding = Vec<Number>;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("failed to load embedding model: {0}")]
    LoadFailed(String),

    #[error("failed to tokenize text: {0}")]
    Tokenize(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("unexpected model output: {0}")]
    Shape(String),

    #[error("embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid embedding dimensions: {0}")]
    InvalidDimensions(usize),

    #[error("embedding contains NaN or infinite values")]
    NonFinite,
}

/// A deterministic text-to-vector function shared across request handlers.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Embedding, EmbedError>;

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    fn dimensions(&self) -> usize;

    fn model_name(&self) -> &str;
}

/// Build the provider selected in `settings`.
pub fn from_settings(settings: &Settings) -> Result<Arc<dyn Embedder>, EmbedError> {
    let embedder: Arc<dyn Embedder> = match settings.provider {
        ProviderKind::Onnx => Arc::new(OnnxEmbedder::load(
            &settings.model_dir,
            settings.max_length,
        )?),
        ProviderKind::Hashing => Arc::new(HashingEmbedder::new(settings.hashing_dimensions)?),
    };
    tracing::info!(
        provider = %settings.provider,
        model = embedder.model_name(),
        dimensions = embedder.dimensions(),
        "embedding provider ready"
    );
    Ok(embedder)
}
