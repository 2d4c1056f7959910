use thiserror::Error;

use crate::embedder::EmbedError;

/// Failures surfaced by the knowledge base and matcher.
#[derive(Debug, Error)]
pub enum FaqError {
    /// The provider failed while embedding the FAQ questions. Fatal at startup.
    #[error("knowledge base initialization failed: could not embed FAQ questions")]
    Initialization(#[source] EmbedError),

    /// The entries and vectors do not form a usable knowledge base. Fatal at
    /// startup.
    #[error("knowledge base initialization failed: {0}")]
    InvalidKnowledgeBase(String),

    /// The provider failed on one query. Other queries are unaffected.
    #[error("failed to embed query: {0}")]
    QueryEmbedding(#[source] EmbedError),
}

impl FaqError {
    /// Whether this error happened while building the knowledge base.
    pub fn is_initialization(&self) -> bool {
        matches!(self, Self::Initialization(_) | Self::InvalidKnowledgeBase(_))
    }
}

pub type FaqResult<T> = std::result::Result<T, FaqError>;
