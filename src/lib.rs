//! Dental FAQ matcher.
//!
//! A free-text question is embedded, compared against the reference
//! embeddings of a fixed set of dental FAQ questions by cosine similarity,
//! and answered with the answer of the closest question. There is no
//! similarity floor: every query gets the best available answer.

pub mod bot;
pub mod config;
pub mod embedder;
pub mod error;
pub mod faq;
pub mod knowledge_base;
pub mod matcher;
pub mod server;
pub mod vector_ops;

pub use bot::FaqBot;
pub use embedder::{EmbedError, Embedder, HashingEmbedder, OnnxEmbedder};
pub use error::{FaqError, FaqResult};
pub use faq::{dental_faq, FaqEntry};
pub use knowledge_base::{initialize, KnowledgeBase};
pub use matcher::{match_query, Match};
