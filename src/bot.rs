use std::sync::Arc;

use crate::embedder::Embedder;
use crate::error::FaqResult;
use crate::faq::{dental_faq, FaqEntry};
use crate::knowledge_base::KnowledgeBase;
use crate::matcher::{match_query, Match};

/// Process-wide matching context: the knowledge base plus the provider that
/// embedded it.
///
/// Constructed once at startup and shared behind an `Arc`; every method takes
/// `&self`, so concurrent requests need no locking.
pub struct FaqBot {
    kb: KnowledgeBase,
    embedder: Arc<dyn Embedder>,
}

impl FaqBot {
    /// Build the context for the built-in dental FAQ.
    pub fn initialize(embedder: Arc<dyn Embedder>) -> FaqResult<Self> {
        Self::with_entries(dental_faq(), embedder)
    }

    pub fn with_entries(entries: Vec<FaqEntry>, embedder: Arc<dyn Embedder>) -> FaqResult<Self> {
        let kb = KnowledgeBase::build(entries, embedder.as_ref())?;
        Ok(Self { kb, embedder })
    }

    pub fn answer(&self, query: &str) -> FaqResult<Match<'_>> {
        match_query(query, &self.kb, self.embedder.as_ref())
    }

    /// The answer text for `query`.
    pub fn reply(&self, query: &str) -> FaqResult<String> {
        self.answer(query).map(|found| found.answer().to_string())
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }
}
