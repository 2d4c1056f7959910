use std::time::Instant;

use crate::config::Number;
use crate::embedder::{Embedder, Embedding};
use crate::error::{FaqError, FaqResult};
use crate::faq::{dental_faq, FaqEntry};
use crate::vector_ops::{is_finite_vector, normalize_vector};

/// FAQ entries with one reference embedding per question, same index.
///
/// Built once before any query is served and read-only afterwards, so it can
/// be shared across threads without synchronisation.
#[derive(Debug)]
pub struct KnowledgeBase {
    entries: Vec<FaqEntry>,
    embeddings: Vec<Embedding>,
    dimensions: usize,
}

impl KnowledgeBase {
    /// Embed every question with `embedder`.
    ///
    /// Any provider failure aborts the build; no partial knowledge base is
    /// ever returned.
    pub fn build(entries: Vec<FaqEntry>, embedder: &dyn Embedder) -> FaqResult<Self> {
        let started = Instant::now();
        let questions: Vec<String> = entries.iter().map(|e| e.question.clone()).collect();

        let embeddings = embedder
            .embed_batch(&questions)
            .map_err(FaqError::Initialization)?;

        let kb = Self::from_parts(entries, embeddings, embedder.dimensions())?;
        tracing::info!(
            entries = kb.len(),
            dimensions = kb.dimensions,
            model = embedder.model_name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "knowledge base ready"
        );
        Ok(kb)
    }

    /// Assemble from precomputed vectors. Every vector must have `dimensions`
    /// finite elements; vectors are L2 normalised here.
    pub fn from_parts(
        entries: Vec<FaqEntry>,
        mut embeddings: Vec<Embedding>,
        dimensions: usize,
    ) -> FaqResult<Self> {
        if entries.is_empty() {
            return Err(FaqError::InvalidKnowledgeBase(
                "knowledge base has no entries".to_string(),
            ));
        }
        if entries.len() != embeddings.len() {
            return Err(FaqError::InvalidKnowledgeBase(format!(
                "{} entries but {} embeddings",
                entries.len(),
                embeddings.len()
            )));
        }
        if let Some((i, bad)) = embeddings
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != dimensions)
        {
            return Err(FaqError::InvalidKnowledgeBase(format!(
                "embedding for {:?} has {} dimensions, expected {}",
                entries[i].question,
                bad.len(),
                dimensions
            )));
        }
        if let Some(i) = embeddings.iter().position(|v| !is_finite_vector(v)) {
            return Err(FaqError::InvalidKnowledgeBase(format!(
                "embedding for {:?} contains NaN or infinite values",
                entries[i].question
            )));
        }

        for vector in embeddings.iter_mut() {
            normalize_vector(vector);
        }

        Ok(Self {
            entries,
            embeddings,
            dimensions,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&FaqEntry> {
        self.entries.get(index)
    }

    pub fn embeddings(&self) -> &[Embedding] {
        &self.embeddings
    }

    pub fn embedding(&self, index: usize) -> Option<&[Number]> {
        self.embeddings.get(index).map(Vec::as_slice)
    }
}

/// Build the knowledge base for the built-in dental FAQ.
pub fn initialize(embedder: &dyn Embedder) -> FaqResult<KnowledgeBase> {
    KnowledgeBase::build(dental_faq(), embedder)
}
