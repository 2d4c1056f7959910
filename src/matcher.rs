use rayon::prelude::*;
use std::time::{Duration, Instant};

use crate::config::Number;
use crate::embedder::{EmbedError, Embedder};
use crate::error::{FaqError, FaqResult};
use crate::faq::FaqEntry;
use crate::knowledge_base::KnowledgeBase;
use crate::vector_ops::{argmax, compute_cosine_similarity_simd, is_finite_vector, normalize_vector};

#[derive(Debug, Default, Clone, Copy)]
pub struct MatchTimings {
    pub embed_duration: Duration,
    pub score_duration: Duration,
    pub total_duration: Duration,
}

/// The single best entry for a query.
#[derive(Debug, Clone)]
pub struct Match<'kb> {
    pub index: usize,
    pub similarity: Number,
    pub entry: &'kb FaqEntry,
    pub timings: MatchTimings,
}

impl<'kb> Match<'kb> {
    pub fn answer(&self) -> &'kb str {
        &self.entry.answer
    }

    pub fn question(&self) -> &'kb str {
        &self.entry.question
    }
}

/// Cosine similarity of `query_vector` against every reference embedding, in
/// entry order.
pub fn score_all(query_vector: &[Number], kb: &KnowledgeBase) -> Vec<Number> {
    kb.embeddings()
        .par_iter()
        .map(|reference| {
            // Lengths are checked before scoring; a mismatch ranks last.
            compute_cosine_similarity_simd(query_vector, reference).unwrap_or(-1.0)
        })
        .collect()
}

/// Pick the highest-scoring entry for an already embedded query.
///
/// Always returns an entry: there is no similarity floor. Ties go to the
/// lowest index.
pub fn best_match<'kb>(query_vector: &[Number], kb: &'kb KnowledgeBase) -> Match<'kb> {
    let started = Instant::now();
    let scores = score_all(query_vector, kb);
    // A knowledge base is never empty, so the fallback index is never used.
    let index = argmax(&scores).unwrap_or(0);
    let score_duration = started.elapsed();

    Match {
        index,
        similarity: scores.get(index).copied().unwrap_or(0.0),
        entry: &kb.entries()[index],
        timings: MatchTimings {
            score_duration,
            total_duration: score_duration,
            ..Default::default()
        },
    }
}

/// Embed `query` with the knowledge base's provider and return its best match.
pub fn match_query<'kb>(
    query: &str,
    kb: &'kb KnowledgeBase,
    embedder: &dyn Embedder,
) -> FaqResult<Match<'kb>> {
    let started = Instant::now();

    let mut query_vector = embedder.embed(query).map_err(FaqError::QueryEmbedding)?;
    if query_vector.len() != kb.dimensions() {
        return Err(FaqError::QueryEmbedding(EmbedError::DimensionMismatch {
            expected: kb.dimensions(),
            actual: query_vector.len(),
        }));
    }
    if !is_finite_vector(&query_vector) {
        return Err(FaqError::QueryEmbedding(EmbedError::NonFinite));
    }
    normalize_vector(&mut query_vector);
    let embed_duration = started.elapsed();

    let mut found = best_match(&query_vector, kb);
    found.timings.embed_duration = embed_duration;
    found.timings.total_duration = started.elapsed();

    tracing::debug!(
        index = found.index,
        similarity = found.similarity,
        question = found.question(),
        embed_us = embed_duration.as_micros() as u64,
        total_us = found.timings.total_duration.as_micros() as u64,
        "matched query"
    );
    Ok(found)
}
