use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::Arc;

use dental_faq::embedder::Embedding;
use dental_faq::matcher::{best_match, score_all};
use dental_faq::{
    dental_faq, initialize, match_query, EmbedError, Embedder, FaqBot, FaqEntry, FaqError,
    HashingEmbedder, KnowledgeBase,
};

fn hashing_bot() -> FaqBot {
    FaqBot::initialize(Arc::new(HashingEmbedder::new(384).unwrap())).unwrap()
}

#[test]
fn every_stored_question_matches_its_own_answer() {
    let bot = hashing_bot();
    for (i, entry) in dental_faq().iter().enumerate() {
        let found = bot.answer(&entry.question).unwrap();
        assert_eq!(found.index, i, "question {:?}", entry.question);
        assert_eq!(found.answer(), entry.answer);
        assert!((found.similarity - 1.0).abs() < 1e-5);
    }
}

#[test]
fn matching_is_deterministic() {
    let bot = hashing_bot();
    let query = "what should I eat for healthy teeth";
    let first = bot.answer(query).unwrap();
    let second = bot.answer(query).unwrap();
    assert_eq!(first.index, second.index);
    assert_eq!(first.similarity, second.similarity);
    assert_eq!(first.answer(), second.answer());
}

#[test]
fn answer_is_always_a_stored_answer() {
    let bot = hashing_bot();
    let answers: HashSet<String> = dental_faq().into_iter().map(|e| e.answer).collect();
    for query in [
        "How do I get whiter teeth?",
        "My tooth hurts a lot",
        "Should I floss every day?",
        "zzzz",
        "1234 5678",
        "¿Qué es una caries?",
    ] {
        let reply = bot.reply(query).unwrap();
        assert!(!reply.is_empty());
        assert!(answers.contains(&reply), "{:?} produced {:?}", query, reply);
    }
}

#[test]
fn paraphrased_bleeding_gums_question() {
    let bot = hashing_bot();
    let found = bot
        .answer("My gums bleed when I brush, is that normal?")
        .unwrap();
    assert_eq!(found.question(), "Why do gums bleed while brushing?");
    assert_eq!(
        found.answer(),
        "Bleeding gums can be a sign of gingivitis or improper brushing technique."
    );
}

#[test]
fn exact_extraction_question() {
    let bot = hashing_bot();
    assert_eq!(
        bot.reply("Is tooth extraction painful?").unwrap(),
        "Extractions are done under anesthesia, so pain is minimal; some soreness afterward is normal."
    );
}

#[test]
fn out_of_domain_query_still_gets_best_guess() {
    let bot = hashing_bot();
    let found = bot.answer("What is the capital of France?").unwrap();
    assert!(found.index < bot.knowledge_base().len());
    assert!(dental_faq().iter().any(|e| e.answer == found.answer()));
}

// With the hashing provider an empty query embeds to the zero vector, every
// score is 0.0 and the first entry wins the tie.
#[test]
fn empty_query_falls_back_to_first_entry() {
    let bot = hashing_bot();
    let found = bot.answer("").unwrap();
    assert_eq!(found.index, 0);
    assert_eq!(found.similarity, 0.0);
    assert_eq!(
        found.answer(),
        "Cavities are caused by bacteria producing acids that erode the tooth enamel."
    );
}

/// Random but repeatable vectors keyed by text.
struct RandomEmbedder {
    dimensions: usize,
}

impl Embedder for RandomEmbedder {
    fn embed(&self, text: &str) -> Result<Embedding, EmbedError> {
        let seed = text
            .bytes()
            .fold(0xcbf29ce484222325u64, |h, b| (h ^ b as u64).wrapping_mul(0x100000001b3));
        let mut rng = StdRng::seed_from_u64(seed);
        Ok((0..self.dimensions).map(|_| rng.gen_range(-1.0..1.0)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        "random"
    }
}

#[test]
fn selected_score_is_never_below_another() {
    let embedder = RandomEmbedder { dimensions: 37 };
    let kb = initialize(&embedder).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let query: Vec<f32> = (0..37).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let scores = score_all(&query, &kb);
        let found = best_match(&query, &kb);
        assert!(scores.iter().all(|&s| found.similarity >= s));
        assert!(scores[..found.index].iter().all(|&s| s < found.similarity));
    }
}

struct FlakyEmbedder {
    inner: HashingEmbedder,
}

impl Embedder for FlakyEmbedder {
    fn embed(&self, text: &str) -> Result<Embedding, EmbedError> {
        if text.len() > 64 {
            return Err(EmbedError::Tokenize(format!("{} bytes exceeds limit", text.len())));
        }
        self.inner.embed(text)
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn model_name(&self) -> &str {
        "flaky"
    }
}

#[test]
fn query_failure_leaves_knowledge_base_usable() {
    let embedder = FlakyEmbedder {
        inner: HashingEmbedder::new(384).unwrap(),
    };
    let kb = initialize(&embedder).unwrap();

    let long_query = "teeth ".repeat(20);
    let err = match_query(&long_query, &kb, &embedder).unwrap_err();
    assert!(matches!(err, FaqError::QueryEmbedding(EmbedError::Tokenize(_))));

    let found = match_query("Do braces hurt?", &kb, &embedder).unwrap();
    assert_eq!(found.index, 24);
}

#[test]
fn initialization_failure_is_fatal() {
    let embedder = FlakyEmbedder {
        inner: HashingEmbedder::new(384).unwrap(),
    };
    let entries = vec![
        FaqEntry::new("short", "ok"),
        FaqEntry::new("x".repeat(100), "too long to embed"),
    ];
    let err = KnowledgeBase::build(entries, &embedder).unwrap_err();
    assert!(matches!(err, FaqError::Initialization(EmbedError::Tokenize(_))));
    assert!(err.is_initialization());
}
