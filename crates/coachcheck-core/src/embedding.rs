use std::hash::{DefaultHasher, Hash, Hasher};

use async_trait::async_trait;

use crate::{error::Result, types::SearchHit};

/// The external embedding/index collaborator. The host constructs one
/// instance and reuses it across validation calls; the validator never
/// builds its own.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a text into a fixed-dimensionality vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Retrieve the top-k reference passages most relevant to the query.
    /// Providers without a reference corpus return an empty list.
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>>;
}

/// Cosine similarity between two vectors. Zero-norm inputs score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Score candidate vectors against a query, highest first, ties broken by
/// original position. This is the one ranking used everywhere so results
/// stay deterministic for deterministic collaborators.
pub fn rank_by_similarity(query: &[f32], candidates: &[Vec<f32>]) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = candidates
        .iter()
        .enumerate()
        .map(|(i, vector)| (i, cosine_similarity(query, vector)))
        .collect();
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    scored
}

const DEFAULT_DIMENSIONS: usize = 384;

/// Deterministic offline provider: bag-of-words hashed into a fixed number
/// of dimensions, L2-normalized. No model download, no network, identical
/// output across processes. Useful for tests and the CLI's offline mode.
pub struct HashingEmbedder {
    dimensions: usize,
    corpus: Vec<String>,
}

impl HashingEmbedder {
    pub fn new() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
            corpus: Vec::new(),
        }
    }

    /// Attach reference passages for `search` to rank against.
    pub fn with_corpus(corpus: Vec<String>) -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
            corpus,
        }
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|w| !w.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let index = (hasher.finish() % self.dimensions as u64) as usize;
            vector[index] += 1.0;
        }
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        let query_vector = self.embed_sync(query);
        let vectors: Vec<Vec<f32>> = self.corpus.iter().map(|p| self.embed_sync(p)).collect();
        Ok(rank_by_similarity(&query_vector, &vectors)
            .into_iter()
            .take(top_k)
            .map(|(i, score)| SearchHit {
                text: self.corpus[i].clone(),
                chapter: None,
                page: None,
                score: score as f64,
            })
            .collect())
    }
}
