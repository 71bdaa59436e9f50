use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::{
    embedding::{EmbeddingProvider, rank_by_similarity},
    error::{Result, ValidatorError},
    types::SearchHit,
};

#[derive(Clone, Debug, Default)]
pub enum Provider {
    #[default]
    Openai,
    Gemini,
}

pub struct ProviderConfig {
    pub api_url: &'static str,
    pub model: &'static str,
    pub env_var: &'static str,
}

impl Provider {
    pub fn config(&self) -> ProviderConfig {
        match self {
            Provider::Openai => ProviderConfig {
                api_url: "https://api.openai.com/v1/embeddings",
                model: "text-embedding-3-small",
                env_var: "OPENAI_API_KEY",
            },
            Provider::Gemini => ProviderConfig {
                api_url: "https://generativelanguage.googleapis.com/v1beta/openai/embeddings",
                model: "gemini-embedding-001",
                env_var: "GEMINI_API_KEY",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Openai => "OpenAI",
            Provider::Gemini => "Gemini",
        }
    }

    /// Validate that the API key is set for this provider
    pub fn validate_api_key(&self) -> Result<String> {
        let config = self.config();
        std::env::var(config.env_var).map_err(|_| ValidatorError::MissingApiKey {
            env_var: config.env_var.to_string(),
        })
    }
}

/// Embedding collaborator backed by a hosted embeddings API. Holds an
/// optional reference corpus whose embeddings are computed once per process
/// and reused for every subsequent `search`.
pub struct RemoteEmbedder {
    provider: Provider,
    api_key: String,
    client: reqwest::Client,
    corpus: Vec<String>,
    corpus_vectors: OnceCell<Vec<Vec<f32>>>,
}

impl RemoteEmbedder {
    pub fn new(provider: Provider, corpus: Vec<String>) -> Result<Self> {
        let api_key = provider.validate_api_key()?;
        Ok(Self {
            provider,
            api_key,
            client: reqwest::Client::new(),
            corpus,
            corpus_vectors: OnceCell::new(),
        })
    }

    async fn embed_remote(&self, text: &str) -> Result<Vec<f32>> {
        let config = self.provider.config();
        let response = self
            .client
            .post(config.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": config.model,
                "input": text,
            }))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        let values = response["data"][0]["embedding"].as_array().ok_or_else(|| {
            ValidatorError::Collaborator {
                reason: format!("invalid embeddings response: {:?}", response),
            }
        })?;

        Ok(values
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect())
    }

    async fn corpus_vectors(&self) -> Result<&Vec<Vec<f32>>> {
        self.corpus_vectors
            .get_or_try_init(|| async {
                debug!(passages = self.corpus.len(), "embedding reference corpus");
                let mut vectors = Vec::with_capacity(self.corpus.len());
                for passage in &self.corpus {
                    vectors.push(self.embed_remote(passage).await?);
                }
                Ok(vectors)
            })
            .await
    }
}

#[async_trait]
impl EmbeddingProvider for RemoteEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_remote(text).await
    }

    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        if self.corpus.is_empty() {
            return Ok(Vec::new());
        }
        let query_vector = self.embed_remote(query).await?;
        let vectors = self.corpus_vectors().await?;
        Ok(rank_by_similarity(&query_vector, vectors)
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
