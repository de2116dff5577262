//! Vector index lookup for reference-document excerpts
//!
//! Queries are embedded through an OpenAI-compatible embeddings endpoint,
//! then matched against a Pinecone-style index. Document text lives in the
//! `content` metadata key, the same place the ingestion side writes it.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::RetrievalError;
use crate::config::{IndexConfig, LlmConfig};

/// Semantic lookup over ingested reference documents
#[async_trait]
pub trait DocumentIndex: Send + Sync {
    /// Up to `k` document excerpts semantically closest to `query`
    async fn similar_documents(&self, query: &str, k: usize) -> Result<Vec<String>, RetrievalError>;
}

/// Pinecone-style index client
pub struct PineconeIndex {
    api_key: String,
    query_url: String,
    embed_url: String,
    embed_key: String,
    embed_model: String,
    http: Client,
}

impl PineconeIndex {
    /// Create a client from configuration
    ///
    /// Needs both the index credential and the embeddings credential; both
    /// are validated at startup, so absence here is a hard error.
    pub fn from_config(index: &IndexConfig, llm: &LlmConfig) -> Result<Self, RetrievalError> {
        let api_key = std::env::var(&index.api_key_env)
            .map_err(|_| RetrievalError::MissingCredential(index.api_key_env.clone()))?;
        let embed_key = std::env::var(&llm.api_key_env)
            .map_err(|_| RetrievalError::MissingCredential(llm.api_key_env.clone()))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(index.timeout_ms))
            .build()?;

        Ok(Self {
            api_key,
            query_url: format!("{}/query", index.query_host()),
            embed_url: format!("{}/embeddings", llm.base_url),
            embed_key,
            embed_model: index.embed_model.clone(),
            http,
        })
    }

    /// Embed a query string into a vector
    async fn embed(&self, query: &str) -> Result<Vec<f32>, RetrievalError> {
        debug!(query_len = query.len(), "embed: called");
        let response = self
            .http
            .post(&self.embed_url)
            .bearer_auth(&self.embed_key)
            .json(&serde_json::json!({
                "model": self.embed_model,
                "input": query,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RetrievalError::InvalidResponse(format!(
                "embedding request returned status {}",
                response.status().as_u16()
            )));
        }

        let body: EmbeddingResponse = response.json().await?;
        body.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| RetrievalError::InvalidResponse("embedding response contained no data".to_string()))
    }
}

#[async_trait]
impl DocumentIndex for PineconeIndex {
    async fn similar_documents(&self, query: &str, k: usize) -> Result<Vec<String>, RetrievalError> {
        debug!(%query, k, "similar_documents: called");
        let vector = self.embed(query).await?;

        let response = self
            .http
            .post(&self.query_url)
            .header("Api-Key", &self.api_key)
            .json(&serde_json::json!({
                "vector": vector,
                "topK": k,
                "includeMetadata": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RetrievalError::InvalidResponse(format!(
                "index query returned status {}",
                response.status().as_u16()
            )));
        }

        let body: QueryResponse = response.json().await?;
        let docs = body
            .matches
            .into_iter()
            .filter_map(|m| m.metadata.and_then(|md| md.content))
            .collect();

        Ok(docs)
    }
}

// Embeddings API response types

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

// Index query response types

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    metadata: Option<MatchMetadata>,
}

#[derive(Debug, Deserialize)]
struct MatchMetadata {
    content: Option<String>,
}
