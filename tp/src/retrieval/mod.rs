//! Retrieval augmentation
//!
//! Gathers the supplementary context handed to the model: nearby places per
//! category and the top-k reference-document excerpts for a destination.
//! Every sub-lookup is best-effort; a failure degrades to empty context and
//! never blocks plan generation.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

mod index;
mod places;

pub use index::{DocumentIndex, PineconeIndex};
pub use places::{NearbyPlace, PlacesProvider, RapidApiPlaces};

/// Errors from the places or index collaborators
///
/// These never escalate past the augmentor; they are logged and replaced
/// with empty context.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("missing credential: {0}")]
    MissingCredential(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Category limits mirroring the original lookup fan-out
const ATTRACTION_LIMIT: usize = 10;
const LODGING_LIMIT: usize = 5;
const TRANSPORT_LIMIT: usize = 5;

/// Assembles the support-context string for a destination
pub struct RetrievalAugmentor {
    places: Arc<dyn PlacesProvider>,
    index: Arc<dyn DocumentIndex>,
    top_k: usize,
    context_budget: usize,
}

impl RetrievalAugmentor {
    /// Create an augmentor over the given collaborators
    pub fn new(
        places: Arc<dyn PlacesProvider>,
        index: Arc<dyn DocumentIndex>,
        top_k: usize,
        context_budget: usize,
    ) -> Self {
        Self {
            places,
            index,
            top_k,
            context_budget,
        }
    }

    /// Build the full support context for a destination
    ///
    /// The three category lookups are independent and run concurrently.
    pub async fn support_context(&self, destination: &str) -> String {
        let (attractions, lodging, transport) = futures::join!(
            self.category(destination, "tourist_attraction", ATTRACTION_LIMIT),
            self.category(destination, "lodging", LODGING_LIMIT),
            self.category(destination, "transportation", TRANSPORT_LIMIT),
        );

        let docs = self.documents(destination).await;

        format!(
            "Attractions:\n{}\n\nSuggested lodging:\n{}\n\nTransport options:\n{}\n\nReference documents:\n{}",
            to_json_list(&attractions),
            to_json_list(&lodging),
            to_json_list(&transport),
            docs,
        )
    }

    /// One best-effort category lookup
    async fn category(&self, destination: &str, category: &str, limit: usize) -> Vec<NearbyPlace> {
        match self.places.lookup_nearby(destination, category, limit).await {
            Ok(places) => places,
            Err(e) => {
                warn!(%destination, %category, error = %e, "places lookup failed, using empty list");
                Vec::new()
            }
        }
    }

    /// Best-effort document retrieval, truncated to the character budget
    async fn documents(&self, destination: &str) -> String {
        let query = format!("Travel guide for {destination}");
        match self.index.similar_documents(&query, self.top_k).await {
            Ok(docs) => {
                let joined = docs.join("\n---\n");
                // Budget counts chars so truncation never splits a UTF-8 sequence
                joined.chars().take(self.context_budget).collect()
            }
            Err(e) => {
                warn!(%destination, error = %e, "document retrieval failed, using empty context");
                String::new()
            }
        }
    }
}

fn to_json_list(places: &[NearbyPlace]) -> String {
    serde_json::to_string(places).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StaticPlaces;

    #[async_trait]
    impl PlacesProvider for StaticPlaces {
        async fn lookup_nearby(
            &self,
            _place: &str,
            category: &str,
            limit: usize,
        ) -> Result<Vec<NearbyPlace>, RetrievalError> {
            Ok(vec![NearbyPlace {
                name: Some(format!("{category}-{limit}")),
                ..NearbyPlace::default()
            }])
        }
    }

    struct FailingPlaces;

    #[async_trait]
    impl PlacesProvider for FailingPlaces {
        async fn lookup_nearby(
            &self,
            _place: &str,
            _category: &str,
            _limit: usize,
        ) -> Result<Vec<NearbyPlace>, RetrievalError> {
            Err(RetrievalError::InvalidResponse("boom".to_string()))
        }
    }

    struct StaticIndex(Vec<String>);

    #[async_trait]
    impl DocumentIndex for StaticIndex {
        async fn similar_documents(&self, _query: &str, _k: usize) -> Result<Vec<String>, RetrievalError> {
            Ok(self.0.clone())
        }
    }

    struct FailingIndex;

    #[async_trait]
    impl DocumentIndex for FailingIndex {
        async fn similar_documents(&self, _query: &str, _k: usize) -> Result<Vec<String>, RetrievalError> {
            Err(RetrievalError::InvalidResponse("index down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_support_context_contains_all_sections() {
        let augmentor = RetrievalAugmentor::new(
            Arc::new(StaticPlaces),
            Arc::new(StaticIndex(vec!["guide one".to_string(), "guide two".to_string()])),
            5,
            4000,
        );

        let context = augmentor.support_context("Tokyo").await;

        assert!(context.contains("Attractions:"));
        assert!(context.contains("tourist_attraction-10"));
        assert!(context.contains("lodging-5"));
        assert!(context.contains("transportation-5"));
        assert!(context.contains("guide one\n---\nguide two"));
    }

    #[tokio::test]
    async fn test_failures_degrade_to_empty_context() {
        let augmentor = RetrievalAugmentor::new(Arc::new(FailingPlaces), Arc::new(FailingIndex), 5, 4000);

        let context = augmentor.support_context("Tokyo").await;

        // Sections are still present, just empty
        assert!(context.contains("Attractions:\n[]"));
        assert!(context.contains("Reference documents:\n"));
        assert!(context.ends_with("Reference documents:\n"));
    }

    #[tokio::test]
    async fn test_document_context_truncated_to_budget() {
        let long_doc = "x".repeat(10_000);
        let augmentor = RetrievalAugmentor::new(Arc::new(StaticPlaces), Arc::new(StaticIndex(vec![long_doc])), 5, 4000);

        let context = augmentor.support_context("Tokyo").await;
        let docs_section = context.split("Reference documents:\n").nth(1).unwrap();

        assert_eq!(docs_section.chars().count(), 4000);
    }
}
