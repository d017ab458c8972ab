//! In-memory document store using cosine similarity.
//!
//! This module provides [`InMemoryDocumentStore`], a zero-dependency store
//! backed by a `HashMap` protected by a `tokio::sync::RwLock`. It is
//! suitable for development, testing, and small document sets, and
//! implements the same candidate-pool-then-filter semantics as a real
//! vector index.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Document, SearchHit};
use crate::error::Result;
use crate::policy::Predicate;
use crate::store::DocumentStore;

/// An in-memory document store using cosine similarity for search.
///
/// Documents are keyed by ID; inserting a document with an existing ID
/// replaces it. All operations are async-safe via `tokio::sync::RwLock`.
///
/// # Example
///
/// ```rust,ignore
/// use acl_search::InMemoryDocumentStore;
///
/// let store = InMemoryDocumentStore::new();
/// store.insert(document).await;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, Document>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, replacing any existing document with the same ID.
    pub async fn insert(&self, document: Document) {
        let mut documents = self.documents.write().await;
        documents.insert(document.id.clone(), document);
    }

    /// Insert a batch of documents.
    pub async fn extend(&self, batch: impl IntoIterator<Item = Document>) {
        let mut documents = self.documents.write().await;
        for document in batch {
            documents.insert(document.id.clone(), document);
        }
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Both vectors are L2-normalized before computing the dot product.
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn search(
        &self,
        embedding: &[f32],
        predicate: &Predicate,
        limit: usize,
        num_candidates: usize,
    ) -> Result<Vec<SearchHit>> {
        let documents = self.documents.read().await;

        let mut scored: Vec<SearchHit> = documents
            .values()
            .map(|document| {
                let score = cosine_similarity(&document.embedding, embedding);
                SearchHit { document: document.clone(), score }
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        // Candidate pool first, then the access filter, then the limit.
        scored.truncate(num_candidates);
        scored.retain(|hit| predicate.matches(&hit.document));
        scored.truncate(limit);

        Ok(scored)
    }
}
