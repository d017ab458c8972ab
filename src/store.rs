//! Document store trait for filtered nearest-neighbor search.

use async_trait::async_trait;

use crate::document::SearchHit;
use crate::error::Result;
use crate::policy::Predicate;

/// A document store supporting approximate nearest-neighbor search with an
/// access filter.
///
/// `num_candidates` is the size of the candidate pool: the store examines
/// that many nearest vectors before intersecting with the predicate and
/// applying `limit`. A close non-matching document therefore consumes a
/// candidate slot, mirroring how vector indexes apply filters.
///
/// # Example
///
/// ```rust,ignore
/// use acl_search::{DocumentStore, InMemoryDocumentStore};
///
/// let store = InMemoryDocumentStore::new();
/// let hits = store.search(&query_embedding, &predicate, 5, 30).await?;
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Search for the documents nearest to `embedding` that satisfy
    /// `predicate`, returning at most `limit` hits ordered by descending
    /// similarity.
    async fn search(
        &self,
        embedding: &[f32],
        predicate: &Predicate,
        limit: usize,
        num_candidates: usize,
    ) -> Result<Vec<SearchHit>>;
}
