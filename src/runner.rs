//! Query runner orchestrating the embed → filtered search → format pipeline.
//!
//! The [`QueryRunner`] composes an [`EmbeddingProvider`], a [`DocumentStore`],
//! and an [`AccessPolicy`]. Each call is a single linear request/response
//! pipeline with no state carried across invocations, so a shared runner can
//! serve concurrent callers.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use acl_search::{QueryRunner, AccessPolicy, InMemoryDocumentStore};
//!
//! let runner = QueryRunner::builder()
//!     .policy(policy)
//!     .embedding_provider(Arc::new(embedder))
//!     .store(Arc::new(InMemoryDocumentStore::new()))
//!     .build()?;
//!
//! let summary = runner.run("Santa Claus is coming to town", "UserA").await?;
//! println!("{summary}");
//! ```

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::document::DocumentSummary;
use crate::embedding::EmbeddingProvider;
use crate::error::{Result, SearchError};
use crate::policy::AccessPolicy;
use crate::store::DocumentStore;

/// The sentinel returned by [`QueryRunner::run`] when no documents match.
pub const NO_RESULTS: &str = "N/A";

/// Runs access-controlled similarity queries against a document store.
///
/// Construct one via [`QueryRunner::builder()`].
pub struct QueryRunner {
    config: SearchConfig,
    policy: AccessPolicy,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn DocumentStore>,
}

impl std::fmt::Debug for QueryRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryRunner")
            .field("config", &self.config)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl QueryRunner {
    /// Create a new [`QueryRunnerBuilder`].
    pub fn builder() -> QueryRunnerBuilder {
        QueryRunnerBuilder::default()
    }

    /// Return a reference to the search configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Return a reference to the access policy.
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Execute a query on behalf of a user, returning projected summaries.
    ///
    /// Pipeline: policy lookup → embed → filtered nearest-neighbor search →
    /// projection → sort by release date descending, ties by award wins
    /// descending.
    ///
    /// # Errors
    ///
    /// - [`SearchError::UnknownUser`] if `user_id` has no policy entry. The
    ///   lookup happens before either collaborator is called, so an unknown
    ///   user never triggers an outbound request.
    /// - [`SearchError::Embedding`] if the embedding provider fails.
    /// - [`SearchError::Store`] if the store query fails.
    pub async fn search(&self, text: &str, user_id: &str) -> Result<Vec<DocumentSummary>> {
        // 1. Resolve the caller's access predicate. Fails before any
        //    outbound call for unknown users.
        let predicate = self.policy.predicate_for(user_id)?;

        debug!(user_id, text_len = text.len(), "embedding query text");

        // 2. Embed the query text.
        let embedding = self.embedding_provider.embed(text).await?;

        // 3. Filtered nearest-neighbor search.
        let hits = self
            .store
            .search(&embedding, predicate, self.config.limit, self.config.num_candidates)
            .await?;

        // 4. Project, then order by recency with award wins breaking ties.
        let mut documents: Vec<_> = hits.into_iter().map(|hit| hit.document).collect();
        documents.sort_by(|a, b| {
            b.released.cmp(&a.released).then_with(|| b.award_wins.cmp(&a.award_wins))
        });
        let summaries = documents.iter().map(DocumentSummary::from).collect::<Vec<_>>();

        info!(user_id, result_count = summaries.len(), "query completed");

        Ok(summaries)
    }

    /// Execute a query and format the results as a human-readable summary.
    ///
    /// Returns [`NO_RESULTS`] when no documents match; otherwise a header
    /// line followed by one line per document.
    ///
    /// # Errors
    ///
    /// Same conditions as [`search`](QueryRunner::search).
    pub async fn run(&self, text: &str, user_id: &str) -> Result<String> {
        let summaries = self.search(text, user_id).await?;

        if summaries.is_empty() {
            return Ok(NO_RESULTS.to_string());
        }

        let mut output =
            format!("Knowledgebase Results for User={user_id} [{}]:", summaries.len());
        for summary in &summaries {
            // Writing to a String cannot fail.
            let _ = write!(output, "\n- {summary}");
        }
        Ok(output)
    }
}

/// Builder for constructing a [`QueryRunner`].
///
/// The policy, embedding provider, and store are required; the config
/// defaults to `limit=5`, `num_candidates=30` when not set.
#[derive(Default)]
pub struct QueryRunnerBuilder {
    config: Option<SearchConfig>,
    policy: Option<AccessPolicy>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    store: Option<Arc<dyn DocumentStore>>,
}

impl QueryRunnerBuilder {
    /// Set the search configuration.
    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the access policy.
    pub fn policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the document store backend.
    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the [`QueryRunner`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the policy, embedding provider,
    /// or store is missing.
    pub fn build(self) -> Result<QueryRunner> {
        let policy =
            self.policy.ok_or_else(|| SearchError::Config("policy is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| SearchError::Config("embedding_provider is required".to_string()))?;
        let store =
            self.store.ok_or_else(|| SearchError::Config("store is required".to_string()))?;

        Ok(QueryRunner {
            config: self.config.unwrap_or_default(),
            policy,
            embedding_provider,
            store,
        })
    }
}
