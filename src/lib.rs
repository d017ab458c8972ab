//! # acl-search
//!
//! Access-controlled vector similarity search over a document knowledge base.
//!
//! The crate composes three pieces behind injectable trait seams:
//!
//! - an [`EmbeddingProvider`] that turns query text into a vector;
//! - a [`DocumentStore`] that runs a filtered approximate nearest-neighbor
//!   search with a candidate-pool size and a result limit;
//! - an [`AccessPolicy`] mapping each user to the filter predicate their
//!   results must satisfy.
//!
//! The [`QueryRunner`] wires them together: policy lookup, embed, filtered
//! search, projection to display fields, and a deterministic sort by release
//! date (award wins breaking ties).
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use acl_search::{
//!     AccessPolicy, Comparison, InMemoryDocumentStore, Predicate, QueryRunner,
//! };
//!
//! let policy = AccessPolicy::new()
//!     .grant("UserA", Predicate::field("genres", Comparison::Eq("Horror".into())));
//!
//! let runner = QueryRunner::builder()
//!     .policy(policy)
//!     .embedding_provider(Arc::new(embedder))
//!     .store(Arc::new(InMemoryDocumentStore::new()))
//!     .build()?;
//!
//! let summary = runner.run("Santa Claus is coming to town", "UserA").await?;
//! ```
//!
//! ## Backends
//!
//! Production backends are feature-gated:
//!
//! - `azure-openai` – [`azure::AzureEmbeddingProvider`] over the Azure
//!   OpenAI embeddings REST API.
//! - `mongodb` – [`mongo::MongoDocumentStore`] over MongoDB Atlas
//!   `$vectorSearch`.

pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod memory;
pub mod policy;
pub mod runner;
pub mod store;

#[cfg(feature = "azure-openai")]
pub mod azure;
#[cfg(feature = "mongodb")]
pub mod mongo;

pub use config::{SearchConfig, SearchConfigBuilder};
pub use document::{Document, DocumentSummary, SearchHit};
pub use embedding::EmbeddingProvider;
pub use error::{Result, SearchError};
pub use memory::InMemoryDocumentStore;
pub use policy::{AccessPolicy, Comparison, FieldValue, Predicate};
pub use runner::{NO_RESULTS, QueryRunner, QueryRunnerBuilder};
pub use store::DocumentStore;
