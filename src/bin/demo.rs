//! # Knowledgebase demo
//!
//! Runs the same access-controlled query for three users against a MongoDB
//! Atlas collection of embedded movies, embedding the query with Azure
//! OpenAI. Each user sees only what their access predicate allows.
//!
//! Run: `cargo run --bin acl-search-demo --features demo`
//!
//! Required environment:
//! - `MONGODB_URI` (defaults to `mongodb://localhost/?directConnection=true`)
//! - `AZURE_OPENAI_ENDPOINT`
//! - `AZURE_OPENAI_API_KEY`

use std::sync::Arc;

use acl_search::azure::AzureEmbeddingProvider;
use acl_search::mongo::MongoDocumentStore;
use acl_search::{AccessPolicy, Comparison, Predicate, QueryRunner};

/// The per-user filter table: UserA sees only horror, UserB only romance
/// and comedy, UserC only non-movies.
fn local_acl() -> AccessPolicy {
    AccessPolicy::new()
        .grant("UserA", Predicate::field("genres", Comparison::Eq("Horror".into())))
        .grant(
            "UserB",
            Predicate::field("genres", Comparison::In(vec!["Romance".into(), "Comedy".into()])),
        )
        .grant("UserC", Predicate::field("type", Comparison::Ne("movie".into())))
}

#[tokio::main]
async fn main() -> acl_search::Result<()> {
    tracing_subscriber::fmt::init();

    let uri = std::env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost/?directConnection=true".to_string());

    let embedder = AzureEmbeddingProvider::from_env()?;
    let store = MongoDocumentStore::connect(&uri).await?;

    let runner = QueryRunner::builder()
        .policy(local_acl())
        .embedding_provider(Arc::new(embedder))
        .store(Arc::new(store))
        .build()?;

    for user_id in ["UserA", "UserB", "UserC"] {
        let summary = runner.run("Santa Claus is coming to town", user_id).await?;
        println!("{summary}\n");
    }

    Ok(())
}
