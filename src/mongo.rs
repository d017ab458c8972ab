//! MongoDB Atlas document store backend.
//!
//! Provides [`MongoDocumentStore`] which implements [`DocumentStore`] with
//! an aggregation pipeline built around the `$vectorSearch` stage. The
//! access predicate is forwarded as the stage's `filter`, so enforcement
//! happens inside the index; only fields indexed as boolean, string, or
//! numeric types are filterable, and the store rejects anything else at
//! indexing time.
//!
//! This module is only available when the `mongodb` feature is enabled.
//!
//! # Example
//!
//! ```rust,ignore
//! use acl_search::mongo::MongoDocumentStore;
//!
//! let store = MongoDocumentStore::connect("mongodb://localhost/?directConnection=true").await?;
//! let hits = store.search(&query_embedding, &predicate, 5, 30).await?;
//! ```

use async_trait::async_trait;
use chrono::DateTime;
use futures::stream::TryStreamExt;
use mongodb::bson::{Bson, Document as BsonDocument, doc};
use mongodb::{Client, Collection};
use tracing::debug;

use crate::document::{Document, SearchHit};
use crate::error::{Result, SearchError};
use crate::policy::{Comparison, FieldValue, Predicate};
use crate::store::DocumentStore;

/// The default database holding the embedded document collection.
const DEFAULT_DATABASE: &str = "sample_mflix";

/// The default collection of documents with embeddings.
const DEFAULT_COLLECTION: &str = "embedded_movies";

/// The default Atlas vector search index name.
const DEFAULT_INDEX: &str = "vector_index";

/// The default document field holding the embedding vector.
const DEFAULT_PATH: &str = "plot_embedding";

/// A [`DocumentStore`] backed by MongoDB Atlas `$vectorSearch`.
///
/// Wraps a [`mongodb::Collection`] and maps each search to a two-stage
/// aggregation: `$vectorSearch` with the caller's filter, followed by a
/// `$project` of the display fields plus the similarity score.
pub struct MongoDocumentStore {
    collection: Collection<BsonDocument>,
    index: String,
    path: String,
}

impl MongoDocumentStore {
    /// Connect to the given URI and use the default database, collection,
    /// index, and embedding path.
    pub async fn connect(uri: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await.map_err(Self::map_err)?;
        Ok(Self::from_client(&client))
    }

    /// Create a store from an existing client, using the default database
    /// and collection.
    pub fn from_client(client: &Client) -> Self {
        let collection = client.database(DEFAULT_DATABASE).collection(DEFAULT_COLLECTION);
        Self::from_collection(collection)
    }

    /// Create a store over an arbitrary collection.
    pub fn from_collection(collection: Collection<BsonDocument>) -> Self {
        Self { collection, index: DEFAULT_INDEX.into(), path: DEFAULT_PATH.into() }
    }

    /// Set the vector search index name.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    /// Set the document field holding the embedding vector.
    pub fn with_search_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    fn map_err(e: mongodb::error::Error) -> SearchError {
        SearchError::Store { backend: "MongoDB".to_string(), message: e.to_string() }
    }

    fn field_value_to_bson(value: &FieldValue) -> Bson {
        match value {
            FieldValue::Str(s) => Bson::String(s.clone()),
            FieldValue::Num(n) => Bson::Double(*n),
            FieldValue::Bool(b) => Bson::Boolean(*b),
        }
    }

    /// Translate an access predicate into the `$vectorSearch` filter syntax.
    fn predicate_to_bson(predicate: &Predicate) -> BsonDocument {
        let mut filter = BsonDocument::new();
        for (field, comparison) in predicate.iter() {
            let operator = match comparison {
                Comparison::Eq(value) => doc! { "$eq": Self::field_value_to_bson(value) },
                Comparison::In(values) => {
                    let values: Vec<Bson> =
                        values.iter().map(Self::field_value_to_bson).collect();
                    doc! { "$in": values }
                }
                Comparison::Ne(value) => doc! { "$ne": Self::field_value_to_bson(value) },
            };
            filter.insert(field, operator);
        }
        filter
    }

    fn parse_award_wins(document: &BsonDocument) -> u32 {
        let Ok(awards) = document.get_document("awards") else {
            return 0;
        };
        match awards.get("wins") {
            Some(Bson::Int32(n)) => u32::try_from(*n).unwrap_or(0),
            Some(Bson::Int64(n)) => u32::try_from(*n).unwrap_or(0),
            Some(Bson::Double(n)) if *n >= 0.0 => *n as u32,
            _ => 0,
        }
    }

    fn parse_hit(document: &BsonDocument) -> Result<SearchHit> {
        let title = document
            .get_str("title")
            .map_err(|e| SearchError::Store {
                backend: "MongoDB".to_string(),
                message: format!("missing title in search result: {e}"),
            })?
            .to_string();

        let genres = document
            .get_array("genres")
            .map(|genres| {
                genres.iter().filter_map(|g| g.as_str().map(String::from)).collect()
            })
            .unwrap_or_default();

        let released = document
            .get_datetime("released")
            .ok()
            .and_then(|dt| DateTime::from_timestamp_millis(dt.timestamp_millis()))
            .map(|dt| dt.date_naive())
            .ok_or_else(|| SearchError::Store {
                backend: "MongoDB".to_string(),
                message: format!("missing or invalid release date for '{title}'"),
            })?;

        let kind = document.get_str("type").unwrap_or_default().to_string();
        let award_wins = Self::parse_award_wins(document);
        let score = document.get_f64("score").unwrap_or(0.0) as f32;

        Ok(SearchHit {
            document: Document {
                id: String::new(),
                title,
                genres,
                released,
                kind,
                award_wins,
                embedding: vec![],
            },
            score,
        })
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn search(
        &self,
        embedding: &[f32],
        predicate: &Predicate,
        limit: usize,
        num_candidates: usize,
    ) -> Result<Vec<SearchHit>> {
        let query_vector: Vec<f64> = embedding.iter().map(|v| f64::from(*v)).collect();

        let mut vector_search = doc! {
            "index": &self.index,
            "path": &self.path,
            "queryVector": query_vector,
            "limit": limit as i64,
            "numCandidates": num_candidates as i64,
        };
        if !predicate.is_empty() {
            vector_search.insert("filter", Self::predicate_to_bson(predicate));
        }

        let pipeline = vec![
            doc! { "$vectorSearch": vector_search },
            doc! { "$project": {
                "_id": 0,
                "title": 1,
                "genres": 1,
                "released": 1,
                "type": 1,
                "awards.wins": 1,
                "score": { "$meta": "vectorSearchScore" },
            } },
        ];

        let mut cursor = self.collection.aggregate(pipeline).await.map_err(Self::map_err)?;

        let mut hits = Vec::with_capacity(limit);
        while let Some(document) = cursor.try_next().await.map_err(Self::map_err)? {
            hits.push(Self::parse_hit(&document)?);
        }

        debug!(count = hits.len(), limit, num_candidates, "vector search completed");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicate_translates_to_filter_syntax() {
        let predicate = Predicate::field("genres", Comparison::Eq("Horror".into()))
            .and("type", Comparison::Ne("movie".into()));

        let filter = MongoDocumentStore::predicate_to_bson(&predicate);

        assert_eq!(filter.get_document("genres").unwrap(), &doc! { "$eq": "Horror" });
        assert_eq!(filter.get_document("type").unwrap(), &doc! { "$ne": "movie" });
    }

    #[test]
    fn in_comparison_translates_to_array() {
        let predicate =
            Predicate::field("genres", Comparison::In(vec!["Romance".into(), "Comedy".into()]));

        let filter = MongoDocumentStore::predicate_to_bson(&predicate);

        assert_eq!(
            filter.get_document("genres").unwrap(),
            &doc! { "$in": ["Romance", "Comedy"] }
        );
    }

    #[test]
    fn award_wins_parses_numeric_variants() {
        let int32 = doc! { "awards": { "wins": 3_i32 } };
        let int64 = doc! { "awards": { "wins": 4_i64 } };
        let double = doc! { "awards": { "wins": 5.0 } };
        let missing = doc! {};

        assert_eq!(MongoDocumentStore::parse_award_wins(&int32), 3);
        assert_eq!(MongoDocumentStore::parse_award_wins(&int64), 4);
        assert_eq!(MongoDocumentStore::parse_award_wins(&double), 5);
        assert_eq!(MongoDocumentStore::parse_award_wins(&missing), 0);
    }
}
