//! Property tests for in-memory store search ordering and filtering.

use chrono::NaiveDate;
use proptest::prelude::*;

use acl_search::document::Document;
use acl_search::memory::InMemoryDocumentStore;
use acl_search::policy::{Comparison, Predicate};
use acl_search::store::DocumentStore;

const DIM: usize = 16;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

/// Generate a document with a normalized embedding and a genre drawn from a
/// small pool, so predicates have both matching and non-matching documents.
fn arb_document(dim: usize) -> impl Strategy<Value = Document> {
    (
        "[a-z]{3,8}",
        "[a-z ]{5,30}",
        prop::sample::select(vec!["Horror", "Comedy", "Romance", "Western"]),
        1970i32..2020,
        0u32..10,
        arb_normalized_embedding(dim),
    )
        .prop_map(|(id, title, genre, year, award_wins, embedding)| Document {
            id,
            title,
            genres: vec![genre.to_string()],
            released: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
            kind: "movie".to_string(),
            award_wins,
            embedding,
        })
}

/// For any document set, a filtered search returns at most `limit` hits,
/// every hit satisfies the predicate, and hits are ordered by descending
/// similarity score.
mod prop_filtered_search {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn hits_filtered_bounded_and_ordered(
            documents in proptest::collection::vec(arb_document(DIM), 1..25),
            query in arb_normalized_embedding(DIM),
            limit in 1usize..8,
            extra_candidates in 0usize..20,
        ) {
            let num_candidates = limit + extra_candidates;
            let predicate = Predicate::field("genres", Comparison::Eq("Horror".into()));

            let rt = tokio::runtime::Runtime::new().unwrap();
            let hits = rt.block_on(async {
                let store = InMemoryDocumentStore::new();
                store.extend(documents.clone()).await;
                store.search(&query, &predicate, limit, num_candidates).await.unwrap()
            });

            prop_assert!(hits.len() <= limit);
            for hit in &hits {
                prop_assert!(
                    hit.document.genres.iter().any(|g| g == "Horror"),
                    "hit '{}' violates the predicate",
                    hit.document.title,
                );
            }
            for window in hits.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "hits not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }
        }

        #[test]
        fn empty_predicate_bounded_by_candidate_pool(
            documents in proptest::collection::vec(arb_document(DIM), 1..25),
            query in arb_normalized_embedding(DIM),
            num_candidates in 1usize..10,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (hits, stored) = rt.block_on(async {
                let store = InMemoryDocumentStore::new();
                store.extend(documents.clone()).await;
                let hits = store
                    .search(&query, &Predicate::new(), num_candidates, num_candidates)
                    .await
                    .unwrap();
                (hits, store.len().await)
            });

            prop_assert!(hits.len() <= num_candidates);
            prop_assert!(hits.len() <= stored);
        }
    }
}
