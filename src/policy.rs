//! Per-user access predicates over document attributes.
//!
//! An [`AccessPolicy`] maps user identifiers to [`Predicate`]s, loaded once
//! at startup and immutable afterwards. Predicates are conjunctions of
//! field-level [`Comparison`]s using the three operators the policy table
//! needs: equality, set membership, and not-equal.
//!
//! Comparison semantics follow the document store's filter rules: a scalar
//! comparison against an array-valued field (such as `genres`) matches when
//! any element matches, and `Ne` against a field the document does not carry
//! is satisfied.
//!
//! # Example
//!
//! ```rust,ignore
//! use acl_search::{AccessPolicy, Comparison, Predicate};
//!
//! let policy = AccessPolicy::new()
//!     .grant("UserA", Predicate::field("genres", Comparison::Eq("Horror".into())))
//!     .grant("UserC", Predicate::field("type", Comparison::Ne("movie".into())));
//!
//! let predicate = policy.predicate_for("UserA")?;
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::{Result, SearchError};

/// A scalar value a predicate compares against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    /// A string value.
    Str(String),
    /// A numeric value.
    Num(f64),
    /// A boolean value.
    Bool(bool),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Num(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A comparison applied to a single document field.
///
/// Serializes to the store's operator syntax (`{"$eq": "Horror"}`), so a
/// policy table written as JSON deserializes directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Comparison {
    /// The field equals the value (any element, for array fields).
    #[serde(rename = "$eq")]
    Eq(FieldValue),
    /// The field equals one of the values (any element, for array fields).
    #[serde(rename = "$in")]
    In(Vec<FieldValue>),
    /// No element of the field equals the value. Satisfied when the field
    /// is absent.
    #[serde(rename = "$ne")]
    Ne(FieldValue),
}

impl Comparison {
    /// Evaluate this comparison against the values a document exposes for
    /// the field (`None` when the document has no such field).
    fn matches(&self, values: Option<&[FieldValue]>) -> bool {
        match self {
            Self::Eq(expected) => values.is_some_and(|vals| vals.contains(expected)),
            Self::In(allowed) => {
                values.is_some_and(|vals| vals.iter().any(|v| allowed.contains(v)))
            }
            Self::Ne(excluded) => values.is_none_or(|vals| !vals.contains(excluded)),
        }
    }
}

/// Resolve a filterable field on a document to its value(s).
///
/// Array fields resolve to all their elements. Fields outside the filterable
/// set resolve to `None`.
fn document_field(document: &Document, field: &str) -> Option<Vec<FieldValue>> {
    match field {
        "title" => Some(vec![FieldValue::Str(document.title.clone())]),
        "genres" => Some(document.genres.iter().cloned().map(FieldValue::Str).collect()),
        "type" => Some(vec![FieldValue::Str(document.kind.clone())]),
        "awards.wins" => Some(vec![FieldValue::Num(f64::from(document.award_wins))]),
        _ => None,
    }
}

/// A conjunction of field comparisons restricting which documents a query
/// may return.
///
/// Serializes as a map of field name to operator, matching the store's
/// filter syntax: `{"genres": {"$eq": "Horror"}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Predicate {
    constraints: BTreeMap<String, Comparison>,
}

impl Predicate {
    /// Create an empty predicate that matches every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a predicate with a single field comparison.
    pub fn field(field: impl Into<String>, comparison: Comparison) -> Self {
        Self::new().and(field, comparison)
    }

    /// Add a field comparison to the conjunction.
    pub fn and(mut self, field: impl Into<String>, comparison: Comparison) -> Self {
        self.constraints.insert(field.into(), comparison);
        self
    }

    /// Whether this predicate has no constraints.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Iterate over the field comparisons, in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Comparison)> {
        self.constraints.iter().map(|(field, cmp)| (field.as_str(), cmp))
    }

    /// Whether the document satisfies every constraint.
    pub fn matches(&self, document: &Document) -> bool {
        self.constraints.iter().all(|(field, comparison)| {
            comparison.matches(document_field(document, field).as_deref())
        })
    }
}

/// An immutable mapping from user identifier to access predicate.
///
/// Built once at process start, either programmatically via
/// [`grant`](AccessPolicy::grant) or from a JSON table via
/// [`from_json`](AccessPolicy::from_json). Every user the runner is asked
/// to serve must have an entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessPolicy {
    entries: HashMap<String, Predicate>,
}

impl AccessPolicy {
    /// Create an empty policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry for a user, returning the updated policy.
    pub fn grant(mut self, user_id: impl Into<String>, predicate: Predicate) -> Self {
        self.entries.insert(user_id.into(), predicate);
        self
    }

    /// Load a policy from a JSON table of the form
    /// `{"UserA": {"genres": {"$eq": "Horror"}}}`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the JSON does not parse.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SearchError::Config(format!("invalid access policy JSON: {e}")))
    }

    /// Look up the predicate for a user.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnknownUser`] if the user has no entry.
    pub fn predicate_for(&self, user_id: &str) -> Result<&Predicate> {
        self.entries.get(user_id).ok_or_else(|| SearchError::UnknownUser {
            user_id: user_id.to_string(),
        })
    }

    /// Number of users with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the policy has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn movie(genres: &[&str], kind: &str) -> Document {
        Document {
            id: "doc_1".to_string(),
            title: "Test".to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            released: NaiveDate::from_ymd_opt(2010, 12, 3).unwrap(),
            kind: kind.to_string(),
            award_wins: 2,
            embedding: vec![],
        }
    }

    #[test]
    fn eq_matches_any_array_element() {
        let predicate = Predicate::field("genres", Comparison::Eq("Horror".into()));
        assert!(predicate.matches(&movie(&["Fantasy", "Horror"], "movie")));
        assert!(!predicate.matches(&movie(&["Fantasy"], "movie")));
    }

    #[test]
    fn in_matches_any_listed_value() {
        let predicate =
            Predicate::field("genres", Comparison::In(vec!["Romance".into(), "Comedy".into()]));
        assert!(predicate.matches(&movie(&["Comedy", "Family"], "movie")));
        assert!(!predicate.matches(&movie(&["Horror"], "movie")));
    }

    #[test]
    fn ne_rejects_matching_scalar() {
        let predicate = Predicate::field("type", Comparison::Ne("movie".into()));
        assert!(predicate.matches(&movie(&["Western"], "series")));
        assert!(!predicate.matches(&movie(&["Western"], "movie")));
    }

    #[test]
    fn ne_on_missing_field_is_satisfied() {
        let predicate = Predicate::field("director", Comparison::Ne("Anyone".into()));
        assert!(predicate.matches(&movie(&["Horror"], "movie")));
    }

    #[test]
    fn eq_on_missing_field_fails() {
        let predicate = Predicate::field("director", Comparison::Eq("Anyone".into()));
        assert!(!predicate.matches(&movie(&["Horror"], "movie")));
    }

    #[test]
    fn conjunction_requires_all_constraints() {
        let predicate = Predicate::field("genres", Comparison::Eq("Horror".into()))
            .and("type", Comparison::Ne("series".into()));
        assert!(predicate.matches(&movie(&["Horror"], "movie")));
        assert!(!predicate.matches(&movie(&["Horror"], "series")));
    }

    #[test]
    fn numeric_comparison_on_award_wins() {
        let predicate = Predicate::field("awards.wins", Comparison::Eq(2.0.into()));
        assert!(predicate.matches(&movie(&["Horror"], "movie")));
    }

    #[test]
    fn policy_table_deserializes_from_store_syntax() {
        let policy = AccessPolicy::from_json(
            r#"{
                "UserA": {"genres": {"$eq": "Horror"}},
                "UserB": {"genres": {"$in": ["Romance", "Comedy"]}},
                "UserC": {"type": {"$ne": "movie"}}
            }"#,
        )
        .unwrap();

        assert_eq!(policy.len(), 3);
        let user_a = policy.predicate_for("UserA").unwrap();
        assert_eq!(user_a, &Predicate::field("genres", Comparison::Eq("Horror".into())));
    }

    #[test]
    fn unknown_user_lookup_fails() {
        let policy = AccessPolicy::new();
        let err = policy.predicate_for("UserZ").unwrap_err();
        assert!(matches!(err, SearchError::UnknownUser { user_id } if user_id == "UserZ"));
    }
}
