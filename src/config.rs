//! Configuration for the query runner.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// Query parameters for the filtered nearest-neighbor search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Maximum number of documents to return.
    pub limit: usize,
    /// Number of nearest neighbors examined before filtering. Must be at
    /// least `limit`; vector indexes reject searches where the candidate
    /// pool is smaller than the result limit.
    pub num_candidates: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { limit: 5, num_candidates: 30 }
    }
}

impl SearchConfig {
    /// Create a new builder for constructing a [`SearchConfig`].
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`SearchConfig`].
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    /// Set the maximum number of documents to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.config.limit = limit;
        self
    }

    /// Set the number of nearest neighbors examined before filtering.
    pub fn num_candidates(mut self, num_candidates: usize) -> Self {
        self.config.num_candidates = num_candidates;
        self
    }

    /// Build the [`SearchConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if:
    /// - `limit == 0`
    /// - `limit > num_candidates`
    pub fn build(self) -> Result<SearchConfig> {
        if self.config.limit == 0 {
            return Err(SearchError::Config("limit must be greater than zero".to_string()));
        }
        if self.config.limit > self.config.num_candidates {
            return Err(SearchError::Config(format!(
                "limit ({}) must not exceed num_candidates ({})",
                self.config.limit, self.config.num_candidates
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_query_parameters() {
        let config = SearchConfig::default();
        assert_eq!(config.limit, 5);
        assert_eq!(config.num_candidates, 30);
    }

    #[test]
    fn zero_limit_fails() {
        let result = SearchConfig::builder().limit(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn limit_exceeding_candidates_fails() {
        let result = SearchConfig::builder().limit(10).num_candidates(5).build();
        assert!(result.is_err());
    }

    #[test]
    fn valid_config_builds() {
        let config = SearchConfig::builder().limit(3).num_candidates(10).build().unwrap();
        assert_eq!(config.limit, 3);
        assert_eq!(config.num_candidates, 10);
    }
}
