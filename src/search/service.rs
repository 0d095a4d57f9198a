//! Main search service implementation

use crate::error::Result;
use crate::index::{Index, IndexStats};
use crate::models::{QueryKey, Record};
use crate::search::config::SearchConfig;
use crate::search::resolver::{render, resolve_related};
use crate::validation::build_query;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// A record related to a hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedHit {
    /// Role of the related record (Submitter, Assignee, Organization)
    pub kind: String,

    pub record: Record,
}

/// A single search result hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub record: Record,

    /// Resolved related records, empty if disabled
    pub related: Vec<RelatedHit>,

    /// Full text rendering of the hit
    pub rendered: String,
}

/// Search response with results and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Query that was executed
    pub query: QueryKey,

    /// Search results
    pub hits: Vec<SearchHit>,

    /// Total number of matches (before `max_results`)
    pub total_hits: usize,

    /// Search execution time in microseconds
    pub search_time_us: u64,
}

impl SearchResponse {
    /// Rendered hits followed by the match count
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for hit in &self.hits {
            text.push_str(&hit.rendered);
            text.push_str("\n\n");
        }
        text.push_str(&format!("Number of results {}", self.total_hits));
        text
    }
}

/// Serves point queries against a built index
#[derive(Clone)]
pub struct SearchService {
    index: Arc<Index>,
    config: SearchConfig,
}

impl SearchService {
    pub fn new(index: Arc<Index>, config: SearchConfig) -> Self {
        Self { index, config }
    }

    pub fn index(&self) -> &Arc<Index> {
        &self.index
    }

    /// Exact-match search. No match is an empty response, not an error.
    pub fn search(&self, query: &QueryKey) -> SearchResponse {
        let start = Instant::now();
        let matches = self.index.lookup(query);

        let limit = match self.config.max_results {
            0 => matches.len(),
            max => max.min(matches.len()),
        };

        let hits = matches[..limit]
            .iter()
            .map(|record| self.hit(record))
            .collect();

        let search_time_us = start.elapsed().as_micros() as u64;
        debug!(
            "Query {} matched {} records in {}us",
            query,
            matches.len(),
            search_time_us
        );

        SearchResponse {
            query: query.clone(),
            hits,
            total_hits: matches.len(),
            search_time_us,
        }
    }

    /// Validate raw user input, then search
    pub fn search_raw(&self, dataset: &str, field: &str, value: &str) -> Result<SearchResponse> {
        let query = build_query(dataset, field, value)?;
        Ok(self.search(&query))
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }

    fn hit(&self, record: &Arc<Record>) -> SearchHit {
        if !self.config.include_related {
            return SearchHit {
                record: Record::clone(record),
                related: Vec::new(),
                rendered: format!("## {}.\n{}", record.heading(), record.summary()),
            };
        }

        let related = resolve_related(&self.index, record)
            .into_iter()
            .map(|r| RelatedHit {
                kind: r.kind.to_string(),
                record: Record::clone(&r.record),
            })
            .collect();

        SearchHit {
            record: Record::clone(record),
            related,
            rendered: render(&self.index, record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dataset, Ticket, User};
    use crate::search::config::SearchConfigBuilder;

    fn service(config: SearchConfig) -> SearchService {
        let mut t1 = Ticket::new("T1", "First");
        t1.submitter_id = Some(1);
        t1.status = "open".to_string();
        let mut t2 = Ticket::new("T2", "Second");
        t2.status = "open".to_string();

        let index = Index::from_records(vec![
            Record::from(User::new(1, "Francisca")),
            Record::from(t1),
            Record::from(t2),
        ]);
        SearchService::new(Arc::new(index), config)
    }

    #[test]
    fn test_search_with_related() {
        let service = service(SearchConfig::default());
        let response = service.search(&QueryKey::new(Dataset::Tickets, "_id", "T1"));

        assert_eq!(response.total_hits, 1);
        assert_eq!(response.hits[0].related.len(), 1);
        assert_eq!(response.hits[0].related[0].kind, "Submitter");
        assert!(response.to_text().ends_with("Number of results 1"));
    }

    #[test]
    fn test_search_no_match() {
        let service = service(SearchConfig::default());
        let response = service.search(&QueryKey::new(Dataset::Tickets, "status", "closed"));

        assert_eq!(response.total_hits, 0);
        assert!(response.hits.is_empty());
        assert_eq!(response.to_text(), "Number of results 0");
    }

    #[test]
    fn test_max_results_truncates_hits_only() {
        let service = service(SearchConfigBuilder::new().max_results(1).build());
        let response = service.search(&QueryKey::new(Dataset::Tickets, "status", "open"));

        assert_eq!(response.total_hits, 2);
        assert_eq!(response.hits.len(), 1);
        assert_eq!(response.hits[0].record.id().to_string(), "T1");
    }

    #[test]
    fn test_related_disabled() {
        let service = service(SearchConfigBuilder::new().include_related(false).build());
        let response = service.search(&QueryKey::new(Dataset::Tickets, "_id", "T1"));

        assert!(response.hits[0].related.is_empty());
        assert!(!response.hits[0].rendered.contains("Submitter"));
    }

    #[test]
    fn test_search_raw_validates() {
        let service = service(SearchConfig::default());

        let response = service.search_raw("users", "_id", "1").unwrap();
        assert_eq!(response.total_hits, 1);

        assert!(service.search_raw("users", "subject", "x").is_err());
    }
}
