//! In-memory inverted index over every field of every record
//!
//! The index maps a [`QueryKey`] to the records that produced that key, in
//! insertion order. It is filled once by the ingestion pipeline and is
//! read-only afterwards, so it can be shared behind an `Arc` by any number
//! of concurrent readers without locking.

use crate::models::{Dataset, QueryKey, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Index statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of distinct keys
    pub total_keys: usize,

    /// Number of (key, record) entries
    pub total_entries: usize,

    /// Number of indexed records
    pub total_records: usize,

    /// Indexed records per dataset
    pub records_per_dataset: HashMap<Dataset, usize>,

    /// When the build completed
    pub built_at: DateTime<Utc>,
}

/// Multi-valued mapping from query key to matching records
#[derive(Debug, Clone)]
pub struct Index {
    entries: HashMap<QueryKey, Vec<Arc<Record>>>,
    records_per_dataset: HashMap<Dataset, usize>,
    total_entries: usize,
    built_at: DateTime<Utc>,
}

impl Index {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
            records_per_dataset: HashMap::new(),
            total_entries: 0,
            built_at: Utc::now(),
        }
    }

    /// Build an index synchronously from already decoded records
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let mut index = Self::new();
        for record in records {
            index.insert(Arc::new(record));
        }
        index.seal();
        index
    }

    /// Append `record` under every key it produces. Returns the number of keys.
    pub(crate) fn insert(&mut self, record: Arc<Record>) -> usize {
        let keys = record.keys_for_index();
        let count = keys.len();

        for key in keys {
            self.entries
                .entry(key)
                .or_insert_with(Vec::new)
                .push(Arc::clone(&record));
        }

        *self.records_per_dataset.entry(record.dataset()).or_insert(0) += 1;
        self.total_entries += count;
        count
    }

    /// Mark the build as complete
    pub(crate) fn seal(&mut self) {
        self.built_at = Utc::now();
    }

    /// Records stored under `key`, in insertion order. Empty if the key was never produced.
    pub fn lookup(&self, key: &QueryKey) -> &[Arc<Record>] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First record stored under `key`
    pub fn find_one(&self, key: &QueryKey) -> Option<&Arc<Record>> {
        self.lookup(key).first()
    }

    pub fn contains_key(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Distinct keys in the index
    pub fn keys(&self) -> impl Iterator<Item = &QueryKey> {
        self.entries.keys()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of indexed records
    pub fn record_count(&self) -> usize {
        self.records_per_dataset.values().sum()
    }

    /// Number of indexed records of one dataset
    pub fn dataset_count(&self, dataset: Dataset) -> usize {
        self.records_per_dataset.get(&dataset).copied().unwrap_or(0)
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            total_keys: self.entries.len(),
            total_entries: self.total_entries,
            total_records: self.record_count(),
            records_per_dataset: self.records_per_dataset.clone(),
            built_at: self.built_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Organization, ScalarValue, Ticket, User};

    fn sample_index() -> Index {
        let mut ticket = Ticket::new("T1", "Printer on fire");
        ticket.status = "open".to_string();
        ticket.tags = vec!["a".to_string(), "b".to_string()];

        let mut org = Organization::new(101, "open");
        org.tags = vec!["a".to_string()];

        Index::from_records(vec![
            Record::from(User::new(1, "Francisca")),
            Record::from(User::new(2, "Cross")),
            Record::from(org),
            Record::from(ticket),
        ])
    }

    #[test]
    fn test_lookup_exact_match() {
        let index = sample_index();
        let hits = index.lookup(&QueryKey::new(Dataset::Users, "_id", 2));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id(), ScalarValue::Int(2));
    }

    #[test]
    fn test_lookup_missing_key_is_empty() {
        let index = sample_index();
        assert!(index.lookup(&QueryKey::new(Dataset::Users, "_id", 99)).is_empty());
        assert!(index.find_one(&QueryKey::new(Dataset::Users, "_id", 99)).is_none());
    }

    #[test]
    fn test_sequence_elements_are_separate_keys() {
        let index = sample_index();
        assert_eq!(index.lookup(&QueryKey::new(Dataset::Tickets, "tags", "a")).len(), 1);
        assert_eq!(index.lookup(&QueryKey::new(Dataset::Tickets, "tags", "b")).len(), 1);
        assert!(index
            .lookup(&QueryKey::new(Dataset::Tickets, "tags", "a, b"))
            .is_empty());
    }

    #[test]
    fn test_datasets_do_not_collide() {
        let index = sample_index();
        let tags = index.lookup(&QueryKey::new(Dataset::Organizations, "tags", "a"));
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].dataset(), Dataset::Organizations);

        let org_named_open = index.lookup(&QueryKey::new(Dataset::Organizations, "name", "open"));
        let ticket_status_open = index.lookup(&QueryKey::new(Dataset::Tickets, "status", "open"));
        assert_eq!(org_named_open.len(), 1);
        assert_eq!(ticket_status_open.len(), 1);
        assert_ne!(org_named_open[0].dataset(), ticket_status_open[0].dataset());
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let index = sample_index();
        let hits = index.lookup(&QueryKey::new(Dataset::Users, "active", false));
        let ids: Vec<_> = hits.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![ScalarValue::Int(1), ScalarValue::Int(2)]);
    }

    #[test]
    fn test_stats() {
        let index = sample_index();
        let stats = index.stats();

        assert_eq!(stats.total_records, 4);
        assert_eq!(stats.records_per_dataset[&Dataset::Users], 2);
        // users: 18 each, organization: 7 + 1 tag, ticket: 15 + 2 tags
        assert_eq!(stats.total_entries, 18 * 2 + 8 + 17);
        assert_eq!(index.dataset_count(Dataset::Tickets), 1);
    }
}
