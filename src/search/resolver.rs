//! Related-record resolution and full rendering

use crate::index::Index;
use crate::models::{Record, RelationKind};
use std::sync::Arc;

/// A record reached from another record through one of its references
#[derive(Debug, Clone)]
pub struct RelatedRecord {
    pub kind: RelationKind,
    pub record: Arc<Record>,
}

/// Resolve every reference of `record` that points at an indexed record.
///
/// Unset ids and ids with no match are skipped; absence is not an error.
pub fn resolve_related(index: &Index, record: &Record) -> Vec<RelatedRecord> {
    record
        .relations()
        .into_iter()
        .filter_map(|relation| {
            index.find_one(&relation.key).map(|found| RelatedRecord {
                kind: relation.kind,
                record: Arc::clone(found),
            })
        })
        .collect()
}

/// Full display of `record`: its own summary followed by the summary of each related record
pub fn render(index: &Index, record: &Record) -> String {
    let mut sections = vec![format!("## {}.\n{}", record.heading(), record.summary())];

    for related in resolve_related(index, record) {
        sections.push(format!("### {}.\n{}", related.kind, related.record.summary()));
    }

    sections.join("\n")
}

impl Record {
    /// See [`render`]
    pub fn render(&self, index: &Index) -> String {
        render(index, self)
    }
}
