use super::query::{Dataset, KeyWriter, QueryKey};
use super::record::{format_summary, list, Indexable};
use serde::{Deserialize, Serialize};

/// Searchable organization fields
pub const ORGANIZATION_FIELDS: &[&str] = &[
    "_id",
    "url",
    "external_id",
    "name",
    "domain_names",
    "created_at",
    "details",
    "shared_tickets",
    "tags",
];

/// An organization record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(rename = "_id")]
    pub id: i64,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub external_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub domain_names: Vec<String>,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub details: String,

    #[serde(default)]
    pub shared_tickets: bool,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl Organization {
    /// Create an organization with only an id and a name set
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            url: String::new(),
            external_id: String::new(),
            name: name.into(),
            domain_names: Vec::new(),
            created_at: String::new(),
            details: String::new(),
            shared_tickets: false,
            tags: Vec::new(),
        }
    }
}

impl Indexable for Organization {
    const DATASET: Dataset = Dataset::Organizations;

    fn keys_for_index(&self) -> Vec<QueryKey> {
        KeyWriter::new(Self::DATASET)
            .scalar("_id", self.id)
            .scalar("url", &self.url)
            .scalar("external_id", &self.external_id)
            .scalar("name", &self.name)
            .scalar("created_at", &self.created_at)
            .scalar("details", &self.details)
            .scalar("shared_tickets", self.shared_tickets)
            .each("tags", &self.tags)
            .each("domain_names", &self.domain_names)
            .finish()
    }

    fn summary(&self) -> String {
        format_summary(&[
            ("_id", self.id.to_string()),
            ("url", self.url.clone()),
            ("external_id", self.external_id.clone()),
            ("name", self.name.clone()),
            ("domain_names", list(&self.domain_names)),
            ("created_at", self.created_at.clone()),
            ("details", self.details.clone()),
            ("shared_tickets", self.shared_tickets.to_string()),
            ("tags", list(&self.tags)),
        ])
    }
}
