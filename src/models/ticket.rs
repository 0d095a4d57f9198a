use super::query::{Dataset, KeyWriter, QueryKey};
use super::record::{format_summary, list, Indexable};
use serde::{Deserialize, Serialize};

/// Searchable ticket fields
pub const TICKET_FIELDS: &[&str] = &[
    "_id",
    "url",
    "external_id",
    "created_at",
    "type",
    "subject",
    "description",
    "priority",
    "status",
    "submitter_id",
    "assignee_id",
    "organization_id",
    "tags",
    "has_incidents",
    "due_at",
    "via",
];

/// Alternative spellings accepted for ticket fields, as (alias, field)
pub const TICKET_FIELD_ALIASES: &[(&str, &str)] = &[("desciption", "description")];

/// A ticket record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub external_id: String,

    #[serde(default)]
    pub created_at: String,

    #[serde(rename = "type", default)]
    pub ticket_type: String,

    #[serde(default)]
    pub subject: String,

    #[serde(default, alias = "desciption")]
    pub description: String,

    #[serde(default)]
    pub priority: String,

    #[serde(default)]
    pub status: String,

    /// User who raised the ticket
    #[serde(default)]
    pub submitter_id: Option<i64>,

    /// User the ticket is assigned to
    #[serde(default)]
    pub assignee_id: Option<i64>,

    #[serde(default)]
    pub organization_id: Option<i64>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub has_incidents: bool,

    #[serde(default)]
    pub due_at: String,

    #[serde(default)]
    pub via: String,
}

impl Ticket {
    /// Create a ticket with only an id and a subject set
    pub fn new(id: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: String::new(),
            external_id: String::new(),
            created_at: String::new(),
            ticket_type: String::new(),
            subject: subject.into(),
            description: String::new(),
            priority: String::new(),
            status: String::new(),
            submitter_id: None,
            assignee_id: None,
            organization_id: None,
            tags: Vec::new(),
            has_incidents: false,
            due_at: String::new(),
            via: String::new(),
        }
    }
}

impl Indexable for Ticket {
    const DATASET: Dataset = Dataset::Tickets;

    fn keys_for_index(&self) -> Vec<QueryKey> {
        KeyWriter::new(Self::DATASET)
            .scalar("_id", &self.id)
            .scalar("url", &self.url)
            .scalar("external_id", &self.external_id)
            .scalar("created_at", &self.created_at)
            .scalar("type", &self.ticket_type)
            .scalar("subject", &self.subject)
            .scalar("description", &self.description)
            .scalar("priority", &self.priority)
            .scalar("status", &self.status)
            .scalar("submitter_id", self.submitter_id)
            .scalar("assignee_id", self.assignee_id)
            .scalar("organization_id", self.organization_id)
            .scalar("has_incidents", self.has_incidents)
            .scalar("due_at", &self.due_at)
            .scalar("via", &self.via)
            .each("tags", &self.tags)
            .finish()
    }

    fn summary(&self) -> String {
        format_summary(&[
            ("_id", self.id.clone()),
            ("url", self.url.clone()),
            ("external_id", self.external_id.clone()),
            ("created_at", self.created_at.clone()),
            ("type", self.ticket_type.clone()),
            ("subject", self.subject.clone()),
            ("description", self.description.clone()),
            ("priority", self.priority.clone()),
            ("status", self.status.clone()),
            ("tags", list(&self.tags)),
            ("has_incidents", self.has_incidents.to_string()),
            ("due_at", self.due_at.clone()),
            ("via", self.via.clone()),
        ])
    }
}
