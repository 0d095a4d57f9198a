use super::organization::Organization;
use super::query::{Dataset, QueryKey, ScalarValue};
use super::ticket::Ticket;
use super::user::User;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Capability shared by every record kind
pub trait Indexable {
    /// Dataset the record belongs to
    const DATASET: Dataset;

    /// Every (field, value) pair of the record, one key per sequence element
    fn keys_for_index(&self) -> Vec<QueryKey>;

    /// Fixed-format multi-line rendering of the record's own fields
    fn summary(&self) -> String;
}

/// A decoded record of any dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dataset", rename_all = "snake_case")]
pub enum Record {
    #[serde(rename = "users")]
    User(User),
    #[serde(rename = "organizations")]
    Organization(Organization),
    #[serde(rename = "tickets")]
    Ticket(Ticket),
}

/// Role a related record plays for the record that references it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RelationKind {
    Submitter,
    Assignee,
    Organization,
}

/// Reference from one record to another, by id
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub kind: RelationKind,
    pub key: QueryKey,
}

impl Relation {
    fn to(kind: RelationKind, dataset: Dataset, id: Option<i64>) -> Option<Self> {
        id.map(|id| Self {
            kind,
            key: QueryKey::new(dataset, "_id", id),
        })
    }
}

impl Record {
    pub fn dataset(&self) -> Dataset {
        match self {
            Record::User(_) => User::DATASET,
            Record::Organization(_) => Organization::DATASET,
            Record::Ticket(_) => Ticket::DATASET,
        }
    }

    /// Value of the record's `_id` field
    pub fn id(&self) -> ScalarValue {
        match self {
            Record::User(u) => u.id.into(),
            Record::Organization(o) => o.id.into(),
            Record::Ticket(t) => t.id.clone().into(),
        }
    }

    /// Key identifying this record within its dataset
    pub fn identity(&self) -> QueryKey {
        QueryKey::new(self.dataset(), "_id", self.id())
    }

    pub fn keys_for_index(&self) -> Vec<QueryKey> {
        match self {
            Record::User(u) => u.keys_for_index(),
            Record::Organization(o) => o.keys_for_index(),
            Record::Ticket(t) => t.keys_for_index(),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Record::User(u) => u.summary(),
            Record::Organization(o) => o.summary(),
            Record::Ticket(t) => t.summary(),
        }
    }

    /// Heading used when the record is rendered on its own
    pub fn heading(&self) -> &'static str {
        match self {
            Record::User(_) => "User",
            Record::Organization(_) => "Organization",
            Record::Ticket(_) => "Ticket",
        }
    }

    /// Records this one references. Unset ids produce no relation.
    pub fn relations(&self) -> Vec<Relation> {
        match self {
            Record::Ticket(t) => [
                Relation::to(RelationKind::Submitter, Dataset::Users, t.submitter_id),
                Relation::to(RelationKind::Assignee, Dataset::Users, t.assignee_id),
                Relation::to(
                    RelationKind::Organization,
                    Dataset::Organizations,
                    t.organization_id,
                ),
            ]
            .into_iter()
            .flatten()
            .collect(),
            Record::User(u) => Relation::to(
                RelationKind::Organization,
                Dataset::Organizations,
                u.organization_id,
            )
            .into_iter()
            .collect(),
            Record::Organization(_) => Vec::new(),
        }
    }
}

impl From<User> for Record {
    fn from(user: User) -> Self {
        Record::User(user)
    }
}

impl From<Organization> for Record {
    fn from(organization: Organization) -> Self {
        Record::Organization(organization)
    }
}

impl From<Ticket> for Record {
    fn from(ticket: Ticket) -> Self {
        Record::Ticket(ticket)
    }
}

/// Lay out `label: value` lines with labels right-aligned
pub(crate) fn format_summary(fields: &[(&str, String)]) -> String {
    let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    fields
        .iter()
        .map(|(label, value)| format!("{:>width$}: {}", label, value, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn list(values: &[String]) -> String {
    values.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_relations_skip_unset_ids() {
        let mut ticket = Ticket::new("T1", "subject");
        ticket.submitter_id = Some(1);
        ticket.organization_id = Some(101);

        let relations = Record::from(ticket).relations();
        assert_eq!(relations.len(), 2);
        assert_eq!(relations[0].kind, RelationKind::Submitter);
        assert_eq!(relations[0].key, QueryKey::new(Dataset::Users, "_id", 1));
        assert_eq!(relations[1].kind, RelationKind::Organization);
    }

    #[test]
    fn test_user_relations() {
        let mut user = User::new(1, "Francisca");
        assert!(Record::from(user.clone()).relations().is_empty());

        user.organization_id = Some(119);
        let relations = Record::from(user).relations();
        assert_eq!(
            relations[0].key,
            QueryKey::new(Dataset::Organizations, "_id", 119)
        );
    }

    #[test]
    fn test_identity() {
        let record = Record::from(Ticket::new("T9", "subject"));
        assert_eq!(record.dataset(), Dataset::Tickets);
        assert_eq!(record.identity(), QueryKey::new(Dataset::Tickets, "_id", "T9"));
    }

    #[test]
    fn test_format_summary_aligns_labels() {
        let text = format_summary(&[("_id", "1".to_string()), ("name", "x".to_string())]);
        assert_eq!(text, " _id: 1\nname: x");
    }
}
