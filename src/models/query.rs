use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};

/// One of the three top-level record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Dataset {
    Users,
    Organizations,
    Tickets,
}

impl Dataset {
    /// All datasets, in load order
    pub const ALL: [Dataset; 3] = [Dataset::Users, Dataset::Organizations, Dataset::Tickets];

    /// Searchable field names, in display order
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Dataset::Users => super::user::USER_FIELDS,
            Dataset::Organizations => super::organization::ORGANIZATION_FIELDS,
            Dataset::Tickets => super::ticket::TICKET_FIELDS,
        }
    }

    /// Catalogue name of `field`, resolving spelling aliases
    pub fn canonical_field(&self, field: &str) -> Option<&'static str> {
        let field = self
            .field_aliases()
            .iter()
            .find(|(alias, _)| *alias == field)
            .map_or(field, |(_, name)| *name);
        self.fields().iter().copied().find(|f| *f == field)
    }

    fn field_aliases(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Dataset::Tickets => super::ticket::TICKET_FIELD_ALIASES,
            _ => &[],
        }
    }

    /// Whether `field` is a searchable field of this dataset
    pub fn has_field(&self, field: &str) -> bool {
        self.fields().contains(&field)
    }

    /// Value type of `field`, or `None` if the dataset has no such field
    pub fn field_kind(&self, field: &str) -> Option<FieldKind> {
        if !self.has_field(field) {
            return None;
        }

        let kind = match (self, field) {
            (_, "_id") if *self != Dataset::Tickets => FieldKind::Integer,
            (_, "organization_id") => FieldKind::Integer,
            (Dataset::Tickets, "submitter_id" | "assignee_id") => FieldKind::Integer,
            (Dataset::Users, "active" | "verified" | "shared" | "suspended") => FieldKind::Boolean,
            (Dataset::Organizations, "shared_tickets") => FieldKind::Boolean,
            (Dataset::Tickets, "has_incidents") => FieldKind::Boolean,
            _ => FieldKind::Text,
        };
        Some(kind)
    }
}

/// Value type of a searchable field. Sequence fields are searched per element and are `Text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    Boolean,
}

/// Scalar value carried by a query key.
///
/// Equality and hashing are by value. Numbers are integers only; every
/// numeric field in the data model is an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl ScalarValue {
    /// The value an absent or empty field is indexed under
    pub fn empty() -> Self {
        ScalarValue::Str(String::new())
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(b) => write!(f, "{}", b),
            ScalarValue::Int(n) => write!(f, "{}", n),
            ScalarValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<Option<i64>> for ScalarValue {
    fn from(value: Option<i64>) -> Self {
        value.map(ScalarValue::Int).unwrap_or_else(ScalarValue::empty)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Str(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Str(value)
    }
}

impl From<&String> for ScalarValue {
    fn from(value: &String) -> Self {
        ScalarValue::Str(value.clone())
    }
}

/// Lookup key of the index: (dataset, field, value)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    pub dataset: Dataset,
    pub field: String,
    pub value: ScalarValue,
}

impl QueryKey {
    pub fn new(dataset: Dataset, field: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        Self {
            dataset,
            field: field.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} = {:?}", self.dataset, self.field, self.value.to_string())
    }
}

/// Accumulates the keys of one record, always prefixed with its dataset
pub(crate) struct KeyWriter {
    dataset: Dataset,
    keys: Vec<QueryKey>,
}

impl KeyWriter {
    pub(crate) fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            keys: Vec::new(),
        }
    }

    pub(crate) fn scalar(&mut self, field: &str, value: impl Into<ScalarValue>) -> &mut Self {
        self.keys.push(QueryKey::new(self.dataset, field, value));
        self
    }

    /// One key per element; the sequence itself is never a key
    pub(crate) fn each(&mut self, field: &str, values: &[String]) -> &mut Self {
        for value in values {
            self.keys.push(QueryKey::new(self.dataset, field, value));
        }
        self
    }

    pub(crate) fn finish(&mut self) -> Vec<QueryKey> {
        std::mem::take(&mut self.keys)
    }
}
