use super::query::{Dataset, KeyWriter, QueryKey};
use super::record::{format_summary, list, Indexable};
use serde::{Deserialize, Serialize};

/// Searchable user fields
pub const USER_FIELDS: &[&str] = &[
    "_id",
    "url",
    "external_id",
    "name",
    "alias",
    "created_at",
    "active",
    "verified",
    "shared",
    "locale",
    "timezone",
    "last_login_at",
    "email",
    "phone",
    "signature",
    "organization_id",
    "tags",
    "suspended",
    "role",
];

/// A user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: i64,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub external_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub alias: String,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub verified: bool,

    #[serde(default)]
    pub shared: bool,

    #[serde(default)]
    pub locale: String,

    #[serde(default)]
    pub timezone: String,

    #[serde(default)]
    pub last_login_at: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub signature: String,

    /// Organization the user belongs to
    #[serde(default)]
    pub organization_id: Option<i64>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub suspended: bool,

    #[serde(default)]
    pub role: String,
}

impl User {
    /// Create a user with only an id and a name set
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            url: String::new(),
            external_id: String::new(),
            name: name.into(),
            alias: String::new(),
            created_at: String::new(),
            active: false,
            verified: false,
            shared: false,
            locale: String::new(),
            timezone: String::new(),
            last_login_at: String::new(),
            email: String::new(),
            phone: String::new(),
            signature: String::new(),
            organization_id: None,
            tags: Vec::new(),
            suspended: false,
            role: String::new(),
        }
    }
}

impl Indexable for User {
    const DATASET: Dataset = Dataset::Users;

    fn keys_for_index(&self) -> Vec<QueryKey> {
        KeyWriter::new(Self::DATASET)
            .scalar("_id", self.id)
            .scalar("url", &self.url)
            .scalar("external_id", &self.external_id)
            .scalar("name", &self.name)
            .scalar("alias", &self.alias)
            .scalar("created_at", &self.created_at)
            .scalar("active", self.active)
            .scalar("verified", self.verified)
            .scalar("shared", self.shared)
            .scalar("locale", &self.locale)
            .scalar("timezone", &self.timezone)
            .scalar("last_login_at", &self.last_login_at)
            .scalar("email", &self.email)
            .scalar("phone", &self.phone)
            .scalar("signature", &self.signature)
            .scalar("organization_id", self.organization_id)
            .scalar("suspended", self.suspended)
            .scalar("role", &self.role)
            .each("tags", &self.tags)
            .finish()
    }

    fn summary(&self) -> String {
        format_summary(&[
            ("_id", self.id.to_string()),
            ("url", self.url.clone()),
            ("external_id", self.external_id.clone()),
            ("name", self.name.clone()),
            ("alias", self.alias.clone()),
            ("created_at", self.created_at.clone()),
            ("active", self.active.to_string()),
            ("verified", self.verified.to_string()),
            ("shared", self.shared.to_string()),
            ("locale", self.locale.clone()),
            ("timezone", self.timezone.clone()),
            ("last_login_at", self.last_login_at.clone()),
            ("email", self.email.clone()),
            ("phone", self.phone.clone()),
            ("signature", self.signature.clone()),
            ("tags", list(&self.tags)),
            ("suspended", self.suspended.to_string()),
            ("role", self.role.clone()),
        ])
    }
}
