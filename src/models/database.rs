use super::organization::Organization;
use super::record::Record;
use super::ticket::Ticket;
use super::user::User;
use serde::{Deserialize, Serialize};

/// Plain aggregate of the three unindexed collections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub users: Vec<User>,
    pub organizations: Vec<Organization>,
    pub tickets: Vec<Ticket>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across datasets
    pub fn len(&self) -> usize {
        self.users.len() + self.organizations.len() + self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a record to the collection of its dataset
    pub fn insert(&mut self, record: Record) {
        match record {
            Record::User(u) => self.users.push(u),
            Record::Organization(o) => self.organizations.push(o),
            Record::Ticket(t) => self.tickets.push(t),
        }
    }

    /// All records, users first, then organizations, then tickets
    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        self.users
            .iter()
            .cloned()
            .map(Record::from)
            .chain(self.organizations.iter().cloned().map(Record::from))
            .chain(self.tickets.iter().cloned().map(Record::from))
    }
}

impl FromIterator<Record> for Database {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut database = Database::new();
        for record in iter {
            database.insert(record);
        }
        database
    }
}
