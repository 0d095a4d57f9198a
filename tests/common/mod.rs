//! Shared fixtures for integration tests
//!
//! Three users, two organizations and five tickets with cross references,
//! including one ticket whose assignee does not exist.

#![allow(dead_code)]

use record_search::ingestion::MemorySource;
use record_search::models::{Database, Organization, Ticket, User};
use std::path::Path;
use std::sync::Arc;

pub fn fixture_database() -> Database {
    let mut database = Database::new();

    let mut francisca = User::new(1, "Francisca Rasmussen");
    francisca.organization_id = Some(101);
    francisca.role = "admin".to_string();
    francisca.active = true;
    francisca.tags = vec!["Springville".to_string(), "Sutton".to_string()];

    let mut cross = User::new(2, "Cross Barlow");
    cross.organization_id = Some(102);
    cross.role = "agent".to_string();
    cross.tags = vec!["Foxworth".to_string()];

    // No organization, no tags
    let loner = User::new(3, "Ingrid Wagner");

    database.users = vec![francisca, cross, loner];

    let mut enthaze = Organization::new(101, "Enthaze");
    enthaze.domain_names = vec!["kage.com".to_string(), "ecratic.com".to_string()];
    enthaze.tags = vec!["Fulton".to_string(), "West".to_string()];
    enthaze.details = "MegaCorp".to_string();

    let mut nutralab = Organization::new(102, "Nutralab");
    nutralab.domain_names = vec!["trollery.com".to_string()];
    nutralab.shared_tickets = true;

    database.organizations = vec![enthaze, nutralab];

    let mut t1 = Ticket::new("T1", "A Catastrophe in Korea (North)");
    t1.submitter_id = Some(1);
    t1.assignee_id = Some(0);
    t1.organization_id = Some(101);
    t1.status = "open".to_string();
    t1.priority = "high".to_string();
    t1.tags = vec!["Ohio".to_string(), "Pennsylvania".to_string()];

    let mut t2 = Ticket::new("T2", "A Nuisance in Kiribati");
    t2.submitter_id = Some(2);
    t2.assignee_id = Some(1);
    t2.organization_id = Some(102);
    t2.status = "open".to_string();
    t2.has_incidents = true;

    let mut t3 = Ticket::new("T3", "A Problem in Morocco");
    t3.submitter_id = Some(3);
    t3.status = "pending".to_string();
    t3.tags = vec!["Ohio".to_string()];

    let mut t4 = Ticket::new("T4", "A Drama in Portugal");
    t4.submitter_id = Some(1);
    t4.assignee_id = Some(2);
    t4.status = "closed".to_string();

    // No submitter, no subject
    let t5 = Ticket::new("T5", "");

    database.tickets = vec![t1, t2, t3, t4, t5];
    database
}

pub fn fixture_source() -> Arc<MemorySource> {
    Arc::new(MemorySource::from_database(&fixture_database()).unwrap())
}

/// Write the fixture as one JSON array file per dataset under `dir`
pub fn write_fixture_files(dir: &Path) {
    let database = fixture_database();
    std::fs::write(
        dir.join("users.json"),
        serde_json::to_vec(&database.users).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join("organizations.json"),
        serde_json::to_vec(&database.organizations).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join("tickets.json"),
        serde_json::to_vec(&database.tickets).unwrap(),
    )
    .unwrap();
}
