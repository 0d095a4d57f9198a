//! Query resolution over the built index
//!
//! This module provides:
//! - Related-record resolution (ticket submitter, assignee and organization; user organization)
//! - Full rendering of a record with its related records
//! - A [`SearchService`] answering exact-match point queries

pub mod config;
pub mod resolver;
pub mod service;

pub use config::{SearchConfig, SearchConfigBuilder};
pub use resolver::{render, resolve_related, RelatedRecord};
pub use service::{RelatedHit, SearchHit, SearchResponse, SearchService};
