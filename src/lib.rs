//! Concurrent loader and exact-match inverted index over users,
//! organizations and tickets.
//!
//! Three loaders fetch and decode their dataset in parallel and feed a
//! single aggregator that indexes every field of every record. The built
//! [`index::Index`] answers point queries by (dataset, field, value) and
//! resolves related records when rendering a match.

pub mod config;
pub mod error;
pub mod index;
pub mod ingestion;
pub mod models;
pub mod search;
pub mod validation;

pub use error::{AppError, Result};
