//! Loader fan-out and index building
//!
//! This module provides:
//! - The [`RecordSource`] fetch abstraction and its JSON-file and in-memory implementations
//! - Decoding of raw collections into typed records
//! - The concurrent [`IndexBuilder`] pipeline that fans three loaders into one index

pub mod builder;
pub mod source;

pub use builder::{BuildOutput, BuildReport, IndexBuilder, LoaderFailure};
pub use source::{decode, JsonFileSource, MemorySource, RawCollection, RecordSource};
