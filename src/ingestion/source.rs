//! Record sources: where loaders fetch raw collections from

use crate::config::DataConfig;
use crate::error::{AppError, Result};
use crate::models::{Database, Dataset, Organization, Record, Ticket, User};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Raw, not yet typed, records of one dataset
pub type RawCollection = Vec<Value>;

/// Fetch capability handed to each loader
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Source name for logs
    fn name(&self) -> &str;

    /// Produce the raw collection of `dataset`.
    ///
    /// Implementations should return [`AppError::Cancelled`] promptly once
    /// `cancel` fires.
    async fn fetch(&self, dataset: Dataset, cancel: &CancellationToken) -> Result<RawCollection>;
}

/// Decode a raw collection into typed records, preserving order.
///
/// All-or-nothing: the first element that does not match the dataset's
/// shape fails the whole collection.
pub fn decode(dataset: Dataset, raw: RawCollection) -> Result<Vec<Record>> {
    match dataset {
        Dataset::Users => decode_as::<User>(dataset, raw),
        Dataset::Organizations => decode_as::<Organization>(dataset, raw),
        Dataset::Tickets => decode_as::<Ticket>(dataset, raw),
    }
}

fn decode_as<T>(dataset: Dataset, raw: RawCollection) -> Result<Vec<Record>>
where
    T: DeserializeOwned + Into<Record>,
{
    raw.into_iter()
        .enumerate()
        .map(|(position, value)| {
            serde_json::from_value::<T>(value)
                .map(Into::into)
                .map_err(|e| AppError::Decode {
                    dataset,
                    message: format!("record {}: {}", position, e),
                })
        })
        .collect()
}

/// Reads one JSON array file per dataset
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    data: DataConfig,
}

impl JsonFileSource {
    pub fn new(data: DataConfig) -> Self {
        Self { data }
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn fetch(&self, dataset: Dataset, cancel: &CancellationToken) -> Result<RawCollection> {
        let path = self.data.path_for(dataset);
        debug!("Reading {} from {}", dataset, path.display());

        let bytes = tokio::select! {
            _ = cancel.cancelled() => return Err(AppError::Cancelled),
            read = tokio::fs::read(&path) => read.map_err(|e| AppError::SourceUnavailable {
                dataset,
                message: format!("{}: {}", path.display(), e),
            })?,
        };

        serde_json::from_slice::<RawCollection>(&bytes).map_err(|e| AppError::Decode {
            dataset,
            message: format!("{}: {}", path.display(), e),
        })
    }
}

/// Serves collections held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    collections: HashMap<Dataset, RawCollection>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw collection served for `dataset`
    pub fn with_collection(mut self, dataset: Dataset, raw: RawCollection) -> Self {
        self.collections.insert(dataset, raw);
        self
    }

    /// Serve the contents of a [`Database`]; every dataset is registered, possibly empty
    pub fn from_database(database: &Database) -> Result<Self> {
        let mut source = Self::new();
        for dataset in Dataset::ALL {
            source.collections.insert(dataset, RawCollection::new());
        }
        for record in database.records() {
            let (dataset, value) = match record {
                Record::User(u) => (Dataset::Users, serde_json::to_value(u)?),
                Record::Organization(o) => (Dataset::Organizations, serde_json::to_value(o)?),
                Record::Ticket(t) => (Dataset::Tickets, serde_json::to_value(t)?),
            };
            source.collections.entry(dataset).or_default().push(value);
        }
        Ok(source)
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch(&self, dataset: Dataset, cancel: &CancellationToken) -> Result<RawCollection> {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        self.collections
            .get(&dataset)
            .cloned()
            .ok_or_else(|| AppError::SourceUnavailable {
                dataset,
                message: "no collection registered".to_string(),
            })
    }
}
