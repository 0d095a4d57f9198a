//! Concurrent load-and-index pipeline
//!
//! One loader task per dataset fetches and decodes its collection, then
//! pushes every record onto a shared unbounded intake. A supervisor task
//! joins all loaders and records their outcomes. The aggregator runs on the
//! calling task and drains the intake into the [`Index`].
//!
//! Each loader owns a clone of the intake sender and drops it when it
//! finishes, after its last push. The intake therefore closes exactly when
//! every loader has completed, including loaders that failed or panicked,
//! and the drain loop terminates without counting completions by hand.

use crate::config::FailurePolicy;
use crate::error::{AppError, Result};
use crate::index::Index;
use crate::ingestion::source::{decode, RecordSource};
use crate::models::{Dataset, Record};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{self, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Summary of a completed build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    /// Records loaded per dataset
    pub records_per_dataset: HashMap<Dataset, usize>,

    /// Loaders that failed, with their error message (partial builds only)
    pub failures: Vec<LoaderFailure>,

    /// Distinct keys in the built index
    pub total_keys: usize,

    /// (key, record) entries in the built index
    pub total_entries: usize,

    /// Wall-clock build time in milliseconds
    pub duration_ms: u64,
}

impl BuildReport {
    /// Whether every loader succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderFailure {
    pub dataset: Option<Dataset>,
    pub code: String,
    pub message: String,
}

impl From<&AppError> for LoaderFailure {
    fn from(err: &AppError) -> Self {
        Self {
            dataset: err.dataset(),
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

/// A built index together with its report
#[derive(Debug)]
pub struct BuildOutput {
    pub index: Index,
    pub report: BuildReport,
}

/// Outcome of every loader, collected by the supervisor
#[derive(Default)]
struct LoadOutcome {
    loaded: HashMap<Dataset, usize>,
    failures: Vec<AppError>,
}

/// Builds an [`Index`] from one loader per dataset
pub struct IndexBuilder {
    loaders: Vec<(Dataset, Arc<dyn RecordSource>)>,
    policy: FailurePolicy,
    cancel: CancellationToken,
}

impl IndexBuilder {
    /// Load all three datasets from `source`
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self {
            loaders: Dataset::ALL
                .iter()
                .map(|dataset| (*dataset, Arc::clone(&source)))
                .collect(),
            policy: FailurePolicy::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Load `dataset` from `source` instead
    pub fn with_loader(mut self, dataset: Dataset, source: Arc<dyn RecordSource>) -> Self {
        self.loaders.retain(|(d, _)| *d != dataset);
        self.loaders.push((dataset, source));
        self
    }

    /// Do not load `dataset` at all
    pub fn without_loader(mut self, dataset: Dataset) -> Self {
        self.loaders.retain(|(d, _)| *d != dataset);
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Stop the build when `token` is cancelled
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Run the loaders and drain their records into a new index.
    ///
    /// Returns the first loader error under [`FailurePolicy::Abort`]. Under
    /// [`FailurePolicy::Partial`] the index holds the records of the loaders
    /// that succeeded and the failures are listed in the report. External
    /// cancellation always fails the build.
    pub async fn build(self) -> Result<BuildOutput> {
        let start = Instant::now();
        let IndexBuilder {
            loaders,
            policy,
            cancel: external,
        } = self;

        info!(
            "Building index from {} loaders (failure policy: {})",
            loaders.len(),
            policy
        );

        // Cancelling the child stops sibling loaders without touching the caller's token
        let cancel = external.child_token();
        let (intake_tx, mut intake_rx) = mpsc::unbounded_channel::<Arc<Record>>();

        let mut tasks = JoinSet::new();
        let mut task_datasets = HashMap::new();
        for (dataset, source) in loaders {
            let intake = intake_tx.clone();
            let cancel = cancel.clone();
            let handle = tasks.spawn(async move {
                let result = run_loader(dataset, source, intake, cancel).await;
                (dataset, result)
            });
            task_datasets.insert(handle.id(), dataset);
        }
        // Only loaders hold senders from here on
        drop(intake_tx);

        let (outcome_tx, outcome_rx) = oneshot::channel();
        tokio::spawn(supervise(
            tasks,
            task_datasets,
            policy,
            cancel.clone(),
            outcome_tx,
        ));

        let mut index = Index::new();
        while let Some(record) = intake_rx.recv().await {
            index.insert(record);
        }
        index.seal();

        let outcome = outcome_rx
            .await
            .map_err(|_| AppError::Internal("supervisor exited without a result".to_string()))?;

        if external.is_cancelled() {
            warn!("Index build cancelled");
            return Err(AppError::Cancelled);
        }

        if outcome.failures.iter().any(is_root_cause) {
            if policy == FailurePolicy::Abort {
                let err = outcome
                    .failures
                    .into_iter()
                    .find(is_root_cause)
                    .unwrap_or(AppError::Cancelled);
                error!("Index build aborted: {}", err);
                return Err(err);
            }
            warn!(
                "Index built with {} failed loaders; results may be incomplete",
                outcome.failures.len()
            );
        }

        let stats = index.stats();
        let report = BuildReport {
            records_per_dataset: outcome.loaded,
            failures: outcome.failures.iter().map(LoaderFailure::from).collect(),
            total_keys: stats.total_keys,
            total_entries: stats.total_entries,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Index built in {}ms: {} records, {} keys, {} entries",
            report.duration_ms, stats.total_records, report.total_keys, report.total_entries
        );

        Ok(BuildOutput { index, report })
    }
}

/// Fetch, decode and push one dataset. Dropping `intake` on return signals completion.
async fn run_loader(
    dataset: Dataset,
    source: Arc<dyn RecordSource>,
    intake: mpsc::UnboundedSender<Arc<Record>>,
    cancel: CancellationToken,
) -> Result<usize> {
    debug!("Loading {} from {} source", dataset, source.name());

    let raw = source.fetch(dataset, &cancel).await?;
    let records = decode(dataset, raw)?;
    let count = records.len();

    for record in records {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        intake
            .send(Arc::new(record))
            .map_err(|_| AppError::Internal(format!("{} intake closed", dataset)))?;
    }

    debug!("Loaded {} {}", count, dataset);
    Ok(count)
}

/// Join every loader and report their outcomes.
///
/// Under the abort policy the first failure cancels the remaining loaders.
async fn supervise(
    mut tasks: JoinSet<(Dataset, Result<usize>)>,
    task_datasets: HashMap<task::Id, Dataset>,
    policy: FailurePolicy,
    cancel: CancellationToken,
    outcome_tx: oneshot::Sender<LoadOutcome>,
) {
    let mut outcome = LoadOutcome::default();

    while let Some(joined) = tasks.join_next_with_id().await {
        let failure = match joined {
            Ok((_, (dataset, Ok(count)))) => {
                outcome.loaded.insert(dataset, count);
                continue;
            }
            Ok((_, (dataset, Err(err)))) => {
                error!("Loader for {} failed: {}", dataset, err);
                err
            }
            Err(join_err) => match task_datasets.get(&join_err.id()) {
                Some(&dataset) => {
                    error!("Loader task for {} failed: {}", dataset, join_err);
                    AppError::LoaderTask {
                        dataset,
                        message: join_err.to_string(),
                    }
                }
                None => {
                    error!("Loader task failed: {}", join_err);
                    AppError::from(join_err)
                }
            },
        };

        if policy == FailurePolicy::Abort && is_root_cause(&failure) {
            cancel.cancel();
        }
        outcome.failures.push(failure);
    }

    // The aggregator only drops the receiver if it was itself cancelled
    let _ = outcome_tx.send(outcome);
}

/// Cancellations caused by a sibling's failure are not root causes
fn is_root_cause(err: &AppError) -> bool {
    !matches!(err, AppError::Cancelled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::source::{MemorySource, RawCollection};
    use crate::models::QueryKey;
    use async_trait::async_trait;
    use serde_json::json;

    fn fixture() -> MemorySource {
        MemorySource::new()
            .with_collection(
                Dataset::Users,
                vec![json!({"_id": 1, "name": "Francisca"}), json!({"_id": 2, "name": "Cross"})],
            )
            .with_collection(Dataset::Organizations, vec![json!({"_id": 101, "name": "Enthaze"})])
            .with_collection(
                Dataset::Tickets,
                vec![json!({"_id": "T1", "submitter_id": 1, "tags": ["a", "b"]})],
            )
    }

    struct FailingSource;

    #[async_trait]
    impl RecordSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch(
            &self,
            dataset: Dataset,
            _cancel: &CancellationToken,
        ) -> Result<RawCollection> {
            Err(AppError::SourceUnavailable {
                dataset,
                message: "unreachable".to_string(),
            })
        }
    }

    struct PanickingSource;

    #[async_trait]
    impl RecordSource for PanickingSource {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn fetch(
            &self,
            _dataset: Dataset,
            _cancel: &CancellationToken,
        ) -> Result<RawCollection> {
            panic!("corrupt source state")
        }
    }

    #[tokio::test]
    async fn test_build_indexes_all_datasets() {
        let output = IndexBuilder::new(Arc::new(fixture())).build().await.unwrap();

        assert_eq!(output.index.record_count(), 4);
        assert_eq!(output.report.records_per_dataset[&Dataset::Users], 2);
        assert!(output.report.is_complete());
        assert_eq!(
            output
                .index
                .lookup(&QueryKey::new(Dataset::Tickets, "_id", "T1"))
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_abort_policy_returns_root_cause() {
        let err = IndexBuilder::new(Arc::new(fixture()))
            .with_loader(Dataset::Organizations, Arc::new(FailingSource))
            .build()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::SourceUnavailable {
                dataset: Dataset::Organizations,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_partial_policy_keeps_successful_loaders() {
        let output = IndexBuilder::new(Arc::new(fixture()))
            .with_loader(Dataset::Organizations, Arc::new(FailingSource))
            .failure_policy(FailurePolicy::Partial)
            .build()
            .await
            .unwrap();

        assert_eq!(output.index.dataset_count(Dataset::Organizations), 0);
        assert_eq!(output.index.dataset_count(Dataset::Users), 2);
        assert_eq!(output.report.failures.len(), 1);
        assert_eq!(output.report.failures[0].dataset, Some(Dataset::Organizations));
    }

    #[tokio::test]
    async fn test_no_loaders_yields_empty_index() {
        let output = IndexBuilder::new(Arc::new(fixture()))
            .without_loader(Dataset::Users)
            .without_loader(Dataset::Organizations)
            .without_loader(Dataset::Tickets)
            .build()
            .await
            .unwrap();

        assert!(output.index.is_empty());
        assert_eq!(output.report.total_entries, 0);
    }

    #[tokio::test]
    async fn test_cancelled_build_fails() {
        let token = CancellationToken::new();
        token.cancel();

        let err = IndexBuilder::new(Arc::new(fixture()))
            .cancellation(token)
            .failure_policy(FailurePolicy::Partial)
            .build()
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Cancelled));
    }

    #[tokio::test]
    async fn test_panicked_loader_keeps_its_dataset() {
        let output = IndexBuilder::new(Arc::new(fixture()))
            .with_loader(Dataset::Tickets, Arc::new(PanickingSource))
            .failure_policy(FailurePolicy::Partial)
            .build()
            .await
            .unwrap();

        assert_eq!(output.report.failures.len(), 1);
        assert_eq!(output.report.failures[0].dataset, Some(Dataset::Tickets));
        assert_eq!(output.report.failures[0].code, "LOADER_TASK_FAILED");
        assert_eq!(output.index.dataset_count(Dataset::Users), 2);

        let err = IndexBuilder::new(Arc::new(fixture()))
            .with_loader(Dataset::Tickets, Arc::new(PanickingSource))
            .build()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::LoaderTask {
                dataset: Dataset::Tickets,
                ..
            }
        ));
    }
}
