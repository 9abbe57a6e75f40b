use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use vehiclix_core::models::report::{NewReport, Report, ReportState, ReportStatus, ReportType};
use vehiclix_export::encode::{ExportedFile, export_report};
use vehiclix_export::error::ExportError;
use vehiclix_export::format::ExportFormat;
use vehiclix_storage::error::StorageError;
use vehiclix_storage::store::{FleetStore, ReportStore};

use crate::aggregate::aggregate;
use crate::error::ReportError;

pub const INTERRUPTED_MESSAGE: &str = "interrupted before completion";

/// Attempts per state write before the worker gives up on a store error.
const WRITE_ATTEMPTS: u32 = 3;
const WRITE_BACKOFF: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub workers: usize,
    pub queue_capacity: usize,
    pub job_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 64,
            job_timeout: Duration::from_secs(120),
        }
    }
}

/// Outcome of [`ReportDispatcher::recover`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recovery {
    pub requeued: usize,
    pub failed: usize,
}

/// Accepts report requests, persists them as `Pending` and runs the
/// aggregation on a fixed pool of workers fed by a bounded queue.
pub struct ReportDispatcher {
    reports: Arc<dyn ReportStore>,
    queue: Mutex<Option<mpsc::Sender<u64>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

struct Worker {
    reports: Arc<dyn ReportStore>,
    fleet: Arc<dyn FleetStore>,
    job_timeout: Duration,
}

impl ReportDispatcher {
    /// Spawn the worker pool. Must be called from within a Tokio runtime.
    pub fn start(
        reports: Arc<dyn ReportStore>,
        fleet: Arc<dyn FleetStore>,
        config: DispatcherConfig,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<u64>(config.queue_capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));

        let worker = Arc::new(Worker {
            reports: reports.clone(),
            fleet,
            job_timeout: config.job_timeout,
        });

        let handles = (0..config.workers)
            .map(|n| {
                let worker = worker.clone();
                let rx = rx.clone();
                tokio::spawn(async move {
                    loop {
                        let next = rx.lock().await.recv().await;
                        match next {
                            Some(id) => worker.run(id).await,
                            None => break,
                        }
                    }
                    tracing::debug!(worker = n, "report worker stopped");
                })
            })
            .collect();

        tracing::info!(
            workers = config.workers,
            queue_capacity = config.queue_capacity,
            job_timeout_secs = config.job_timeout.as_secs(),
            "report dispatcher started"
        );

        Self {
            reports,
            queue: Mutex::new(Some(tx)),
            workers: Mutex::new(handles),
        }
    }

    /// Validate, persist as `Pending` and enqueue. Returns without waiting
    /// for the aggregation.
    pub async fn submit(
        &self,
        report_type: &str,
        parameters: BTreeMap<String, String>,
        requestor: Option<String>,
    ) -> Result<Report, ReportError> {
        if report_type.trim().is_empty() {
            return Err(ReportError::Validation("report type is required".to_string()));
        }
        let report_type: ReportType = report_type
            .parse()
            .map_err(|_| ReportError::InvalidReportType(report_type.to_string()))?;

        let sender = self.sender().await?;
        // Reserve the slot before persisting so a full queue leaves no orphan row.
        let permit = sender.try_reserve().map_err(|e| match e {
            mpsc::error::TrySendError::Full(()) => ReportError::QueueFull,
            mpsc::error::TrySendError::Closed(()) => ReportError::ShutDown,
        })?;

        let report = self
            .reports
            .insert_report(NewReport {
                report_type,
                parameters,
                created_by: requestor,
                created_at: jiff::Timestamp::now(),
            })
            .await?;

        permit.send(report.id);

        tracing::info!(
            id = report.id,
            report_id = %report.report_id,
            report_type = %report.report_type,
            created_by = report.created_by.as_deref().unwrap_or("-"),
            "report queued"
        );

        Ok(report)
    }

    pub async fn get(&self, id: u64) -> Result<Report, ReportError> {
        self.reports.get_report(id).await.map_err(|e| not_found(e, id))
    }

    /// All reports, newest first.
    pub async fn list(&self) -> Result<Vec<Report>, ReportError> {
        Ok(self.reports.list_reports().await?)
    }

    /// Render a completed report. The report is checked before the format,
    /// so asking for an unknown report always yields `NotFound`.
    pub async fn export(&self, id: u64, format: &str) -> Result<ExportedFile, ReportError> {
        let report = self.get(id).await?;

        let status = report.status();
        if status != ReportStatus::Completed {
            return Err(ReportError::NotReady { id, status });
        }

        let format: ExportFormat = format.parse().map_err(|e| match e {
            ExportError::UnsupportedFormat(f) => ReportError::UnsupportedFormat(f),
            other => ReportError::Export(other),
        })?;

        let file = export_report(&report, format)?;
        tracing::info!(id, %format, size = file.bytes.len(), "report exported");
        Ok(file)
    }

    /// Resume after a restart: re-enqueue every `Pending` report and fail
    /// every `InProgress` one, since its job died with the previous process.
    pub async fn recover(&self) -> Result<Recovery, ReportError> {
        let sender = self.sender().await?;
        let mut recovery = Recovery::default();

        let mut reports = self.reports.list_reports().await?;
        // Oldest first so queued work keeps its submission order.
        reports.reverse();

        for report in reports {
            match report.status() {
                ReportStatus::Pending => {
                    sender
                        .send(report.id)
                        .await
                        .map_err(|_| ReportError::ShutDown)?;
                    recovery.requeued += 1;
                }
                ReportStatus::InProgress => {
                    let failed = ReportState::Failed {
                        error: INTERRUPTED_MESSAGE.to_string(),
                        completed_at: jiff::Timestamp::now(),
                    };
                    match self.reports.transition_report(report.id, report.version, failed).await {
                        Ok(_) => recovery.failed += 1,
                        Err(e) if e.is_conflict() => {
                            tracing::warn!(id = report.id, error = %e, "report changed during recovery, skipped");
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                ReportStatus::Completed | ReportStatus::Failed => {}
            }
        }

        tracing::info!(
            requeued = recovery.requeued,
            failed = recovery.failed,
            "report recovery finished"
        );
        Ok(recovery)
    }

    /// Stop accepting work, let the workers drain the queue and wait for them.
    pub async fn shutdown(&self) {
        drop(self.queue.lock().await.take());

        let handles = std::mem::take(&mut *self.workers.lock().await);
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "report worker panicked");
            }
        }
        tracing::info!("report dispatcher stopped");
    }

    async fn sender(&self) -> Result<mpsc::Sender<u64>, ReportError> {
        self.queue.lock().await.clone().ok_or(ReportError::ShutDown)
    }
}

impl Worker {
    async fn run(&self, id: u64) {
        let report = match self.reports.get_report(id).await {
            Ok(report) => report,
            Err(StorageError::NotFound { .. }) => {
                tracing::warn!(id, "report no longer exists, job aborted");
                return;
            }
            Err(e) => {
                tracing::error!(id, error = %e, "failed to load report, job aborted");
                return;
            }
        };

        if report.status() != ReportStatus::Pending {
            tracing::warn!(id, status = %report.status(), "report is not pending, job skipped");
            return;
        }

        let report = match self.write(id, report.version, ReportState::InProgress).await {
            Ok(report) => report,
            Err(e) if e.is_conflict() => {
                tracing::warn!(id, error = %e, "report claimed by another writer, job skipped");
                return;
            }
            Err(e) => {
                tracing::error!(id, error = %e, "could not start report");
                self.give_up(id, report.version, &e).await;
                return;
            }
        };

        tracing::info!(id, report_id = %report.report_id, report_type = %report.report_type, "report started");

        let outcome = tokio::time::timeout(
            self.job_timeout,
            aggregate(report.report_type, &report.parameters, self.fleet.as_ref()),
        )
        .await;

        let completed_at = jiff::Timestamp::now();
        let next = match outcome {
            Ok(Ok(data)) => ReportState::Completed { data, completed_at },
            Ok(Err(e)) => {
                tracing::error!(id, error = %e, "report aggregation failed");
                ReportState::Failed {
                    error: e.to_string(),
                    completed_at,
                }
            }
            Err(_) => {
                tracing::error!(id, timeout_secs = self.job_timeout.as_secs_f64(), "report timed out");
                ReportState::Failed {
                    error: format!(
                        "report generation timed out after {}s",
                        self.job_timeout.as_secs_f64()
                    ),
                    completed_at,
                }
            }
        };

        match self.write(id, report.version, next).await {
            Ok(done) => {
                tracing::info!(id, report_id = %done.report_id, status = %done.status(), "report finished");
            }
            Err(e) if e.is_conflict() => {
                tracing::warn!(id, error = %e, "report modified concurrently, result discarded");
            }
            Err(e) => {
                tracing::error!(id, error = %e, "failed to record report outcome");
                self.give_up(id, report.version, &e).await;
            }
        }
    }

    /// Transition with a short backoff on store errors. Conflicts and
    /// rejected transitions are returned at once; retrying cannot fix them.
    async fn write(
        &self,
        id: u64,
        version: u64,
        next: ReportState,
    ) -> Result<Report, StorageError> {
        let mut attempt = 1;
        loop {
            match self.reports.transition_report(id, version, next.clone()).await {
                Err(e) if is_transient(&e) && attempt < WRITE_ATTEMPTS => {
                    tracing::warn!(id, attempt, error = %e, "report write failed, retrying");
                    tokio::time::sleep(WRITE_BACKOFF * attempt).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// Last resort after a write kept failing: record the store error itself
    /// as the outcome so the report does not stay open.
    async fn give_up(&self, id: u64, version: u64, cause: &StorageError) {
        let failed = ReportState::Failed {
            error: cause.to_string(),
            completed_at: jiff::Timestamp::now(),
        };
        match self.write(id, version, failed).await {
            Ok(_) => tracing::warn!(id, "report marked failed after store error"),
            Err(e) => {
                tracing::error!(id, error = %e, "could not mark report failed, left for recovery");
            }
        }
    }
}

fn is_transient(e: &StorageError) -> bool {
    !e.is_conflict() && !matches!(e, StorageError::NotFound { .. } | StorageError::Core(_))
}

fn not_found(e: StorageError, id: u64) -> ReportError {
    match e {
        StorageError::NotFound { .. } => ReportError::NotFound { id },
        other => ReportError::Storage(other),
    }
}
