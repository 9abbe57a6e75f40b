use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Semaphore;

use vehiclix_core::models::claim::{Claim, ClaimDraft, ClaimStatus};
use vehiclix_core::models::fine::{Fine, FineDraft};
use vehiclix_core::models::report::{NewReport, Report, ReportState, ReportStatus, ReportType};
use vehiclix_core::models::report_data::ReportData;
use vehiclix_core::models::vehicle::{Vehicle, VehicleDraft, VehicleStatus};
use vehiclix_reports::dispatcher::{DispatcherConfig, INTERRUPTED_MESSAGE, ReportDispatcher};
use vehiclix_reports::error::ReportError;
use vehiclix_storage::error::StorageError;
use vehiclix_storage::memory::MemoryStore;
use vehiclix_storage::store::{BoxFuture, FleetStore, ReportStore};

fn config(workers: usize, queue_capacity: usize) -> DispatcherConfig {
    DispatcherConfig {
        workers,
        queue_capacity,
        job_timeout: Duration::from_secs(5),
    }
}

fn vehicle_draft(vin: &str, status: VehicleStatus) -> VehicleDraft {
    VehicleDraft {
        id: None,
        vin: vin.to_string(),
        license_plate: "XYZ-100".to_string(),
        brand: "Ford".to_string(),
        model: "Focus".to_string(),
        year: 2019,
        status,
    }
}

async fn wait_for_terminal(dispatcher: &ReportDispatcher, id: u64) -> Report {
    for _ in 0..200 {
        let report = dispatcher.get(id).await.unwrap();
        if report.state.is_terminal() {
            return report;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("report {id} did not reach a terminal state");
}

async fn wait_for_status(store: &MemoryStore, id: u64, status: ReportStatus) {
    for _ in 0..200 {
        if store.get_report(id).await.unwrap().status() == status {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("report {id} never reached {status}");
}

/// Fleet whose reads block until the test hands out permits, or fail
/// outright when `broken` is set.
struct GatedFleet {
    inner: MemoryStore,
    gate: Semaphore,
    broken: bool,
}

impl GatedFleet {
    fn closed() -> Self {
        Self {
            inner: MemoryStore::new(),
            gate: Semaphore::new(0),
            broken: false,
        }
    }

    fn broken() -> Self {
        Self {
            inner: MemoryStore::new(),
            gate: Semaphore::new(Semaphore::MAX_PERMITS),
            broken: true,
        }
    }

    async fn pass(&self) -> Result<(), StorageError> {
        let permit = self.gate.acquire().await.expect("gate closed");
        permit.forget();
        if self.broken {
            return Err(StorageError::ListObjects("connection reset".to_string()));
        }
        Ok(())
    }
}

impl FleetStore for GatedFleet {
    fn list_vehicles(&self) -> BoxFuture<'_, Result<Vec<Vehicle>, StorageError>> {
        Box::pin(async move {
            self.pass().await?;
            self.inner.list_vehicles().await
        })
    }

    fn get_vehicle(&self, id: u64) -> BoxFuture<'_, Result<Vehicle, StorageError>> {
        self.inner.get_vehicle(id)
    }

    fn insert_vehicle(
        &self,
        draft: VehicleDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Vehicle, StorageError>> {
        self.inner.insert_vehicle(draft, by)
    }

    fn update_vehicle(
        &self,
        id: u64,
        draft: VehicleDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Vehicle, StorageError>> {
        self.inner.update_vehicle(id, draft, by)
    }

    fn delete_vehicle(&self, id: u64) -> BoxFuture<'_, Result<(), StorageError>> {
        self.inner.delete_vehicle(id)
    }

    fn list_claims(&self) -> BoxFuture<'_, Result<Vec<Claim>, StorageError>> {
        Box::pin(async move {
            self.pass().await?;
            self.inner.list_claims().await
        })
    }

    fn get_claim(&self, id: u64) -> BoxFuture<'_, Result<Claim, StorageError>> {
        self.inner.get_claim(id)
    }

    fn insert_claim(
        &self,
        draft: ClaimDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Claim, StorageError>> {
        self.inner.insert_claim(draft, by)
    }

    fn update_claim(
        &self,
        id: u64,
        draft: ClaimDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Claim, StorageError>> {
        self.inner.update_claim(id, draft, by)
    }

    fn delete_claim(&self, id: u64) -> BoxFuture<'_, Result<(), StorageError>> {
        self.inner.delete_claim(id)
    }

    fn list_fines(&self) -> BoxFuture<'_, Result<Vec<Fine>, StorageError>> {
        Box::pin(async move {
            self.pass().await?;
            self.inner.list_fines().await
        })
    }

    fn get_fine(&self, id: u64) -> BoxFuture<'_, Result<Fine, StorageError>> {
        self.inner.get_fine(id)
    }

    fn insert_fine(
        &self,
        draft: FineDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Fine, StorageError>> {
        self.inner.insert_fine(draft, by)
    }

    fn update_fine(
        &self,
        id: u64,
        draft: FineDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Fine, StorageError>> {
        self.inner.update_fine(id, draft, by)
    }

    fn delete_fine(&self, id: u64) -> BoxFuture<'_, Result<(), StorageError>> {
        self.inner.delete_fine(id)
    }
}

#[tokio::test]
async fn submission_returns_pending_then_completes() {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_vehicle(vehicle_draft("VIN0001", VehicleStatus::Active), None)
        .await
        .unwrap();
    store
        .insert_vehicle(vehicle_draft("VIN0002", VehicleStatus::Inactive), None)
        .await
        .unwrap();
    let dispatcher = ReportDispatcher::start(store.clone(), store.clone(), config(2, 8));

    let report = dispatcher
        .submit("VehicleStatus", BTreeMap::new(), Some("admin@vehiclix.test".to_string()))
        .await
        .unwrap();
    assert_eq!(report.status(), ReportStatus::Pending);
    assert_eq!(report.created_by.as_deref(), Some("admin@vehiclix.test"));

    let done = wait_for_terminal(&dispatcher, report.id).await;
    assert_eq!(done.status(), ReportStatus::Completed);
    assert!(done.error().is_none());
    assert!(done.completed_at().is_some());
    assert_eq!(done.version, 2);
    match done.data() {
        Some(ReportData::VehicleStatus(data)) => assert_eq!(data.total_count, 2),
        other => panic!("unexpected data: {other:?}"),
    }

    dispatcher.shutdown().await;
}

#[tokio::test]
async fn claims_summary_runs_with_date_filters() {
    let store = Arc::new(MemoryStore::new());
    let vehicle = store
        .insert_vehicle(vehicle_draft("VIN0003", VehicleStatus::Active), None)
        .await
        .unwrap();
    for (day, amount) in [(jiff::civil::date(2024, 1, 1), 100.0), (jiff::civil::date(2025, 1, 1), 900.0)] {
        store
            .insert_claim(
                ClaimDraft {
                    id: None,
                    claim_id: format!("CLM-{day}"),
                    vehicle_id: vehicle.id,
                    date: day,
                    description: "Hail damage".to_string(),
                    amount,
                    photos: vec![],
                    status: ClaimStatus::Approved,
                },
                None,
            )
            .await
            .unwrap();
    }
    let dispatcher = ReportDispatcher::start(store.clone(), store.clone(), config(1, 8));

    let mut params = BTreeMap::new();
    params.insert("startDate".to_string(), "2024-01-01".to_string());
    params.insert("endDate".to_string(), "2024-12-31".to_string());
    let report = dispatcher.submit("claimssummary", params, None).await.unwrap();
    assert_eq!(report.report_type, ReportType::ClaimsSummary);

    let done = wait_for_terminal(&dispatcher, report.id).await;
    match done.data() {
        Some(ReportData::ClaimsSummary(data)) => {
            assert_eq!(data.total_count, 1);
            assert_eq!(data.total_amount, 100.0);
        }
        other => panic!("unexpected data: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_type_is_rejected_at_submission() {
    let store = Arc::new(MemoryStore::new());
    let dispatcher = ReportDispatcher::start(store.clone(), store.clone(), config(1, 8));

    let err = dispatcher
        .submit("MileageSummary", BTreeMap::new(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::InvalidReportType(ref t) if t == "MileageSummary"));

    let err = dispatcher.submit("  ", BTreeMap::new(), None).await.unwrap_err();
    assert!(matches!(err, ReportError::Validation(_)));

    assert!(dispatcher.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_report_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let dispatcher = ReportDispatcher::start(store.clone(), store.clone(), config(1, 8));

    assert!(matches!(
        dispatcher.get(99).await.unwrap_err(),
        ReportError::NotFound { id: 99 }
    ));
    assert!(matches!(
        dispatcher.export(99, "csv").await.unwrap_err(),
        ReportError::NotFound { id: 99 }
    ));
}

#[tokio::test]
async fn export_requires_completed_report() {
    let store = Arc::new(MemoryStore::new());
    let fleet = Arc::new(GatedFleet::closed());
    let dispatcher = ReportDispatcher::start(store.clone(), fleet.clone(), config(1, 8));

    let report = dispatcher
        .submit("VehicleStatus", BTreeMap::new(), None)
        .await
        .unwrap();

    let err = dispatcher.export(report.id, "csv").await.unwrap_err();
    assert!(matches!(err, ReportError::NotReady { .. }));

    fleet.gate.add_permits(1);
    wait_for_terminal(&dispatcher, report.id).await;

    let err = dispatcher.export(report.id, "docx").await.unwrap_err();
    assert!(matches!(err, ReportError::UnsupportedFormat(ref f) if f == "docx"));

    let file = dispatcher.export(report.id, "CSV").await.unwrap();
    assert_eq!(file.file_name, format!("report_{}.csv", report.id));
    assert_eq!(file.content_type, "text/csv");
}

#[tokio::test]
async fn job_past_deadline_fails_with_timeout() {
    let store = Arc::new(MemoryStore::new());
    let fleet = Arc::new(GatedFleet::closed());
    let dispatcher = ReportDispatcher::start(
        store.clone(),
        fleet,
        DispatcherConfig {
            workers: 1,
            queue_capacity: 4,
            job_timeout: Duration::from_millis(50),
        },
    );

    let report = dispatcher
        .submit("FinesSummary", BTreeMap::new(), None)
        .await
        .unwrap();

    let done = wait_for_terminal(&dispatcher, report.id).await;
    assert_eq!(done.status(), ReportStatus::Failed);
    assert!(done.data().is_none());
    assert!(done.error().unwrap().contains("timed out"));
}

#[tokio::test]
async fn aggregation_error_is_recorded() {
    let store = Arc::new(MemoryStore::new());
    let dispatcher = ReportDispatcher::start(store.clone(), Arc::new(GatedFleet::broken()), config(1, 4));

    let report = dispatcher
        .submit("ClaimsSummary", BTreeMap::new(), None)
        .await
        .unwrap();

    let done = wait_for_terminal(&dispatcher, report.id).await;
    assert_eq!(done.status(), ReportStatus::Failed);
    assert!(done.error().unwrap().contains("connection reset"));
}

#[tokio::test]
async fn saturated_queue_rejects_without_persisting() {
    let store = Arc::new(MemoryStore::new());
    let fleet = Arc::new(GatedFleet::closed());
    let dispatcher = ReportDispatcher::start(store.clone(), fleet.clone(), config(1, 1));

    // The only worker picks up the first job and blocks on the gate.
    let first = dispatcher
        .submit("VehicleStatus", BTreeMap::new(), None)
        .await
        .unwrap();
    wait_for_status(&store, first.id, ReportStatus::InProgress).await;

    // The second fills the single queue slot.
    dispatcher
        .submit("VehicleStatus", BTreeMap::new(), None)
        .await
        .unwrap();

    let err = dispatcher
        .submit("VehicleStatus", BTreeMap::new(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::QueueFull));
    assert_eq!(dispatcher.list().await.unwrap().len(), 2);

    fleet.gate.add_permits(2);
    dispatcher.shutdown().await;

    let statuses: Vec<ReportStatus> = dispatcher
        .list()
        .await
        .unwrap()
        .iter()
        .map(Report::status)
        .collect();
    assert_eq!(statuses, vec![ReportStatus::Completed, ReportStatus::Completed]);
}

#[tokio::test]
async fn recovery_requeues_pending_and_fails_interrupted() {
    let store = Arc::new(MemoryStore::new());
    let new_report = |report_type| NewReport {
        report_type,
        parameters: BTreeMap::new(),
        created_by: None,
        created_at: jiff::Timestamp::now(),
    };
    let pending = store.insert_report(new_report(ReportType::VehicleStatus)).await.unwrap();
    let interrupted = store.insert_report(new_report(ReportType::FinesSummary)).await.unwrap();
    store
        .transition_report(interrupted.id, 0, ReportState::InProgress)
        .await
        .unwrap();

    let dispatcher = ReportDispatcher::start(store.clone(), store.clone(), config(1, 8));
    let recovery = dispatcher.recover().await.unwrap();
    assert_eq!(recovery.requeued, 1);
    assert_eq!(recovery.failed, 1);

    let done = wait_for_terminal(&dispatcher, pending.id).await;
    assert_eq!(done.status(), ReportStatus::Completed);

    let failed = dispatcher.get(interrupted.id).await.unwrap();
    assert_eq!(failed.status(), ReportStatus::Failed);
    assert_eq!(failed.error(), Some(INTERRUPTED_MESSAGE));
}

#[tokio::test]
async fn submit_after_shutdown_is_refused() {
    let store = Arc::new(MemoryStore::new());
    let dispatcher = ReportDispatcher::start(store.clone(), store.clone(), config(1, 2));
    dispatcher.shutdown().await;

    let err = dispatcher
        .submit("VehicleStatus", BTreeMap::new(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::ShutDown));
}

/// Report store whose writes into a chosen state fail with a transient S3
/// error a fixed number of times before going through.
struct FlakyReports {
    inner: MemoryStore,
    target: ReportStatus,
    failures_left: AtomicUsize,
}

impl FlakyReports {
    fn new(target: ReportStatus, failures: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            target,
            failures_left: AtomicUsize::new(failures),
        }
    }
}

impl ReportStore for FlakyReports {
    fn insert_report(&self, new: NewReport) -> BoxFuture<'_, Result<Report, StorageError>> {
        self.inner.insert_report(new)
    }

    fn get_report(&self, id: u64) -> BoxFuture<'_, Result<Report, StorageError>> {
        self.inner.get_report(id)
    }

    fn list_reports(&self) -> BoxFuture<'_, Result<Vec<Report>, StorageError>> {
        self.inner.list_reports()
    }

    fn transition_report(
        &self,
        id: u64,
        expected_version: u64,
        next: ReportState,
    ) -> BoxFuture<'_, Result<Report, StorageError>> {
        if next.status() == self.target {
            let failed = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failed {
                return Box::pin(async { Err(StorageError::PutObject("SlowDown".to_string())) });
            }
        }
        self.inner.transition_report(id, expected_version, next)
    }
}

#[tokio::test]
async fn transient_write_error_is_retried() {
    let reports = Arc::new(FlakyReports::new(ReportStatus::Completed, 1));
    let fleet = Arc::new(MemoryStore::new());
    let dispatcher = ReportDispatcher::start(reports.clone(), fleet, config(1, 4));

    let report = dispatcher
        .submit("VehicleStatus", BTreeMap::new(), None)
        .await
        .unwrap();

    let done = wait_for_terminal(&dispatcher, report.id).await;
    assert_eq!(done.status(), ReportStatus::Completed);
    assert_eq!(done.version, 2);

    dispatcher.shutdown().await;
}

#[tokio::test]
async fn persistent_write_error_fails_the_report() {
    let reports = Arc::new(FlakyReports::new(ReportStatus::Completed, usize::MAX));
    let fleet = Arc::new(MemoryStore::new());
    let dispatcher = ReportDispatcher::start(reports.clone(), fleet, config(1, 4));

    let report = dispatcher
        .submit("VehicleStatus", BTreeMap::new(), None)
        .await
        .unwrap();

    let done = wait_for_terminal(&dispatcher, report.id).await;
    assert_eq!(done.status(), ReportStatus::Failed);
    assert_eq!(done.error(), Some("S3 PutObject error: SlowDown"));
    assert!(done.data().is_none());

    dispatcher.shutdown().await;
}

#[tokio::test]
async fn report_that_cannot_start_is_failed() {
    let reports = Arc::new(FlakyReports::new(ReportStatus::InProgress, usize::MAX));
    let fleet = Arc::new(MemoryStore::new());
    let dispatcher = ReportDispatcher::start(reports.clone(), fleet, config(1, 4));

    let report = dispatcher
        .submit("FinesSummary", BTreeMap::new(), None)
        .await
        .unwrap();

    let done = wait_for_terminal(&dispatcher, report.id).await;
    assert_eq!(done.status(), ReportStatus::Failed);
    assert_eq!(done.version, 1);
    assert_eq!(done.error(), Some("S3 PutObject error: SlowDown"));

    dispatcher.shutdown().await;
}
