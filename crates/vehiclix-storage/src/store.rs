use std::future::Future;
use std::pin::Pin;

use vehiclix_core::models::claim::{Claim, ClaimDraft};
use vehiclix_core::models::fine::{Fine, FineDraft};
use vehiclix_core::models::report::{NewReport, Report, ReportState};
use vehiclix_core::models::vehicle::{Vehicle, VehicleDraft};

use crate::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persisted report requests and their outcomes.
pub trait ReportStore: Send + Sync {
    /// Persist a new `Pending` report, assigning its id.
    fn insert_report(&self, new: NewReport) -> BoxFuture<'_, Result<Report, StorageError>>;

    fn get_report(&self, id: u64) -> BoxFuture<'_, Result<Report, StorageError>>;

    /// All reports, newest first.
    fn list_reports(&self) -> BoxFuture<'_, Result<Vec<Report>, StorageError>>;

    /// Move a report to `next` if it is still at `expected_version`.
    ///
    /// Fails with `VersionConflict` when another writer got there first and
    /// with `Core(IllegalTransition)` when `next` is not a forward step.
    fn transition_report(
        &self,
        id: u64,
        expected_version: u64,
        next: ReportState,
    ) -> BoxFuture<'_, Result<Report, StorageError>>;
}

/// Vehicles, claims and fines. The report aggregator reads these; the fleet
/// resource handlers write them.
pub trait FleetStore: Send + Sync {
    fn list_vehicles(&self) -> BoxFuture<'_, Result<Vec<Vehicle>, StorageError>>;
    fn get_vehicle(&self, id: u64) -> BoxFuture<'_, Result<Vehicle, StorageError>>;
    fn insert_vehicle(
        &self,
        draft: VehicleDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Vehicle, StorageError>>;
    fn update_vehicle(
        &self,
        id: u64,
        draft: VehicleDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Vehicle, StorageError>>;
    fn delete_vehicle(&self, id: u64) -> BoxFuture<'_, Result<(), StorageError>>;

    fn list_claims(&self) -> BoxFuture<'_, Result<Vec<Claim>, StorageError>>;
    fn get_claim(&self, id: u64) -> BoxFuture<'_, Result<Claim, StorageError>>;
    fn insert_claim(
        &self,
        draft: ClaimDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Claim, StorageError>>;
    fn update_claim(
        &self,
        id: u64,
        draft: ClaimDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Claim, StorageError>>;
    fn delete_claim(&self, id: u64) -> BoxFuture<'_, Result<(), StorageError>>;

    fn list_fines(&self) -> BoxFuture<'_, Result<Vec<Fine>, StorageError>>;
    fn get_fine(&self, id: u64) -> BoxFuture<'_, Result<Fine, StorageError>>;
    fn insert_fine(
        &self,
        draft: FineDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Fine, StorageError>>;
    fn update_fine(
        &self,
        id: u64,
        draft: FineDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Fine, StorageError>>;
    fn delete_fine(&self, id: u64) -> BoxFuture<'_, Result<(), StorageError>>;
}

/// Newest first; ties broken by id so the order is stable.
pub fn sort_newest_first(reports: &mut [Report]) {
    reports.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Shared check for both store implementations: version first, then the
/// state machine.
pub(crate) fn apply_transition(
    report: &mut Report,
    key: String,
    expected_version: u64,
    next: ReportState,
) -> Result<(), StorageError> {
    if report.version != expected_version {
        return Err(StorageError::VersionConflict {
            key,
            expected: expected_version,
            actual: report.version,
        });
    }
    report.advance(next)?;
    Ok(())
}
