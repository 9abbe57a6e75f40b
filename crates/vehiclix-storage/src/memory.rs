use std::collections::BTreeMap;

use tokio::sync::RwLock;

use vehiclix_core::keys;
use vehiclix_core::models::claim::{Claim, ClaimDraft};
use vehiclix_core::models::fine::{Fine, FineDraft};
use vehiclix_core::models::report::{NewReport, Report, ReportState};
use vehiclix_core::models::vehicle::{Vehicle, VehicleDraft};

use crate::error::StorageError;
use crate::store::{BoxFuture, FleetStore, ReportStore, apply_transition, sort_newest_first};

/// In-process store. Used for local runs without a bucket and in tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    reports: Table<Report>,
    vehicles: Table<Vehicle>,
    claims: Table<Claim>,
    fines: Table<Fine>,
}

struct Table<T> {
    rows: BTreeMap<u64, T>,
    last_id: u64,
    key: fn(u64) -> String,
}

impl<T> Table<T> {
    fn new(key: fn(u64) -> String) -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
            key,
        }
    }

    fn not_found(&self, id: u64) -> StorageError {
        StorageError::NotFound {
            key: (self.key)(id),
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(u64) -> T) -> T {
        self.last_id += 1;
        let row = build(self.last_id);
        self.rows.insert(self.last_id, row.clone());
        row
    }

    fn get(&self, id: u64) -> Result<T, StorageError> {
        self.rows.get(&id).cloned().ok_or_else(|| self.not_found(id))
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut T, StorageError> {
        let err = self.not_found(id);
        self.rows.get_mut(&id).ok_or(err)
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    fn remove(&mut self, id: u64) -> Result<(), StorageError> {
        self.rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| self.not_found(id))
    }
}

impl Default for Table<Report> {
    fn default() -> Self {
        Self::new(keys::report)
    }
}

impl Default for Table<Vehicle> {
    fn default() -> Self {
        Self::new(keys::vehicle)
    }
}

impl Default for Table<Claim> {
    fn default() -> Self {
        Self::new(keys::claim)
    }
}

impl Default for Table<Fine> {
    fn default() -> Self {
        Self::new(keys::fine)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportStore for MemoryStore {
    fn insert_report(&self, new: NewReport) -> BoxFuture<'_, Result<Report, StorageError>> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            Ok(tables.reports.insert_with(|id| new.into_report(id)))
        })
    }

    fn get_report(&self, id: u64) -> BoxFuture<'_, Result<Report, StorageError>> {
        Box::pin(async move { self.tables.read().await.reports.get(id) })
    }

    fn list_reports(&self) -> BoxFuture<'_, Result<Vec<Report>, StorageError>> {
        Box::pin(async move {
            let mut reports = self.tables.read().await.reports.all();
            sort_newest_first(&mut reports);
            Ok(reports)
        })
    }

    fn transition_report(
        &self,
        id: u64,
        expected_version: u64,
        next: ReportState,
    ) -> BoxFuture<'_, Result<Report, StorageError>> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            let row = tables.reports.get_mut(id)?;
            // Work on a copy so a rejected transition leaves the row untouched.
            let mut report = row.clone();
            apply_transition(&mut report, keys::report(id), expected_version, next)?;
            *row = report.clone();
            Ok(report)
        })
    }
}

impl FleetStore for MemoryStore {
    fn list_vehicles(&self) -> BoxFuture<'_, Result<Vec<Vehicle>, StorageError>> {
        Box::pin(async move { Ok(self.tables.read().await.vehicles.all()) })
    }

    fn get_vehicle(&self, id: u64) -> BoxFuture<'_, Result<Vehicle, StorageError>> {
        Box::pin(async move { self.tables.read().await.vehicles.get(id) })
    }

    fn insert_vehicle(
        &self,
        draft: VehicleDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Vehicle, StorageError>> {
        Box::pin(async move {
            let now = jiff::Timestamp::now();
            let mut tables = self.tables.write().await;
            Ok(tables
                .vehicles
                .insert_with(|id| draft.into_vehicle(id, now, by)))
        })
    }

    fn update_vehicle(
        &self,
        id: u64,
        draft: VehicleDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Vehicle, StorageError>> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            let vehicle = tables.vehicles.get_mut(id)?;
            vehicle.apply_draft(draft, jiff::Timestamp::now(), by);
            Ok(vehicle.clone())
        })
    }

    fn delete_vehicle(&self, id: u64) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            tables.vehicles.remove(id)?;
            tables.claims.rows.retain(|_, claim| claim.vehicle_id != id);
            tables.fines.rows.retain(|_, fine| fine.vehicle_id != id);
            Ok(())
        })
    }

    fn list_claims(&self) -> BoxFuture<'_, Result<Vec<Claim>, StorageError>> {
        Box::pin(async move { Ok(self.tables.read().await.claims.all()) })
    }

    fn get_claim(&self, id: u64) -> BoxFuture<'_, Result<Claim, StorageError>> {
        Box::pin(async move { self.tables.read().await.claims.get(id) })
    }

    fn insert_claim(
        &self,
        draft: ClaimDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Claim, StorageError>> {
        Box::pin(async move {
            let now = jiff::Timestamp::now();
            let mut tables = self.tables.write().await;
            Ok(tables.claims.insert_with(|id| draft.into_claim(id, now, by)))
        })
    }

    fn update_claim(
        &self,
        id: u64,
        draft: ClaimDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Claim, StorageError>> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            let claim = tables.claims.get_mut(id)?;
            claim.apply_draft(draft, jiff::Timestamp::now(), by);
            Ok(claim.clone())
        })
    }

    fn delete_claim(&self, id: u64) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move { self.tables.write().await.claims.remove(id) })
    }

    fn list_fines(&self) -> BoxFuture<'_, Result<Vec<Fine>, StorageError>> {
        Box::pin(async move { Ok(self.tables.read().await.fines.all()) })
    }

    fn get_fine(&self, id: u64) -> BoxFuture<'_, Result<Fine, StorageError>> {
        Box::pin(async move { self.tables.read().await.fines.get(id) })
    }

    fn insert_fine(
        &self,
        draft: FineDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Fine, StorageError>> {
        Box::pin(async move {
            let now = jiff::Timestamp::now();
            let mut tables = self.tables.write().await;
            Ok(tables.fines.insert_with(|id| draft.into_fine(id, now, by)))
        })
    }

    fn update_fine(
        &self,
        id: u64,
        draft: FineDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Fine, StorageError>> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            let fine = tables.fines.get_mut(id)?;
            fine.apply_draft(draft, jiff::Timestamp::now(), by);
            Ok(fine.clone())
        })
    }

    fn delete_fine(&self, id: u64) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move { self.tables.write().await.fines.remove(id) })
    }
}
