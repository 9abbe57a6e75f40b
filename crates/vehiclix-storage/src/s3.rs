use aws_sdk_s3::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use vehiclix_core::keys;
use vehiclix_core::models::claim::{Claim, ClaimDraft};
use vehiclix_core::models::fine::{Fine, FineDraft};
use vehiclix_core::models::report::{NewReport, Report, ReportState};
use vehiclix_core::models::vehicle::{Vehicle, VehicleDraft};

use crate::error::StorageError;
use crate::objects::{self, WriteCondition};
use crate::state::{self, Versioned};
use crate::store::{BoxFuture, FleetStore, ReportStore, apply_transition, sort_newest_first};

const SEQUENCE_ATTEMPTS: u32 = 8;

/// One JSON object per record; every overwrite is guarded by the ETag that
/// was read, so concurrent writers cannot silently clobber each other.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Sequence {
    last: u64,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Allocate the next id for a collection via a compare-and-swap on its
    /// sequence object.
    async fn next_id(&self, prefix: &str) -> Result<u64, StorageError> {
        let key = keys::sequence(prefix);

        for attempt in 1..=SEQUENCE_ATTEMPTS {
            let claimed = match state::load_record::<Sequence>(&self.client, &self.bucket, &key).await {
                Ok(current) => {
                    let next = Sequence {
                        last: current.value.last + 1,
                    };
                    let condition = WriteCondition::Matches(&current.etag);
                    state::save_record(&self.client, &self.bucket, &key, &next, condition)
                        .await
                        .map(|_| next.last)
                }
                Err(StorageError::NotFound { .. }) => {
                    let first = Sequence { last: 1 };
                    state::save_record(&self.client, &self.bucket, &key, &first, WriteCondition::Absent)
                        .await
                        .map(|_| first.last)
                }
                Err(e) => return Err(e),
            };

            match claimed {
                Ok(id) => return Ok(id),
                Err(e) if e.is_conflict() => {
                    tracing::debug!(key = %key, attempt, "id sequence contended, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(StorageError::SequenceContended { key })
    }

    async fn get<T: DeserializeOwned>(&self, key: String) -> Result<T, StorageError> {
        Ok(state::load_record(&self.client, &self.bucket, &key).await?.value)
    }

    async fn load_all<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>, StorageError> {
        let keys = objects::list_keys(&self.client, &self.bucket, prefix).await?;
        let mut values = Vec::with_capacity(keys.len());
        for key in &keys {
            values.push(state::load_record(&self.client, &self.bucket, key).await?.value);
        }
        Ok(values)
    }

    async fn insert<T: Serialize>(
        &self,
        prefix: &str,
        key_for: fn(u64) -> String,
        build: impl FnOnce(u64) -> T,
    ) -> Result<T, StorageError> {
        let id = self.next_id(prefix).await?;
        let value = build(id);
        state::save_record(&self.client, &self.bucket, &key_for(id), &value, WriteCondition::Absent)
            .await?;
        Ok(value)
    }

    /// Read-modify-write under the ETag that was read.
    async fn replace<T, F>(&self, key: String, mutate: F) -> Result<T, StorageError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T) -> Result<(), StorageError>,
    {
        let Versioned { mut value, etag } =
            state::load_record::<T>(&self.client, &self.bucket, &key).await?;
        mutate(&mut value)?;
        state::save_record(&self.client, &self.bucket, &key, &value, WriteCondition::Matches(&etag))
            .await?;
        Ok(value)
    }

    async fn remove(&self, key: String) -> Result<(), StorageError> {
        // S3 deletes succeed for absent keys; check first so unknown ids surface as NotFound.
        if !objects::object_exists(&self.client, &self.bucket, &key).await? {
            return Err(StorageError::NotFound { key });
        }
        objects::delete_object(&self.client, &self.bucket, &key).await
    }
}

impl ReportStore for S3Store {
    fn insert_report(&self, new: NewReport) -> BoxFuture<'_, Result<Report, StorageError>> {
        Box::pin(async move {
            let report = self
                .insert(keys::REPORTS_PREFIX, keys::report, |id| new.into_report(id))
                .await?;
            tracing::debug!(id = report.id, bucket = %self.bucket, "report persisted");
            Ok(report)
        })
    }

    fn get_report(&self, id: u64) -> BoxFuture<'_, Result<Report, StorageError>> {
        Box::pin(self.get::<Report>(keys::report(id)))
    }

    fn list_reports(&self) -> BoxFuture<'_, Result<Vec<Report>, StorageError>> {
        Box::pin(async move {
            let mut reports: Vec<Report> = self.load_all(keys::REPORTS_PREFIX).await?;
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
        let key = keys::report(id);
        Box::pin(self.replace(key.clone(), move |report: &mut Report| {
            apply_transition(report, key, expected_version, next)
        }))
    }
}

impl FleetStore for S3Store {
    fn list_vehicles(&self) -> BoxFuture<'_, Result<Vec<Vehicle>, StorageError>> {
        Box::pin(self.load_all::<Vehicle>(keys::VEHICLES_PREFIX))
    }

    fn get_vehicle(&self, id: u64) -> BoxFuture<'_, Result<Vehicle, StorageError>> {
        Box::pin(self.get::<Vehicle>(keys::vehicle(id)))
    }

    fn insert_vehicle(
        &self,
        draft: VehicleDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Vehicle, StorageError>> {
        let now = jiff::Timestamp::now();
        Box::pin(self.insert(keys::VEHICLES_PREFIX, keys::vehicle, move |id| {
            draft.into_vehicle(id, now, by)
        }))
    }

    fn update_vehicle(
        &self,
        id: u64,
        draft: VehicleDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Vehicle, StorageError>> {
        let now = jiff::Timestamp::now();
        Box::pin(self.replace(keys::vehicle(id), move |vehicle: &mut Vehicle| {
            vehicle.apply_draft(draft, now, by);
            Ok(())
        }))
    }

    /// Claims and fines go with their vehicle. The vehicle object is removed
    /// last so an interrupted delete can be retried.
    fn delete_vehicle(&self, id: u64) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let key = keys::vehicle(id);
            if !objects::object_exists(&self.client, &self.bucket, &key).await? {
                return Err(StorageError::NotFound { key });
            }

            let claims: Vec<Claim> = self.load_all(keys::CLAIMS_PREFIX).await?;
            let claim_keys: Vec<String> = claims
                .iter()
                .filter(|c| c.vehicle_id == id)
                .map(|c| keys::claim(c.id))
                .collect();
            let fines: Vec<Fine> = self.load_all(keys::FINES_PREFIX).await?;
            let fine_keys: Vec<String> = fines
                .iter()
                .filter(|f| f.vehicle_id == id)
                .map(|f| keys::fine(f.id))
                .collect();

            for dependent in claim_keys.iter().chain(&fine_keys) {
                objects::delete_object(&self.client, &self.bucket, dependent).await?;
            }
            objects::delete_object(&self.client, &self.bucket, &key).await?;

            tracing::debug!(
                id,
                claims = claim_keys.len(),
                fines = fine_keys.len(),
                "vehicle removed with its claims and fines"
            );
            Ok(())
        })
    }

    fn list_claims(&self) -> BoxFuture<'_, Result<Vec<Claim>, StorageError>> {
        Box::pin(self.load_all::<Claim>(keys::CLAIMS_PREFIX))
    }

    fn get_claim(&self, id: u64) -> BoxFuture<'_, Result<Claim, StorageError>> {
        Box::pin(self.get::<Claim>(keys::claim(id)))
    }

    fn insert_claim(
        &self,
        draft: ClaimDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Claim, StorageError>> {
        let now = jiff::Timestamp::now();
        Box::pin(self.insert(keys::CLAIMS_PREFIX, keys::claim, move |id| {
            draft.into_claim(id, now, by)
        }))
    }

    fn update_claim(
        &self,
        id: u64,
        draft: ClaimDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Claim, StorageError>> {
        let now = jiff::Timestamp::now();
        Box::pin(self.replace(keys::claim(id), move |claim: &mut Claim| {
            claim.apply_draft(draft, now, by);
            Ok(())
        }))
    }

    fn delete_claim(&self, id: u64) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(self.remove(keys::claim(id)))
    }

    fn list_fines(&self) -> BoxFuture<'_, Result<Vec<Fine>, StorageError>> {
        Box::pin(self.load_all::<Fine>(keys::FINES_PREFIX))
    }

    fn get_fine(&self, id: u64) -> BoxFuture<'_, Result<Fine, StorageError>> {
        Box::pin(self.get::<Fine>(keys::fine(id)))
    }

    fn insert_fine(
        &self,
        draft: FineDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Fine, StorageError>> {
        let now = jiff::Timestamp::now();
        Box::pin(self.insert(keys::FINES_PREFIX, keys::fine, move |id| {
            draft.into_fine(id, now, by)
        }))
    }

    fn update_fine(
        &self,
        id: u64,
        draft: FineDraft,
        by: Option<String>,
    ) -> BoxFuture<'_, Result<Fine, StorageError>> {
        let now = jiff::Timestamp::now();
        Box::pin(self.replace(keys::fine(id), move |fine: &mut Fine| {
            fine.apply_draft(draft, now, by);
            Ok(())
        }))
    }

    fn delete_fine(&self, id: u64) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(self.remove(keys::fine(id)))
    }
}
