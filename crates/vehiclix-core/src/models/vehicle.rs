use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{NamedEnum, max_len, require};
use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Vehicle {
    pub id: u64,
    pub vin: String,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub status: VehicleStatus,
    pub created_at: jiff::Timestamp,
    pub updated_at: Option<jiff::Timestamp>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum VehicleStatus {
    Active,
    Inactive,
    UnderMaintenance,
    Deleted,
}

impl NamedEnum for VehicleStatus {
    const ALL: &'static [Self] = &[
        Self::Active,
        Self::Inactive,
        Self::UnderMaintenance,
        Self::Deleted,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::UnderMaintenance => "UnderMaintenance",
            Self::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for creating or replacing a vehicle.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VehicleDraft {
    /// Only checked on update, where it must match the path id.
    #[serde(default)]
    pub id: Option<u64>,
    pub vin: String,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub status: VehicleStatus,
}

impl VehicleDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        require("vin", &self.vin)?;
        max_len("vin", &self.vin, 17)?;
        require("licensePlate", &self.license_plate)?;
        max_len("licensePlate", &self.license_plate, 20)?;
        require("brand", &self.brand)?;
        max_len("brand", &self.brand, 50)?;
        require("model", &self.model)?;
        max_len("model", &self.model, 50)?;
        Ok(())
    }

    pub fn into_vehicle(self, id: u64, now: jiff::Timestamp, by: Option<String>) -> Vehicle {
        Vehicle {
            id,
            vin: self.vin,
            license_plate: self.license_plate,
            brand: self.brand,
            model: self.model,
            year: self.year,
            status: self.status,
            created_at: now,
            updated_at: None,
            created_by: by,
            updated_by: None,
        }
    }
}

impl Vehicle {
    /// Overwrite the editable fields, keeping identity and creation audit.
    pub fn apply_draft(&mut self, draft: VehicleDraft, now: jiff::Timestamp, by: Option<String>) {
        self.vin = draft.vin;
        self.license_plate = draft.license_plate;
        self.brand = draft.brand;
        self.model = draft.model;
        self.year = draft.year;
        self.status = draft.status;
        self.updated_at = Some(now);
        self.updated_by = by;
    }
}
