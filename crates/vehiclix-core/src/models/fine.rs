use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{NamedEnum, positive_amount, require};
use crate::error::CoreError;

/// A traffic fine issued against a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Fine {
    pub id: u64,
    pub fine_id: String,
    pub vehicle_id: u64,
    pub date: jiff::civil::Date,
    pub description: String,
    pub amount: f64,
    pub status: FineStatus,
    pub created_at: jiff::Timestamp,
    pub updated_at: Option<jiff::Timestamp>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum FineStatus {
    Pending,
    Paid,
    Disputed,
    Cancelled,
}

impl NamedEnum for FineStatus {
    const ALL: &'static [Self] = &[Self::Pending, Self::Paid, Self::Disputed, Self::Cancelled];

    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Disputed => "Disputed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for FineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FineDraft {
    #[serde(default)]
    pub id: Option<u64>,
    pub fine_id: String,
    pub vehicle_id: u64,
    pub date: jiff::civil::Date,
    pub description: String,
    pub amount: f64,
    pub status: FineStatus,
}

impl FineDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        require("fineId", &self.fine_id)?;
        require("description", &self.description)?;
        positive_amount("amount", self.amount)?;
        Ok(())
    }

    pub fn into_fine(self, id: u64, now: jiff::Timestamp, by: Option<String>) -> Fine {
        Fine {
            id,
            fine_id: self.fine_id,
            vehicle_id: self.vehicle_id,
            date: self.date,
            description: self.description,
            amount: self.amount,
            status: self.status,
            created_at: now,
            updated_at: None,
            created_by: by,
            updated_by: None,
        }
    }
}

impl Fine {
    pub fn apply_draft(&mut self, draft: FineDraft, now: jiff::Timestamp, by: Option<String>) {
        self.fine_id = draft.fine_id;
        self.vehicle_id = draft.vehicle_id;
        self.date = draft.date;
        self.description = draft.description;
        self.amount = draft.amount;
        self.status = draft.status;
        self.updated_at = Some(now);
        self.updated_by = by;
    }
}
