use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{NamedEnum, positive_amount, require};
use crate::error::CoreError;

/// An insurance claim filed against a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Claim {
    pub id: u64,
    pub claim_id: String,
    pub vehicle_id: u64,
    pub date: jiff::civil::Date,
    pub description: String,
    pub amount: f64,
    pub photos: Vec<String>,
    pub status: ClaimStatus,
    pub created_at: jiff::Timestamp,
    pub updated_at: Option<jiff::Timestamp>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
    InProgress,
    Completed,
}

impl NamedEnum for ClaimStatus {
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::InProgress,
        Self::Completed,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClaimDraft {
    #[serde(default)]
    pub id: Option<u64>,
    pub claim_id: String,
    pub vehicle_id: u64,
    pub date: jiff::civil::Date,
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub photos: Vec<String>,
    pub status: ClaimStatus,
}

impl ClaimDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        require("claimId", &self.claim_id)?;
        require("description", &self.description)?;
        positive_amount("amount", self.amount)?;
        Ok(())
    }

    pub fn into_claim(self, id: u64, now: jiff::Timestamp, by: Option<String>) -> Claim {
        Claim {
            id,
            claim_id: self.claim_id,
            vehicle_id: self.vehicle_id,
            date: self.date,
            description: self.description,
            amount: self.amount,
            photos: self.photos,
            status: self.status,
            created_at: now,
            updated_at: None,
            created_by: by,
            updated_by: None,
        }
    }
}

impl Claim {
    pub fn apply_draft(&mut self, draft: ClaimDraft, now: jiff::Timestamp, by: Option<String>) {
        self.claim_id = draft.claim_id;
        self.vehicle_id = draft.vehicle_id;
        self.date = draft.date;
        self.description = draft.description;
        self.amount = draft.amount;
        self.photos = draft.photos;
        self.status = draft.status;
        self.updated_at = Some(now);
        self.updated_by = by;
    }
}
