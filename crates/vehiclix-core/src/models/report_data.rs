use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::claim::{Claim, ClaimStatus};
use super::fine::{Fine, FineStatus};
use super::report::ReportType;
use super::vehicle::{Vehicle, VehicleStatus};

/// Aggregation result of a completed report, keyed by report type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type")]
#[ts(export)]
pub enum ReportData {
    VehicleStatus(VehicleStatusReport),
    ClaimsSummary(ClaimsReport),
    FinesSummary(FinesReport),
}

impl ReportData {
    pub fn report_type(&self) -> ReportType {
        match self {
            Self::VehicleStatus(_) => ReportType::VehicleStatus,
            Self::ClaimsSummary(_) => ReportType::ClaimsSummary,
            Self::FinesSummary(_) => ReportType::FinesSummary,
        }
    }

    pub fn total_count(&self) -> u64 {
        match self {
            Self::VehicleStatus(r) => r.total_count,
            Self::ClaimsSummary(r) => r.total_count,
            Self::FinesSummary(r) => r.total_count,
        }
    }

    /// Filter parameters that could not be parsed and were not applied.
    pub fn warnings(&self) -> &[String] {
        match self {
            Self::VehicleStatus(r) => &r.warnings,
            Self::ClaimsSummary(r) => &r.warnings,
            Self::FinesSummary(r) => &r.warnings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VehicleStatusReport {
    pub total_count: u64,
    pub by_status: Vec<VehicleStatusCount>,
    pub vehicles: Vec<Vehicle>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VehicleStatusCount {
    pub status: VehicleStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClaimsReport {
    pub total_count: u64,
    pub total_amount: f64,
    pub by_status: Vec<ClaimStatusTotal>,
    pub claims: Vec<Claim>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClaimStatusTotal {
    pub status: ClaimStatus,
    pub count: u64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FinesReport {
    pub total_count: u64,
    pub total_amount: f64,
    pub by_status: Vec<FineStatusTotal>,
    pub fines: Vec<Fine>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FineStatusTotal {
    pub status: FineStatus,
    pub count: u64,
    pub amount: f64,
}
