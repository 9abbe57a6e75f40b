use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::NamedEnum;
use super::report_data::ReportData;
use crate::error::CoreError;

/// A request for an aggregated summary, plus its computed result or failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Report {
    pub id: u64,
    pub report_id: Uuid,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub parameters: BTreeMap<String, String>,
    pub state: ReportState,
    pub created_at: jiff::Timestamp,
    pub created_by: Option<String>,
    /// Bumped on every persisted mutation; updates must name the version they read.
    pub version: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ReportType {
    VehicleStatus,
    ClaimsSummary,
    FinesSummary,
}

impl NamedEnum for ReportType {
    const ALL: &'static [Self] = &[Self::VehicleStatus, Self::ClaimsSummary, Self::FinesSummary];

    fn as_str(self) -> &'static str {
        match self {
            Self::VehicleStatus => "VehicleStatus",
            Self::ClaimsSummary => "ClaimsSummary",
            Self::FinesSummary => "FinesSummary",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| CoreError::InvalidReportType(s.to_string()))
    }
}

/// Lifecycle state of a report. Result data and failure message live on
/// the variants, so neither can exist outside its status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "status")]
#[ts(export)]
pub enum ReportState {
    Pending,
    InProgress,
    Completed {
        data: ReportData,
        #[serde(rename = "completedAt")]
        completed_at: jiff::Timestamp,
    },
    Failed {
        error: String,
        #[serde(rename = "completedAt")]
        completed_at: jiff::Timestamp,
    },
}

/// Status discriminant of [`ReportState`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ReportStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "Pending",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        };
        f.write_str(name)
    }
}

impl ReportState {
    pub fn status(&self) -> ReportStatus {
        match self {
            Self::Pending => ReportStatus::Pending,
            Self::InProgress => ReportStatus::InProgress,
            Self::Completed { .. } => ReportStatus::Completed,
            Self::Failed { .. } => ReportStatus::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }

    /// Forward-only: Pending → InProgress → {Completed | Failed}.
    /// Pending may also fail directly (job never started).
    pub fn can_advance_to(&self, next: &ReportState) -> bool {
        matches!(
            (self.status(), next.status()),
            (ReportStatus::Pending, ReportStatus::InProgress)
                | (ReportStatus::Pending, ReportStatus::Failed)
                | (ReportStatus::InProgress, ReportStatus::Completed)
                | (ReportStatus::InProgress, ReportStatus::Failed)
        )
    }
}

/// Everything needed to persist a new report; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub report_type: ReportType,
    pub parameters: BTreeMap<String, String>,
    pub created_by: Option<String>,
    pub created_at: jiff::Timestamp,
}

impl NewReport {
    pub fn into_report(self, id: u64) -> Report {
        Report {
            id,
            report_id: Uuid::new_v4(),
            report_type: self.report_type,
            parameters: self.parameters,
            state: ReportState::Pending,
            created_at: self.created_at,
            created_by: self.created_by,
            version: 0,
        }
    }
}

impl Report {
    pub fn status(&self) -> ReportStatus {
        self.state.status()
    }

    pub fn data(&self) -> Option<&ReportData> {
        match &self.state {
            ReportState::Completed { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ReportState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn completed_at(&self) -> Option<jiff::Timestamp> {
        match &self.state {
            ReportState::Completed { completed_at, .. }
            | ReportState::Failed { completed_at, .. } => Some(*completed_at),
            _ => None,
        }
    }

    /// Move to `next`, bumping the version. Illegal transitions leave the
    /// report untouched.
    pub fn advance(&mut self, next: ReportState) -> Result<(), CoreError> {
        if !self.state.can_advance_to(&next) {
            return Err(CoreError::IllegalTransition {
                from: self.status(),
                to: next.status(),
            });
        }
        self.state = next;
        self.version += 1;
        Ok(())
    }
}
