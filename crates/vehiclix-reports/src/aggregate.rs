use std::collections::BTreeMap;

use jiff::civil::Date;
use jiff::tz::TimeZone;

use vehiclix_core::models::NamedEnum;
use vehiclix_core::models::claim::{Claim, ClaimStatus};
use vehiclix_core::models::fine::{Fine, FineStatus};
use vehiclix_core::models::report::ReportType;
use vehiclix_core::models::report_data::{
    ClaimStatusTotal, ClaimsReport, FineStatusTotal, FinesReport, ReportData, VehicleStatusCount,
    VehicleStatusReport,
};
use vehiclix_core::models::vehicle::{Vehicle, VehicleStatus};
use vehiclix_storage::error::StorageError;
use vehiclix_storage::store::FleetStore;

pub const STATUS_PARAM: &str = "status";
pub const START_DATE_PARAM: &str = "startDate";
pub const END_DATE_PARAM: &str = "endDate";

/// Load the entities a report type needs and summarize them.
pub async fn aggregate(
    report_type: ReportType,
    params: &BTreeMap<String, String>,
    fleet: &dyn FleetStore,
) -> Result<ReportData, StorageError> {
    let data = match report_type {
        ReportType::VehicleStatus => {
            let vehicles = fleet.list_vehicles().await?;
            ReportData::VehicleStatus(vehicle_status(vehicles, params))
        }
        ReportType::ClaimsSummary => {
            let claims = fleet.list_claims().await?;
            ReportData::ClaimsSummary(claims_summary(claims, params))
        }
        ReportType::FinesSummary => {
            let fines = fleet.list_fines().await?;
            ReportData::FinesSummary(fines_summary(fines, params))
        }
    };
    Ok(data)
}

pub fn vehicle_status(vehicles: Vec<Vehicle>, params: &BTreeMap<String, String>) -> VehicleStatusReport {
    let mut warnings = Vec::new();
    let status = status_filter::<VehicleStatus>(params, &mut warnings);

    let vehicles: Vec<Vehicle> = vehicles
        .into_iter()
        .filter(|v| status.is_none_or(|s| v.status == s))
        .collect();

    let by_status = tally(&vehicles, |v| v.status, |_| 0.0)
        .into_iter()
        .map(|(status, count, _)| VehicleStatusCount { status, count })
        .collect();

    VehicleStatusReport {
        total_count: vehicles.len() as u64,
        by_status,
        vehicles,
        warnings,
    }
}

pub fn claims_summary(claims: Vec<Claim>, params: &BTreeMap<String, String>) -> ClaimsReport {
    let mut warnings = Vec::new();
    let range = DateRange::from_params(params, &mut warnings);

    let claims: Vec<Claim> = claims.into_iter().filter(|c| range.contains(c.date)).collect();

    let by_status = tally(&claims, |c| c.status, |c| c.amount)
        .into_iter()
        .map(|(status, count, amount): (ClaimStatus, _, _)| ClaimStatusTotal {
            status,
            count,
            amount,
        })
        .collect();

    ClaimsReport {
        total_count: claims.len() as u64,
        total_amount: claims.iter().map(|c| c.amount).sum(),
        by_status,
        claims,
        warnings,
    }
}

pub fn fines_summary(fines: Vec<Fine>, params: &BTreeMap<String, String>) -> FinesReport {
    let mut warnings = Vec::new();
    let range = DateRange::from_params(params, &mut warnings);

    let fines: Vec<Fine> = fines.into_iter().filter(|f| range.contains(f.date)).collect();

    let by_status = tally(&fines, |f| f.status, |f| f.amount)
        .into_iter()
        .map(|(status, count, amount): (FineStatus, _, _)| FineStatusTotal {
            status,
            count,
            amount,
        })
        .collect();

    FinesReport {
        total_count: fines.len() as u64,
        total_amount: fines.iter().map(|f| f.amount).sum(),
        by_status,
        fines,
        warnings,
    }
}

/// Inclusive on both ends; a missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<Date>,
    pub end: Option<Date>,
}

impl DateRange {
    fn from_params(params: &BTreeMap<String, String>, warnings: &mut Vec<String>) -> Self {
        Self {
            start: date_filter(params, START_DATE_PARAM, warnings),
            end: date_filter(params, END_DATE_PARAM, warnings),
        }
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, whose UTC date is used.
pub fn parse_date(value: &str) -> Option<Date> {
    let value = value.trim();
    if let Ok(date) = value.parse::<Date>() {
        return Some(date);
    }
    value
        .parse::<jiff::Timestamp>()
        .ok()
        .map(|ts| ts.to_zoned(TimeZone::UTC).date())
}

fn param<'a>(params: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn status_filter<S: NamedEnum>(params: &BTreeMap<String, String>, warnings: &mut Vec<String>) -> Option<S> {
    let raw = param(params, STATUS_PARAM)?;
    let parsed = S::from_name(raw);
    if parsed.is_none() {
        warnings.push(invalid(STATUS_PARAM, raw));
    }
    parsed
}

fn date_filter(params: &BTreeMap<String, String>, key: &str, warnings: &mut Vec<String>) -> Option<Date> {
    let raw = param(params, key)?;
    let parsed = parse_date(raw);
    if parsed.is_none() {
        warnings.push(invalid(key, raw));
    }
    parsed
}

fn invalid(key: &str, value: &str) -> String {
    format!("invalid {key} parameter: {value}")
}

/// Count and sum per status, in declaration order, skipping absent statuses.
fn tally<T, S: NamedEnum>(
    rows: &[T],
    status_of: impl Fn(&T) -> S,
    amount_of: impl Fn(&T) -> f64,
) -> Vec<(S, u64, f64)> {
    S::ALL
        .iter()
        .filter_map(|&status| {
            let (count, amount) = rows
                .iter()
                .filter(|row| status_of(row) == status)
                .fold((0u64, 0.0), |(count, amount), row| (count + 1, amount + amount_of(row)));
            (count > 0).then_some((status, count, amount))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_plain_dates_and_timestamps() {
        assert_eq!(parse_date("2024-02-29"), Some(jiff::civil::date(2024, 2, 29)));
        assert_eq!(
            parse_date("2024-03-01T23:30:00-02:00"),
            Some(jiff::civil::date(2024, 3, 2))
        );
        assert_eq!(parse_date("last tuesday"), None);
    }

    #[test]
    fn open_range_contains_everything() {
        assert!(DateRange::default().contains(jiff::civil::date(1999, 12, 31)));
    }
}
