use std::collections::BTreeMap;

use jiff::civil::date;

use vehiclix_core::models::claim::{Claim, ClaimStatus};
use vehiclix_core::models::fine::{Fine, FineStatus};
use vehiclix_core::models::vehicle::{Vehicle, VehicleStatus};
use vehiclix_reports::aggregate::{claims_summary, fines_summary, vehicle_status};

fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn vehicle(id: u64, status: VehicleStatus) -> Vehicle {
    Vehicle {
        id,
        vin: format!("1HGCM82633A00{id:04}"),
        license_plate: format!("ABC-{id}"),
        brand: "Toyota".to_string(),
        model: "Corolla".to_string(),
        year: 2020,
        status,
        created_at: jiff::Timestamp::now(),
        updated_at: None,
        created_by: None,
        updated_by: None,
    }
}

fn claim(id: u64, on: jiff::civil::Date, amount: f64, status: ClaimStatus) -> Claim {
    Claim {
        id,
        claim_id: format!("CLM-{id}"),
        vehicle_id: 1,
        date: on,
        description: "Collision".to_string(),
        amount,
        photos: vec![],
        status,
        created_at: jiff::Timestamp::now(),
        updated_at: None,
        created_by: None,
        updated_by: None,
    }
}

fn fine(id: u64, on: jiff::civil::Date, amount: f64, status: FineStatus) -> Fine {
    Fine {
        id,
        fine_id: format!("FN-{id}"),
        vehicle_id: 1,
        date: on,
        description: "Speeding".to_string(),
        amount,
        status,
        created_at: jiff::Timestamp::now(),
        updated_at: None,
        created_by: None,
        updated_by: None,
    }
}

#[test]
fn vehicle_status_with_no_vehicles_is_empty() {
    let report = vehicle_status(vec![], &BTreeMap::new());
    assert_eq!(report.total_count, 0);
    assert!(report.by_status.is_empty());
    assert!(report.vehicles.is_empty());
    assert!(report.warnings.is_empty());
}

#[test]
fn vehicle_status_groups_in_declaration_order() {
    let vehicles = vec![
        vehicle(1, VehicleStatus::UnderMaintenance),
        vehicle(2, VehicleStatus::Active),
        vehicle(3, VehicleStatus::UnderMaintenance),
    ];
    let report = vehicle_status(vehicles, &BTreeMap::new());

    assert_eq!(report.total_count, 3);
    let groups: Vec<(VehicleStatus, u64)> = report.by_status.iter().map(|g| (g.status, g.count)).collect();
    assert_eq!(
        groups,
        vec![(VehicleStatus::Active, 1), (VehicleStatus::UnderMaintenance, 2)]
    );
}

#[test]
fn vehicle_status_filter_is_case_insensitive() {
    let vehicles = vec![
        vehicle(1, VehicleStatus::Active),
        vehicle(2, VehicleStatus::Inactive),
    ];
    let report = vehicle_status(vehicles, &params(&[("status", "inactive")]));

    assert_eq!(report.total_count, 1);
    assert_eq!(report.vehicles[0].id, 2);
}

#[test]
fn unknown_status_is_ignored_with_warning() {
    let vehicles = vec![
        vehicle(1, VehicleStatus::Active),
        vehicle(2, VehicleStatus::Inactive),
    ];
    let report = vehicle_status(vehicles, &params(&[("status", "Scrapped")]));

    assert_eq!(report.total_count, 2);
    assert_eq!(report.warnings, vec!["invalid status parameter: Scrapped".to_string()]);
}

#[test]
fn claims_range_includes_both_boundaries() {
    let claims = vec![
        claim(1, date(2023, 12, 31), 100.0, ClaimStatus::Approved),
        claim(2, date(2024, 1, 1), 200.0, ClaimStatus::Approved),
        claim(3, date(2024, 6, 15), 50.0, ClaimStatus::Pending),
        claim(4, date(2024, 12, 31), 25.5, ClaimStatus::Approved),
        claim(5, date(2025, 1, 1), 400.0, ClaimStatus::Rejected),
    ];
    let report = claims_summary(
        claims,
        &params(&[("startDate", "2024-01-01"), ("endDate", "2024-12-31")]),
    );

    let ids: Vec<u64> = report.claims.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2, 3, 4]);
    assert_eq!(report.total_count, 3);
    assert_eq!(report.total_amount, 275.5);

    assert_eq!(report.by_status.len(), 2);
    assert_eq!(report.by_status[0].status, ClaimStatus::Pending);
    assert_eq!(report.by_status[0].count, 1);
    assert_eq!(report.by_status[1].status, ClaimStatus::Approved);
    assert_eq!(report.by_status[1].count, 2);
    assert_eq!(report.by_status[1].amount, 225.5);
}

#[test]
fn claims_range_accepts_timestamps() {
    let claims = vec![
        claim(1, date(2024, 3, 1), 10.0, ClaimStatus::Pending),
        claim(2, date(2024, 3, 2), 10.0, ClaimStatus::Pending),
    ];
    let report = claims_summary(claims, &params(&[("startDate", "2024-03-02T00:00:00Z")]));

    assert_eq!(report.total_count, 1);
    assert_eq!(report.claims[0].id, 2);
}

#[test]
fn unparseable_date_is_not_applied() {
    let claims = vec![
        claim(1, date(2020, 1, 1), 10.0, ClaimStatus::Pending),
        claim(2, date(2024, 1, 1), 10.0, ClaimStatus::Pending),
    ];
    let report = claims_summary(
        claims,
        &params(&[("startDate", "not-a-date"), ("endDate", "2022-01-01")]),
    );

    let ids: Vec<u64> = report.claims.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1]);
    assert_eq!(report.warnings, vec!["invalid startDate parameter: not-a-date".to_string()]);
}

#[test]
fn blank_parameters_are_treated_as_absent() {
    let fines = vec![fine(1, date(2024, 5, 5), 80.0, FineStatus::Paid)];
    let report = fines_summary(fines, &params(&[("startDate", "  "), ("endDate", "")]));

    assert_eq!(report.total_count, 1);
    assert!(report.warnings.is_empty());
}

#[test]
fn fines_summary_totals_per_status() {
    let fines = vec![
        fine(1, date(2024, 2, 1), 120.0, FineStatus::Paid),
        fine(2, date(2024, 2, 3), 60.0, FineStatus::Disputed),
        fine(3, date(2024, 2, 9), 30.0, FineStatus::Paid),
    ];
    let report = fines_summary(fines, &BTreeMap::new());

    assert_eq!(report.total_count, 3);
    assert_eq!(report.total_amount, 210.0);
    let groups: Vec<(FineStatus, u64, f64)> = report
        .by_status
        .iter()
        .map(|g| (g.status, g.count, g.amount))
        .collect();
    assert_eq!(
        groups,
        vec![(FineStatus::Paid, 2, 150.0), (FineStatus::Disputed, 1, 60.0)]
    );
}
