use vehiclix_core::models::NamedEnum;
use vehiclix_core::models::report::Report;
use vehiclix_core::models::report_data::{ClaimsReport, FinesReport, ReportData, VehicleStatusReport};

/// A single value in an exported table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Count(u64),
    Amount(f64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Rendering for text-based formats. Amounts keep two decimals.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Count(n) => n.to_string(),
            Self::Amount(v) => format!("{v:.2}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub title: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

/// Flatten a report into the tables every export format renders:
/// a summary, the per-status breakdown, then the records.
pub fn report_tables(report: &Report, data: &ReportData) -> Vec<Table> {
    let mut summary = vec![
        vec![Cell::text("Report type"), Cell::text(report.report_type.as_str())],
        vec![Cell::text("Report id"), Cell::text(report.report_id.to_string())],
        vec![Cell::text("Created at"), Cell::text(report.created_at.to_string())],
    ];
    if let Some(completed_at) = report.completed_at() {
        summary.push(vec![Cell::text("Completed at"), Cell::text(completed_at.to_string())]);
    }
    summary.push(vec![Cell::text("Total count"), Cell::Count(data.total_count())]);

    let mut tables = match data {
        ReportData::VehicleStatus(r) => vehicle_tables(r),
        ReportData::ClaimsSummary(r) => {
            summary.push(vec![Cell::text("Total amount"), Cell::Amount(r.total_amount)]);
            claims_tables(r)
        }
        ReportData::FinesSummary(r) => {
            summary.push(vec![Cell::text("Total amount"), Cell::Amount(r.total_amount)]);
            fines_tables(r)
        }
    };

    for (key, value) in &report.parameters {
        summary.push(vec![Cell::text(format!("Filter {key}")), Cell::text(value)]);
    }
    for warning in data.warnings() {
        summary.push(vec![Cell::text("Warning"), Cell::text(warning)]);
    }

    tables.insert(
        0,
        Table {
            title: "Summary".to_string(),
            headers: vec!["Metric", "Value"],
            rows: summary,
        },
    );
    tables
}

fn vehicle_tables(r: &VehicleStatusReport) -> Vec<Table> {
    let by_status = Table {
        title: "By status".to_string(),
        headers: vec!["Status", "Count"],
        rows: r
            .by_status
            .iter()
            .map(|s| vec![Cell::text(s.status.as_str()), Cell::Count(s.count)])
            .collect(),
    };
    let records = Table {
        title: "Vehicles".to_string(),
        headers: vec!["Id", "VIN", "License plate", "Brand", "Model", "Year", "Status"],
        rows: r
            .vehicles
            .iter()
            .map(|v| {
                vec![
                    Cell::Count(v.id),
                    Cell::text(&v.vin),
                    Cell::text(&v.license_plate),
                    Cell::text(&v.brand),
                    Cell::text(&v.model),
                    Cell::text(v.year.to_string()),
                    Cell::text(v.status.as_str()),
                ]
            })
            .collect(),
    };
    vec![by_status, records]
}

fn claims_tables(r: &ClaimsReport) -> Vec<Table> {
    let by_status = Table {
        title: "By status".to_string(),
        headers: vec!["Status", "Count", "Amount"],
        rows: r
            .by_status
            .iter()
            .map(|s| {
                vec![
                    Cell::text(s.status.as_str()),
                    Cell::Count(s.count),
                    Cell::Amount(s.amount),
                ]
            })
            .collect(),
    };
    let records = Table {
        title: "Claims".to_string(),
        headers: vec![
            "Id",
            "Claim id",
            "Vehicle id",
            "Date",
            "Description",
            "Amount",
            "Status",
        ],
        rows: r
            .claims
            .iter()
            .map(|c| {
                vec![
                    Cell::Count(c.id),
                    Cell::text(&c.claim_id),
                    Cell::Count(c.vehicle_id),
                    Cell::text(c.date.to_string()),
                    Cell::text(&c.description),
                    Cell::Amount(c.amount),
                    Cell::text(c.status.as_str()),
                ]
            })
            .collect(),
    };
    vec![by_status, records]
}

fn fines_tables(r: &FinesReport) -> Vec<Table> {
    let by_status = Table {
        title: "By status".to_string(),
        headers: vec!["Status", "Count", "Amount"],
        rows: r
            .by_status
            .iter()
            .map(|s| {
                vec![
                    Cell::text(s.status.as_str()),
                    Cell::Count(s.count),
                    Cell::Amount(s.amount),
                ]
            })
            .collect(),
    };
    let records = Table {
        title: "Fines".to_string(),
        headers: vec![
            "Id",
            "Fine id",
            "Vehicle id",
            "Date",
            "Description",
            "Amount",
            "Status",
        ],
        rows: r
            .fines
            .iter()
            .map(|f| {
                vec![
                    Cell::Count(f.id),
                    Cell::text(&f.fine_id),
                    Cell::Count(f.vehicle_id),
                    Cell::text(f.date.to_string()),
                    Cell::text(&f.description),
                    Cell::Amount(f.amount),
                    Cell::text(f.status.as_str()),
                ]
            })
            .collect(),
    };
    vec![by_status, records]
}
