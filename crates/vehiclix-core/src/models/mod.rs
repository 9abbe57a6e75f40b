pub mod claim;
pub mod fine;
pub mod report;
pub mod report_data;
pub mod vehicle;

use crate::error::CoreError;

/// Closed enumerations whose variants are addressed by name.
///
/// `ALL` lists the variants in declaration order; grouped report output
/// follows that order.
pub trait NamedEnum: Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    /// Case-insensitive lookup by variant name.
    fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(name))
    }
}

pub(crate) fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::MissingField(field.to_string()));
    }
    Ok(())
}

pub(crate) fn max_len(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.chars().count() > max {
        return Err(CoreError::InvalidField {
            field: field.to_string(),
            reason: format!("must be at most {max} characters"),
        });
    }
    Ok(())
}

pub(crate) fn positive_amount(field: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::InvalidField {
            field: field.to_string(),
            reason: "must be a positive number".to_string(),
        });
    }
    Ok(())
}
