use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Lifecycle of one payroll cycle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PeriodStatus {
    Draft,
    Calculating,
    Completed,
    Locked,
}

impl PeriodStatus {
    /// Imports and record edits are only accepted while the period is open.
    pub fn accepts_edits(&self) -> bool {
        matches!(self, PeriodStatus::Draft | PeriodStatus::Calculating)
    }
}

impl Default for PeriodStatus {
    fn default() -> Self {
        PeriodStatus::Draft
    }
}

impl TryFrom<String> for PeriodStatus {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 3,
        "year": 2025,
        "month": 1,
        "period_name": "2025-01",
        "status": "calculating",
        "created_at": "2025-01-31T09:00:00Z",
        "updated_at": "2025-02-01T09:00:00Z"
    })
)]
pub struct CalculationPeriod {
    pub id: u64,
    pub year: i32,
    pub month: u32,
    pub period_name: String,
    #[sqlx(try_from = "String")]
    pub status: PeriodStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CalculationPeriod {
    pub fn default_name(year: i32, month: u32) -> String {
        format!("{year}-{month:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!("locked".parse::<PeriodStatus>().unwrap(), PeriodStatus::Locked);
        assert_eq!(PeriodStatus::Calculating.as_ref(), "calculating");
        assert!("archived".parse::<PeriodStatus>().is_err());
    }

    #[test]
    fn only_open_periods_accept_edits() {
        assert!(PeriodStatus::Draft.accepts_edits());
        assert!(PeriodStatus::Calculating.accepts_edits());
        assert!(!PeriodStatus::Completed.accepts_edits());
        assert!(!PeriodStatus::Locked.accepts_edits());
    }
}
