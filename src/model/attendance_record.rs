use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use utoipa::ToSchema;

pub const ATTENDANCE_SOURCE: &str = "attendance_csv";

/// One period's aggregated work-time figures for one employee.
///
/// Work-time columns hold canonical `H:MM` strings (see
/// [`crate::duration::WorkDuration`]).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    pub id: u64,
    pub calculation_period_id: u64,
    pub employee_id: Option<u64>,
    pub employee_number: String,
    pub employee_name: String,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub work_days: Option<i32>,
    #[schema(example = "142:02")]
    pub total_work_time: Option<String>,
    pub regular_work_time: Option<String>,
    pub actual_work_time: Option<String>,
    pub overtime_work_time: Option<String>,
    pub late_night_work_time: Option<String>,
    pub holiday_work_time: Option<String>,
    pub paid_leave_used: Option<Decimal>,
    pub paid_leave_remaining: Option<Decimal>,
    pub absence_days: i32,
    pub tardiness_count: i32,
    pub early_leave_count: i32,
    pub data_source: String,
    #[schema(value_type = Option<Object>)]
    pub raw_data: Option<Json<Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape shared by the CSV importer and the create endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewAttendanceRecord {
    #[schema(example = 3)]
    pub calculation_period_id: u64,
    pub employee_id: Option<u64>,
    #[schema(example = "1001")]
    pub employee_number: String,
    #[serde(default)]
    pub employee_name: String,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub work_days: Option<i32>,
    #[schema(example = "142:02")]
    pub total_work_time: Option<String>,
    pub regular_work_time: Option<String>,
    pub actual_work_time: Option<String>,
    pub overtime_work_time: Option<String>,
    pub late_night_work_time: Option<String>,
    pub holiday_work_time: Option<String>,
    pub paid_leave_used: Option<Decimal>,
    pub paid_leave_remaining: Option<Decimal>,
    #[serde(default)]
    pub absence_days: i32,
    #[serde(default)]
    pub tardiness_count: i32,
    #[serde(default)]
    pub early_leave_count: i32,
    #[schema(value_type = Option<Object>)]
    pub raw_data: Option<Value>,
}

impl NewAttendanceRecord {
    /// Duration fields, by column name, for validation and normalization.
    pub fn durations_mut(&mut self) -> [(&'static str, &mut Option<String>); 6] {
        [
            ("total_work_time", &mut self.total_work_time),
            ("regular_work_time", &mut self.regular_work_time),
            ("actual_work_time", &mut self.actual_work_time),
            ("overtime_work_time", &mut self.overtime_work_time),
            ("late_night_work_time", &mut self.late_night_work_time),
            ("holiday_work_time", &mut self.holiday_work_time),
        ]
    }
}
