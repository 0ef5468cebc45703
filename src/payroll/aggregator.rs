use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use sqlx::MySqlConnection;
use tracing::info;
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::model::attendance_record::AttendanceRecord;
use crate::model::employee::Employee;
use crate::repository::{attendance, employees, freee, kincone};

/// Everything the report needs about one employee for one period.
///
/// The count fields have no import source yet and stay `None` unless
/// filled by another producer; the template filler skips unset fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct WorkDataSummary {
    pub employee_id: u64,
    #[schema(example = "1001")]
    pub employee_number: String,
    pub employee_name: String,
    pub working_days: Option<i32>,
    #[schema(example = "142:02")]
    pub total_work_hours: Option<String>,
    pub paid_leave_days: Option<Decimal>,
    pub statutory_holiday_hours: Option<String>,
    pub night_working_hours: Option<String>,
    pub absence_days: Option<i32>,
    pub remote_count: Option<i32>,
    pub lunch_count: Option<i32>,
    pub office_count: Option<i32>,
    pub event_count: Option<i32>,
    pub trip_night_before_count: Option<i32>,
    pub trip_count: Option<i32>,
    pub travel_onday_count: Option<i32>,
    pub travel_holidays_count: Option<i32>,
    pub special_holiday: Option<i32>,
    pub special_holiday_without_pay: Option<i32>,
    pub kiwi_points: Option<i32>,
    pub freee_expenses: Option<i64>,
    pub kincone_expenses: Option<i64>,
    /// Lifts the 10-day cap on remote, office and lunch allowances.
    pub no_allowance_cap: bool,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.trim().is_empty()).cloned()
}

fn totals(amounts: &[(u64, Decimal)]) -> HashMap<u64, Decimal> {
    let mut by_employee: HashMap<u64, Decimal> = HashMap::new();
    for (employee_id, amount) in amounts {
        *by_employee.entry(*employee_id).or_default() += *amount;
    }
    by_employee
}

/// Join attendance and summed amounts onto each employee, in `employees`
/// order. `attendance` must be sorted by id; the first row per employee
/// wins.
pub fn build_summaries(
    employees: &[Employee],
    attendance: &[AttendanceRecord],
    expense_amounts: &[(u64, Decimal)],
    transport_amounts: &[(u64, Decimal)],
) -> Vec<WorkDataSummary> {
    let mut first_attendance: HashMap<u64, &AttendanceRecord> = HashMap::new();
    for record in attendance {
        if let Some(employee_id) = record.employee_id {
            first_attendance.entry(employee_id).or_insert(record);
        }
    }
    let expenses = totals(expense_amounts);
    let transport = totals(transport_amounts);

    employees
        .iter()
        .map(|emp| {
            let record = first_attendance.get(&emp.id).copied();
            let whole = |sums: &HashMap<u64, Decimal>| {
                sums.get(&emp.id)
                    .copied()
                    .unwrap_or(Decimal::ZERO)
                    .trunc()
                    .to_i64()
                    .unwrap_or(0)
            };

            WorkDataSummary {
                employee_id: emp.id,
                employee_number: emp.employee_number.clone(),
                employee_name: emp.name.clone(),
                working_days: record.and_then(|r| r.work_days),
                total_work_hours: record.and_then(|r| non_blank(&r.total_work_time)),
                paid_leave_days: record
                    .and_then(|r| r.paid_leave_used)
                    .filter(|d| !d.is_zero()),
                statutory_holiday_hours: record.and_then(|r| non_blank(&r.holiday_work_time)),
                night_working_hours: record.and_then(|r| non_blank(&r.late_night_work_time)),
                absence_days: record.map(|r| r.absence_days),
                freee_expenses: Some(whole(&expenses)),
                kincone_expenses: Some(whole(&transport)),
                no_allowance_cap: false,
                ..Default::default()
            }
        })
        .collect()
}

/// Summaries for every active employee of every owner.
pub async fn load_summaries(
    conn: &mut MySqlConnection,
    calculation_period_id: u64,
) -> AppResult<Vec<WorkDataSummary>> {
    let staff = employees::list_active(&mut *conn).await?;
    let attendance = attendance::list_for_period(&mut *conn, calculation_period_id).await?;
    let expenses = freee::amounts_for_period(&mut *conn, calculation_period_id).await?;
    let transport = kincone::amounts_for_period(&mut *conn, calculation_period_id).await?;

    let summaries = build_summaries(&staff, &attendance, &expenses, &transport);
    info!(
        calculation_period_id,
        employees = summaries.len(),
        attendance_rows = attendance.len(),
        "Work data aggregated"
    );
    Ok(summaries)
}
