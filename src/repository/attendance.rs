use sqlx::MySqlConnection;
use sqlx::types::Json;

use crate::csv_import::Insertable;
use crate::error::AppResult;
use crate::model::attendance_record::{ATTENDANCE_SOURCE, AttendanceRecord, NewAttendanceRecord};
use crate::utils::db_utils::{ColumnKind, Patchable};

use super::RecordTable;

pub struct Attendance;

impl RecordTable for Attendance {
    const TABLE: &'static str = "attendance_records";
    const PATCHABLE: Patchable = &[
        ("employee_id", ColumnKind::Id),
        ("employee_number", ColumnKind::Text),
        ("employee_name", ColumnKind::Text),
        ("period_start", ColumnKind::Date),
        ("period_end", ColumnKind::Date),
        ("work_days", ColumnKind::Int),
        ("total_work_time", ColumnKind::Duration),
        ("regular_work_time", ColumnKind::Duration),
        ("actual_work_time", ColumnKind::Duration),
        ("overtime_work_time", ColumnKind::Duration),
        ("late_night_work_time", ColumnKind::Duration),
        ("holiday_work_time", ColumnKind::Duration),
        ("paid_leave_used", ColumnKind::Decimal),
        ("paid_leave_remaining", ColumnKind::Decimal),
        ("absence_days", ColumnKind::Int),
        ("tardiness_count", ColumnKind::Int),
        ("early_leave_count", ColumnKind::Int),
    ];
    type Row = AttendanceRecord;
}

impl Insertable for NewAttendanceRecord {
    async fn insert(&self, conn: &mut MySqlConnection) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance_records
            (calculation_period_id, employee_id, employee_number, employee_name,
             period_start, period_end, work_days,
             total_work_time, regular_work_time, actual_work_time,
             overtime_work_time, late_night_work_time, holiday_work_time,
             paid_leave_used, paid_leave_remaining,
             absence_days, tardiness_count, early_leave_count,
             data_source, raw_data)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(self.calculation_period_id)
        .bind(self.employee_id)
        .bind(&self.employee_number)
        .bind(&self.employee_name)
        .bind(self.period_start)
        .bind(self.period_end)
        .bind(self.work_days)
        .bind(&self.total_work_time)
        .bind(&self.regular_work_time)
        .bind(&self.actual_work_time)
        .bind(&self.overtime_work_time)
        .bind(&self.late_night_work_time)
        .bind(&self.holiday_work_time)
        .bind(self.paid_leave_used)
        .bind(self.paid_leave_remaining)
        .bind(self.absence_days)
        .bind(self.tardiness_count)
        .bind(self.early_leave_count)
        .bind(ATTENDANCE_SOURCE)
        .bind(self.raw_data.clone().map(Json))
        .execute(conn)
        .await?;
        Ok(result.last_insert_id())
    }
}

/// Every attendance row of the period, oldest first.
pub async fn list_for_period(
    conn: &mut MySqlConnection,
    calculation_period_id: u64,
) -> AppResult<Vec<AttendanceRecord>> {
    let rows = sqlx::query_as::<_, AttendanceRecord>(
        "SELECT * FROM attendance_records WHERE calculation_period_id = ? ORDER BY id",
    )
    .bind(calculation_period_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}
