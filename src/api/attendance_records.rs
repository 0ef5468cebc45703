use actix_multipart::Multipart;
use actix_web::{Responder, web};
use serde_json::Value;
use sqlx::MySqlPool;

use crate::api::records::{self, ImportQuery};
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::csv_import::{DecodeFallback, ImportResponse, attendance};
use crate::duration::WorkDuration;
use crate::error::{AppError, AppResult};
use crate::model::attendance_record::{AttendanceRecord, NewAttendanceRecord};
use crate::repository::RecordFilter;
use crate::repository::attendance::Attendance;

const WHAT: &str = "Attendance record";

/// Rewrite every set work-time field as canonical `H:MM`.
fn normalize_durations(record: &mut NewAttendanceRecord) -> AppResult<()> {
    for (column, value) in record.durations_mut() {
        let Some(raw) = value.as_deref() else { continue };
        if matches!(raw.trim(), "" | "-") {
            *value = None;
            continue;
        }
        let normalized = WorkDuration::normalize(raw)
            .ok_or_else(|| AppError::BadRequest(format!("{column}: invalid duration {raw:?}")))?;
        *value = Some(normalized);
    }
    Ok(())
}

/// List Attendance Records
#[utoipa::path(
    get,
    path = "/api/attendance-records",
    params(RecordFilter),
    responses(
        (status = 200, description = "Records visible to the caller", body = [AttendanceRecord])
    ),
    tag = "Attendance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_records(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<RecordFilter>,
) -> AppResult<impl Responder> {
    records::list::<Attendance>(&pool, auth.user_id, &query).await
}

/// Get Attendance Record
#[utoipa::path(
    get,
    path = "/api/attendance-records/{record_id}",
    params(
        ("record_id", Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Record found", body = AttendanceRecord),
        (status = 403, description = "Linked employee belongs to another user"),
        (status = 404, description = "Record not found")
    ),
    tag = "Attendance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_record(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> AppResult<impl Responder> {
    records::get::<Attendance>(&pool, auth.user_id, path.into_inner(), WHAT).await
}

/// Create Attendance Record
#[utoipa::path(
    post,
    path = "/api/attendance-records",
    request_body = NewAttendanceRecord,
    responses(
        (status = 200, description = "Record created", body = AttendanceRecord),
        (status = 400, description = "Invalid duration"),
        (status = 404, description = "Calculation period or employee not found"),
        (status = 409, description = "Calculation period no longer accepts edits")
    ),
    tag = "Attendance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_record(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<NewAttendanceRecord>,
) -> AppResult<impl Responder> {
    let mut new = payload.into_inner();
    normalize_durations(&mut new)?;
    records::create::<Attendance, _>(&pool, auth.user_id, &new, WHAT).await
}

/// Update Attendance Record
///
/// Partial update. Work-time fields are stored as `H:MM`.
#[utoipa::path(
    put,
    path = "/api/attendance-records/{record_id}",
    params(
        ("record_id", Path, description = "Attendance record ID")
    ),
    request_body(content = Object, example = json!({
        "total_work_time": "142:02:00",
        "work_days": 20
    })),
    responses(
        (status = 200, description = "Record updated", body = AttendanceRecord),
        (status = 400, description = "Unknown field or invalid value"),
        (status = 404, description = "Record not found"),
        (status = 409, description = "Calculation period no longer accepts edits")
    ),
    tag = "Attendance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_record(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> AppResult<impl Responder> {
    records::update::<Attendance>(&pool, auth.user_id, path.into_inner(), &body, WHAT).await
}

/// Delete Attendance Record
#[utoipa::path(
    delete,
    path = "/api/attendance-records/{record_id}",
    params(
        ("record_id", Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Attendance record deleted successfully"
        })),
        (status = 404, description = "Record not found"),
        (status = 409, description = "Calculation period no longer accepts edits")
    ),
    tag = "Attendance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_record(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> AppResult<impl Responder> {
    records::delete::<Attendance>(&pool, auth.user_id, path.into_inner(), WHAT).await
}

/// Delete All Attendance Records
///
/// Removes every record visible to the caller, unlinked rows included.
#[utoipa::path(
    delete,
    path = "/api/attendance-records",
    responses(
        (status = 200, description = "Records deleted", body = Object, example = json!({
            "message": "Deleted 42 attendance records",
            "deleted_count": 42
        }))
    ),
    tag = "Attendance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_all_records(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> AppResult<impl Responder> {
    records::delete_all::<Attendance>(&pool, auth.user_id, "attendance").await
}

/// Import Attendance CSV
///
/// Multipart field `file`. Rows that fail to parse abort the whole import.
#[utoipa::path(
    post,
    path = "/api/attendance-records/import-csv",
    params(ImportQuery),
    request_body(content_type = "multipart/form-data", content = Object),
    responses(
        (status = 200, description = "Import outcome; `success` is false when any row failed", body = ImportResponse),
        (status = 400, description = "Missing, empty, non-CSV or undecodable file"),
        (status = 404, description = "Calculation period not found"),
        (status = 409, description = "Calculation period no longer accepts edits")
    ),
    tag = "Attendance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn import_csv(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<ImportQuery>,
    payload: Multipart,
) -> AppResult<impl Responder> {
    records::import(
        &pool,
        &config,
        auth.user_id,
        query.calculation_period_id,
        payload,
        DecodeFallback::Reject,
        attendance::parse,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> NewAttendanceRecord {
        NewAttendanceRecord {
            calculation_period_id: 1,
            employee_id: None,
            employee_number: "1001".into(),
            employee_name: String::new(),
            period_start: None,
            period_end: None,
            work_days: Some(20),
            total_work_time: Some("142:02:00".into()),
            regular_work_time: Some("  ".into()),
            actual_work_time: None,
            overtime_work_time: Some("8:5".into()),
            late_night_work_time: None,
            holiday_work_time: None,
            paid_leave_used: None,
            paid_leave_remaining: None,
            absence_days: 0,
            tardiness_count: 0,
            early_leave_count: 0,
            raw_data: None,
        }
    }

    #[test]
    fn durations_are_normalized_on_create() {
        let mut new = record();
        normalize_durations(&mut new).unwrap();
        assert_eq!(new.total_work_time.as_deref(), Some("142:02"));
        assert_eq!(new.regular_work_time, None);
        assert_eq!(new.overtime_work_time.as_deref(), Some("8:05"));
    }

    #[test]
    fn unparseable_duration_is_rejected() {
        let mut new = record();
        new.holiday_work_time = Some("lots".into());
        assert!(matches!(normalize_durations(&mut new), Err(AppError::BadRequest(_))));
    }
}
