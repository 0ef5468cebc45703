use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::model::calculation_period::{CalculationPeriod, PeriodStatus};
use crate::repository::periods;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePeriod {
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = 1)]
    pub month: u32,
    /// Defaults to `YYYY-MM`.
    #[schema(example = "2025-01")]
    pub period_name: Option<String>,
    #[serde(default)]
    pub status: PeriodStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePeriod {
    pub period_name: Option<String>,
    pub status: Option<PeriodStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PeriodCheck {
    pub exists: bool,
    pub status: Option<PeriodStatus>,
    pub can_start_calculation: bool,
}

impl PeriodCheck {
    fn of(period: Option<&CalculationPeriod>) -> Self {
        Self {
            exists: period.is_some(),
            status: period.map(|p| p.status),
            can_start_calculation: period.is_none_or(|p| p.status == PeriodStatus::Draft),
        }
    }
}

fn validate_month(month: u32) -> AppResult<()> {
    if !(1..=12).contains(&month) {
        return Err(AppError::BadRequest(format!("Month must be 1-12, got {month}")));
    }
    Ok(())
}

/// Why a period in `status` cannot be started, if it cannot.
fn start_blocker(status: PeriodStatus) -> Option<&'static str> {
    match status {
        PeriodStatus::Draft => None,
        PeriodStatus::Calculating => Some("Calculation has already started for this period"),
        PeriodStatus::Completed => Some("Calculation for this period is already completed"),
        PeriodStatus::Locked => Some("This period is locked"),
    }
}

/// List Calculation Periods
#[utoipa::path(
    get,
    path = "/api/calculation-periods",
    responses(
        (status = 200, description = "All periods, newest first", body = [CalculationPeriod])
    ),
    tag = "Calculation Period",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_periods(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> AppResult<impl Responder> {
    let mut conn = pool.acquire().await?;
    let rows = periods::list(&mut conn).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Current Calculation Period
///
/// The period for the current month in Japan time.
#[utoipa::path(
    get,
    path = "/api/calculation-periods/current",
    responses(
        (status = 200, description = "Period for this month", body = CalculationPeriod),
        (status = 404, description = "No period for this month", body = Object, example = json!({
            "message": "Calculation period not found"
        }))
    ),
    tag = "Calculation Period",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn current_period(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> AppResult<impl Responder> {
    let today = Utc::now() + Duration::hours(9);
    let mut conn = pool.acquire().await?;
    let period = periods::find_by_month(&mut conn, today.year(), today.month())
        .await?
        .ok_or_else(|| AppError::not_found("Calculation period"))?;
    Ok(HttpResponse::Ok().json(period))
}

/// Get Calculation Period
#[utoipa::path(
    get,
    path = "/api/calculation-periods/{period_id}",
    params(
        ("period_id", Path, description = "Calculation period ID")
    ),
    responses(
        (status = 200, description = "Period found", body = CalculationPeriod),
        (status = 404, description = "Period not found")
    ),
    tag = "Calculation Period",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_period(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> AppResult<impl Responder> {
    let mut conn = pool.acquire().await?;
    let period = periods::get(&mut conn, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(period))
}

/// Create Calculation Period
#[utoipa::path(
    post,
    path = "/api/calculation-periods",
    request_body = CreatePeriod,
    responses(
        (status = 200, description = "Period created", body = CalculationPeriod),
        (status = 409, description = "A period for this year and month exists", body = Object, example = json!({
            "message": "A calculation period for 2025-01 already exists"
        }))
    ),
    tag = "Calculation Period",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_period(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreatePeriod>,
) -> AppResult<impl Responder> {
    let CreatePeriod {
        year,
        month,
        period_name,
        status,
    } = payload.into_inner();
    validate_month(month)?;

    let mut tx = pool.begin().await?;
    if periods::find_by_month(&mut tx, year, month).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "A calculation period for {} already exists",
            CalculationPeriod::default_name(year, month)
        )));
    }

    let name = period_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| CalculationPeriod::default_name(year, month));
    let id = periods::insert(&mut tx, year, month, &name, status).await?;
    let period = periods::get(&mut tx, id).await?;
    tx.commit().await?;

    info!(id, year, month, user_id = auth.user_id, "Calculation period created");
    Ok(HttpResponse::Ok().json(period))
}

/// Update Calculation Period
#[utoipa::path(
    put,
    path = "/api/calculation-periods/{period_id}",
    params(
        ("period_id", Path, description = "Calculation period ID")
    ),
    request_body = UpdatePeriod,
    responses(
        (status = 200, description = "Period updated", body = CalculationPeriod),
        (status = 404, description = "Period not found")
    ),
    tag = "Calculation Period",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_period(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdatePeriod>,
) -> AppResult<impl Responder> {
    let id = path.into_inner();
    let name = payload.period_name.as_deref().map(str::trim).filter(|n| !n.is_empty());

    let mut tx = pool.begin().await?;
    let before = periods::get(&mut tx, id).await?;
    periods::update(&mut tx, id, name, payload.status).await?;
    let period = periods::get(&mut tx, id).await?;
    tx.commit().await?;

    info!(
        id,
        from = %before.status,
        to = %period.status,
        user_id = auth.user_id,
        "Calculation period updated"
    );
    Ok(HttpResponse::Ok().json(period))
}

/// Delete Calculation Period
///
/// Only draft periods can be deleted.
#[utoipa::path(
    delete,
    path = "/api/calculation-periods/{period_id}",
    params(
        ("period_id", Path, description = "Calculation period ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Calculation period deleted successfully"
        })),
        (status = 404, description = "Period not found"),
        (status = 409, description = "Period is not a draft")
    ),
    tag = "Calculation Period",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_period(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> AppResult<impl Responder> {
    let id = path.into_inner();

    let mut tx = pool.begin().await?;
    let period = periods::get(&mut tx, id).await?;
    if period.status != PeriodStatus::Draft {
        return Err(AppError::Conflict(
            "Only draft calculation periods can be deleted".into(),
        ));
    }
    periods::delete(&mut tx, id).await?;
    tx.commit().await?;

    info!(id, user_id = auth.user_id, "Calculation period deleted");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Calculation period deleted successfully"
    })))
}

/// Check Calculation Period
#[utoipa::path(
    get,
    path = "/api/calculation-periods/check/{year}/{month}",
    params(
        ("year", Path, description = "Year"),
        ("month", Path, description = "Month (1-12)")
    ),
    responses(
        (status = 200, description = "Whether the period exists and can be started", body = PeriodCheck, example = json!({
            "exists": true,
            "status": "draft",
            "can_start_calculation": true
        }))
    ),
    tag = "Calculation Period",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn check_period(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<(i32, u32)>,
) -> AppResult<impl Responder> {
    let (year, month) = path.into_inner();
    let mut conn = pool.acquire().await?;
    let period = periods::find_by_month(&mut conn, year, month).await?;
    Ok(HttpResponse::Ok().json(PeriodCheck::of(period.as_ref())))
}

/// Start Calculation
///
/// Creates the period as `calculating`, or moves an existing draft to
/// `calculating`.
#[utoipa::path(
    post,
    path = "/api/calculation-periods/start/{year}/{month}",
    params(
        ("year", Path, description = "Year"),
        ("month", Path, description = "Month (1-12)")
    ),
    responses(
        (status = 200, description = "Calculation started", body = CalculationPeriod),
        (status = 400, description = "Period already started, completed or locked", body = Object, example = json!({
            "message": "This period is locked"
        }))
    ),
    tag = "Calculation Period",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn start_calculation(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<(i32, u32)>,
) -> AppResult<impl Responder> {
    let (year, month) = path.into_inner();
    validate_month(month)?;

    let mut tx = pool.begin().await?;
    let id = match periods::find_by_month(&mut tx, year, month).await? {
        Some(existing) => {
            if let Some(reason) = start_blocker(existing.status) {
                return Err(AppError::BadRequest(reason.into()));
            }
            periods::update(&mut tx, existing.id, None, Some(PeriodStatus::Calculating)).await?;
            existing.id
        }
        None => {
            let name = CalculationPeriod::default_name(year, month);
            periods::insert(&mut tx, year, month, &name, PeriodStatus::Calculating).await?
        }
    };
    let period = periods::get(&mut tx, id).await?;
    tx.commit().await?;

    info!(id, year, month, user_id = auth.user_id, "Salary calculation started");
    Ok(HttpResponse::Ok().json(period))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn period(status: PeriodStatus) -> CalculationPeriod {
        CalculationPeriod {
            id: 1,
            year: 2025,
            month: 1,
            period_name: "2025-01".into(),
            status,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn only_missing_or_draft_periods_can_start() {
        assert!(PeriodCheck::of(None).can_start_calculation);
        assert!(!PeriodCheck::of(None).exists);

        let draft = period(PeriodStatus::Draft);
        let check = PeriodCheck::of(Some(&draft));
        assert!(check.exists);
        assert!(check.can_start_calculation);
        assert_eq!(check.status, Some(PeriodStatus::Draft));

        for status in [PeriodStatus::Calculating, PeriodStatus::Completed, PeriodStatus::Locked] {
            assert!(!PeriodCheck::of(Some(&period(status))).can_start_calculation);
            assert!(start_blocker(status).is_some());
        }
        assert!(start_blocker(PeriodStatus::Draft).is_none());
    }

    #[test]
    fn month_must_be_in_range() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(matches!(validate_month(0), Err(AppError::BadRequest(_))));
        assert!(matches!(validate_month(13), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn check_serializes_lowercase_status() {
        let draft = period(PeriodStatus::Draft);
        let json = serde_json::to_value(PeriodCheck::of(Some(&draft))).unwrap();
        assert_eq!(json["status"], "draft");
        assert_eq!(json["exists"], true);
    }
}
