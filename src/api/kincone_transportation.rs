use actix_multipart::Multipart;
use actix_web::{Responder, web};
use serde_json::Value;
use sqlx::MySqlPool;

use crate::api::records::{self, ImportQuery};
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::csv_import::{DecodeFallback, ImportResponse, kincone};
use crate::error::AppResult;
use crate::model::kincone_transportation::{KinconeTransportation, NewKinconeTransportation};
use crate::repository::RecordFilter;
use crate::repository::kincone::Kincone;

const WHAT: &str = "Transportation record";

#[utoipa::path(
    get,
    path = "/api/kincone-transportation",
    params(RecordFilter),
    responses(
        (status = 200, description = "Transportation records visible to the caller", body = [KinconeTransportation])
    ),
    tag = "Transportation",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_transportation(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<RecordFilter>,
) -> AppResult<impl Responder> {
    records::list::<Kincone>(&pool, auth.user_id, &query).await
}

#[utoipa::path(
    get,
    path = "/api/kincone-transportation/{transportation_id}",
    params(
        ("transportation_id", Path, description = "Transportation record ID")
    ),
    responses(
        (status = 200, description = "Record found", body = KinconeTransportation),
        (status = 404, description = "Record not found")
    ),
    tag = "Transportation",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_transportation(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> AppResult<impl Responder> {
    records::get::<Kincone>(&pool, auth.user_id, path.into_inner(), WHAT).await
}

#[utoipa::path(
    post,
    path = "/api/kincone-transportation",
    request_body = NewKinconeTransportation,
    responses(
        (status = 200, description = "Record created", body = KinconeTransportation),
        (status = 404, description = "Calculation period or employee not found"),
        (status = 409, description = "Calculation period no longer accepts edits")
    ),
    tag = "Transportation",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_transportation(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<NewKinconeTransportation>,
) -> AppResult<impl Responder> {
    records::create::<Kincone, NewKinconeTransportation>(&pool, auth.user_id, &payload, WHAT).await
}

#[utoipa::path(
    put,
    path = "/api/kincone-transportation/{transportation_id}",
    params(
        ("transportation_id", Path, description = "Transportation record ID")
    ),
    request_body(content = Object, example = json!({
        "approval_status": "approved"
    })),
    responses(
        (status = 200, description = "Record updated", body = KinconeTransportation),
        (status = 400, description = "Unknown field or invalid value"),
        (status = 404, description = "Record not found"),
        (status = 409, description = "Calculation period no longer accepts edits")
    ),
    tag = "Transportation",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_transportation(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> AppResult<impl Responder> {
    records::update::<Kincone>(&pool, auth.user_id, path.into_inner(), &body, WHAT).await
}

#[utoipa::path(
    delete,
    path = "/api/kincone-transportation/{transportation_id}",
    params(
        ("transportation_id", Path, description = "Transportation record ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Record not found"),
        (status = 409, description = "Calculation period no longer accepts edits")
    ),
    tag = "Transportation",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_transportation(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> AppResult<impl Responder> {
    records::delete::<Kincone>(&pool, auth.user_id, path.into_inner(), WHAT).await
}

#[utoipa::path(
    delete,
    path = "/api/kincone-transportation",
    responses(
        (status = 200, description = "Records deleted", body = Object, example = json!({
            "message": "Deleted 8 transportation records",
            "deleted_count": 8
        }))
    ),
    tag = "Transportation",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_all_transportation(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> AppResult<impl Responder> {
    records::delete_all::<Kincone>(&pool, auth.user_id, "transportation").await
}

/// Import kincone CSV
///
/// One row per employee with the period's fee totals.
#[utoipa::path(
    post,
    path = "/api/kincone-transportation/import-csv",
    params(ImportQuery),
    request_body(content_type = "multipart/form-data", content = Object),
    responses(
        (status = 200, description = "Import outcome", body = ImportResponse),
        (status = 400, description = "Missing, empty or non-CSV file"),
        (status = 404, description = "Calculation period not found"),
        (status = 409, description = "Calculation period no longer accepts edits")
    ),
    tag = "Transportation",
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
        DecodeFallback::LossyUtf8,
        kincone::parse,
    )
    .await
}
