use actix_multipart::Multipart;
use actix_web::{Responder, web};
use serde_json::Value;
use sqlx::MySqlPool;

use crate::api::records::{self, ImportQuery};
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::csv_import::{DecodeFallback, ImportResponse, freee};
use crate::error::AppResult;
use crate::model::freee_expense::{FreeeExpense, NewFreeeExpense};
use crate::repository::RecordFilter;
use crate::repository::freee::Freee;

const WHAT: &str = "Expense";

#[utoipa::path(
    get,
    path = "/api/freee-expenses",
    params(RecordFilter),
    responses(
        (status = 200, description = "Expenses visible to the caller", body = [FreeeExpense])
    ),
    tag = "Expense",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_expenses(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<RecordFilter>,
) -> AppResult<impl Responder> {
    records::list::<Freee>(&pool, auth.user_id, &query).await
}

#[utoipa::path(
    get,
    path = "/api/freee-expenses/{expense_id}",
    params(
        ("expense_id", Path, description = "Expense ID")
    ),
    responses(
        (status = 200, description = "Expense found", body = FreeeExpense),
        (status = 404, description = "Expense not found")
    ),
    tag = "Expense",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_expense(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> AppResult<impl Responder> {
    records::get::<Freee>(&pool, auth.user_id, path.into_inner(), WHAT).await
}

#[utoipa::path(
    post,
    path = "/api/freee-expenses",
    request_body = NewFreeeExpense,
    responses(
        (status = 200, description = "Expense created", body = FreeeExpense),
        (status = 404, description = "Calculation period or employee not found"),
        (status = 409, description = "Calculation period no longer accepts edits")
    ),
    tag = "Expense",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_expense(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<NewFreeeExpense>,
) -> AppResult<impl Responder> {
    records::create::<Freee, NewFreeeExpense>(&pool, auth.user_id, &payload, WHAT).await
}

#[utoipa::path(
    put,
    path = "/api/freee-expenses/{expense_id}",
    params(
        ("expense_id", Path, description = "Expense ID")
    ),
    request_body(content = Object, example = json!({
        "amount": "1200",
        "notes": "taxi"
    })),
    responses(
        (status = 200, description = "Expense updated", body = FreeeExpense),
        (status = 400, description = "Unknown field or invalid value"),
        (status = 404, description = "Expense not found"),
        (status = 409, description = "Calculation period no longer accepts edits")
    ),
    tag = "Expense",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_expense(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> AppResult<impl Responder> {
    records::update::<Freee>(&pool, auth.user_id, path.into_inner(), &body, WHAT).await
}

#[utoipa::path(
    delete,
    path = "/api/freee-expenses/{expense_id}",
    params(
        ("expense_id", Path, description = "Expense ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Expense not found"),
        (status = 409, description = "Calculation period no longer accepts edits")
    ),
    tag = "Expense",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_expense(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> AppResult<impl Responder> {
    records::delete::<Freee>(&pool, auth.user_id, path.into_inner(), WHAT).await
}

#[utoipa::path(
    delete,
    path = "/api/freee-expenses",
    responses(
        (status = 200, description = "Expenses deleted", body = Object, example = json!({
            "message": "Deleted 12 expense records",
            "deleted_count": 12
        }))
    ),
    tag = "Expense",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_all_expenses(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> AppResult<impl Responder> {
    records::delete_all::<Freee>(&pool, auth.user_id, "expense").await
}

/// Import freee CSV
///
/// Employees are recognised by the `★<number>` prefix of the partner
/// name. Undecodable files fall back to lossy UTF-8.
#[utoipa::path(
    post,
    path = "/api/freee-expenses/import-csv",
    params(ImportQuery),
    request_body(content_type = "multipart/form-data", content = Object),
    responses(
        (status = 200, description = "Import outcome", body = ImportResponse),
        (status = 400, description = "Missing, empty or non-CSV file"),
        (status = 404, description = "Calculation period not found"),
        (status = 409, description = "Calculation period no longer accepts edits")
    ),
    tag = "Expense",
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
        freee::parse,
    )
    .await
}
