//! Handler bodies shared by the three imported record types. Each public
//! resource module wraps these with its own documented endpoints.

use actix_multipart::Multipart;
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::{info, warn};
use utoipa::IntoParams;

use crate::api::upload::read_form;
use crate::config::Config;
use crate::csv_import::{
    DecodeFallback, ImportBatch, Insertable, commit_batch, decode_upload, validate_upload,
};
use crate::error::{AppError, AppResult};
use crate::model::PeriodRecord;
use crate::model::employee::Employee;
use crate::repository::{
    RecordFilter, RecordTable, delete_all_records, delete_record, employees, find_record,
    list_records, periods, update_record,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImportQuery {
    pub calculation_period_id: u64,
}

pub async fn list<T>(pool: &MySqlPool, owner_id: u64, filter: &RecordFilter) -> AppResult<HttpResponse>
where
    T: RecordTable,
    T::Row: Serialize,
{
    let mut conn = pool.acquire().await?;
    let rows = list_records::<T>(&mut conn, owner_id, filter).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// The row, provided the caller may see it.
async fn load_visible<T>(conn: &mut sqlx::MySqlConnection, id: u64, owner_id: u64, what: &str) -> AppResult<T::Row>
where
    T: RecordTable,
    T::Row: PeriodRecord,
{
    let row = find_record::<T>(&mut *conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(what))?;
    employees::ensure_link_owned(conn, row.employee_id(), owner_id).await?;
    Ok(row)
}

pub async fn get<T>(pool: &MySqlPool, owner_id: u64, id: u64, what: &str) -> AppResult<HttpResponse>
where
    T: RecordTable,
    T::Row: PeriodRecord + Serialize,
{
    let mut conn = pool.acquire().await?;
    let row = load_visible::<T>(&mut conn, id, owner_id, what).await?;
    Ok(HttpResponse::Ok().json(row))
}

pub async fn create<T, N>(pool: &MySqlPool, owner_id: u64, new: &N, what: &str) -> AppResult<HttpResponse>
where
    T: RecordTable,
    T::Row: Serialize,
    N: Insertable + PeriodRecord,
{
    let mut tx = pool.begin().await?;
    periods::get_editable(&mut tx, new.calculation_period_id()).await?;
    employees::ensure_link_owned(&mut tx, new.employee_id(), owner_id).await?;

    let id = new.insert(&mut tx).await?;
    let row = find_record::<T>(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("{what} {id} vanished after insert")))?;
    tx.commit().await?;

    info!(table = T::TABLE, id, owner_id, "Record created");
    Ok(HttpResponse::Ok().json(row))
}

/// Partial update. The row's period must accept edits, and a new
/// employee link must point at one of the caller's employees.
pub async fn update<T>(
    pool: &MySqlPool,
    owner_id: u64,
    id: u64,
    payload: &Value,
    what: &str,
) -> AppResult<HttpResponse>
where
    T: RecordTable,
    T::Row: PeriodRecord + Serialize,
{
    let mut tx = pool.begin().await?;
    let existing = load_visible::<T>(&mut tx, id, owner_id, what).await?;
    periods::get_editable(&mut tx, existing.calculation_period_id()).await?;

    if let Some(link) = payload.get("employee_id").and_then(Value::as_u64) {
        employees::ensure_link_owned(&mut tx, Some(link), owner_id).await?;
    }

    update_record::<T>(&mut tx, id, payload).await?;
    let row = find_record::<T>(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::not_found(what))?;
    tx.commit().await?;

    info!(table = T::TABLE, id, owner_id, "Record updated");
    Ok(HttpResponse::Ok().json(row))
}

pub async fn delete<T>(pool: &MySqlPool, owner_id: u64, id: u64, what: &str) -> AppResult<HttpResponse>
where
    T: RecordTable,
    T::Row: PeriodRecord,
{
    let mut tx = pool.begin().await?;
    let existing = load_visible::<T>(&mut tx, id, owner_id, what).await?;
    periods::get_editable(&mut tx, existing.calculation_period_id()).await?;
    delete_record::<T>(&mut tx, id).await?;
    tx.commit().await?;

    info!(table = T::TABLE, id, owner_id, "Record deleted");
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("{what} deleted successfully")
    })))
}

pub async fn delete_all<T: RecordTable>(pool: &MySqlPool, owner_id: u64, what: &str) -> AppResult<HttpResponse> {
    let mut tx = pool.begin().await?;
    let deleted = delete_all_records::<T>(&mut tx, owner_id).await?;
    tx.commit().await?;

    warn!(table = T::TABLE, deleted, owner_id, "Bulk delete");
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Deleted {deleted} {what} records"),
        "deleted_count": deleted
    })))
}

/// Upload, decode, parse against the caller's employees, then commit the
/// batch all or nothing.
pub async fn import<N, F>(
    pool: &MySqlPool,
    config: &Config,
    owner_id: u64,
    calculation_period_id: u64,
    payload: Multipart,
    fallback: DecodeFallback,
    parse: F,
) -> AppResult<HttpResponse>
where
    N: Insertable,
    F: FnOnce(&str, u64, &[Employee]) -> AppResult<ImportBatch<N>>,
{
    let mut form = read_form(payload, config.max_upload_bytes).await?;
    let file = form.take_file("file")?;
    validate_upload(file.file_name.as_deref(), &file.bytes)?;

    let staff = {
        let mut conn = pool.acquire().await?;
        periods::get_editable(&mut conn, calculation_period_id).await?;
        employees::list_owned(&mut conn, owner_id).await?
    };

    let text = decode_upload(&file.bytes, fallback)?;
    let batch = parse(&text, calculation_period_id, &staff)?;
    info!(
        file = ?file.file_name,
        calculation_period_id,
        rows = batch.records.len(),
        errors = batch.errors.len(),
        "CSV parsed"
    );

    let response = commit_batch(pool, batch).await?;
    Ok(HttpResponse::Ok().json(response))
}
