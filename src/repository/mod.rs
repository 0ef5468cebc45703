//! Explicit SQL over a MySQL connection. Every function takes
//! `&mut MySqlConnection`, so callers pass either a pooled connection or
//! an open transaction (`&mut *tx`).

pub mod attendance;
pub mod employees;
pub mod freee;
pub mod kincone;
pub mod periods;
pub mod templates;

use serde::Deserialize;
use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, MySqlConnection};
use tracing::debug;
use utoipa::IntoParams;

use crate::error::AppResult;
use crate::utils::db_utils::{Patchable, build_update_sql, execute_update};

const DEFAULT_LIMIT: u32 = 100;
const MAX_LIMIT: u32 = 1000;

/// Rows visible to a user: their employees' rows plus unlinked ones.
const OWNER_SCOPE: &str =
    "(employee_id IS NULL OR employee_id IN (SELECT id FROM employees WHERE user_id = ?))";

/// Listing filters shared by the imported record types.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecordFilter {
    pub calculation_period_id: Option<u64>,
    pub employee_id: Option<u64>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl RecordFilter {
    fn window(&self) -> (u32, u32) {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        (self.skip.unwrap_or(0), limit)
    }
}

/// A table of imported, period-bound, optionally employee-linked rows.
pub trait RecordTable {
    const TABLE: &'static str;
    const PATCHABLE: Patchable;
    type Row: for<'r> FromRow<'r, MySqlRow> + Send + Unpin;
}

pub async fn list_records<T: RecordTable>(
    conn: &mut MySqlConnection,
    owner_id: u64,
    filter: &RecordFilter,
) -> AppResult<Vec<T::Row>> {
    let mut conditions = vec![OWNER_SCOPE];
    if filter.calculation_period_id.is_some() {
        conditions.push("calculation_period_id = ?");
    }
    if filter.employee_id.is_some() {
        conditions.push("employee_id = ?");
    }

    let sql = format!(
        "SELECT * FROM {} WHERE {} ORDER BY id LIMIT ? OFFSET ?",
        T::TABLE,
        conditions.join(" AND ")
    );
    let (skip, limit) = filter.window();
    debug!(sql = %sql, ?filter, "Listing records");

    let mut query = sqlx::query_as::<_, T::Row>(&sql).bind(owner_id);
    if let Some(period_id) = filter.calculation_period_id {
        query = query.bind(period_id);
    }
    if let Some(employee_id) = filter.employee_id {
        query = query.bind(employee_id);
    }
    let rows = query
        .bind(i64::from(limit))
        .bind(i64::from(skip))
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn find_record<T: RecordTable>(
    conn: &mut MySqlConnection,
    id: u64,
) -> AppResult<Option<T::Row>> {
    let sql = format!("SELECT * FROM {} WHERE id = ?", T::TABLE);
    let row = sqlx::query_as::<_, T::Row>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Partial update from a JSON object, restricted to `T::PATCHABLE`.
pub async fn update_record<T: RecordTable>(
    conn: &mut MySqlConnection,
    id: u64,
    payload: &serde_json::Value,
) -> AppResult<u64> {
    let update = build_update_sql(T::TABLE, payload, T::PATCHABLE, id)?;
    Ok(execute_update(conn, update).await?)
}

pub async fn delete_record<T: RecordTable>(conn: &mut MySqlConnection, id: u64) -> AppResult<u64> {
    let sql = format!("DELETE FROM {} WHERE id = ?", T::TABLE);
    let result = sqlx::query(&sql).bind(id).execute(conn).await?;
    Ok(result.rows_affected())
}

/// Delete every row the owner can see, orphans included.
pub async fn delete_all_records<T: RecordTable>(
    conn: &mut MySqlConnection,
    owner_id: u64,
) -> AppResult<u64> {
    let sql = format!("DELETE FROM {} WHERE {}", T::TABLE, OWNER_SCOPE);
    let result = sqlx::query(&sql).bind(owner_id).execute(conn).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_window_is_bounded() {
        let f = RecordFilter::default();
        assert_eq!(f.window(), (0, DEFAULT_LIMIT));

        let f = RecordFilter {
            skip: Some(20),
            limit: Some(50_000),
            ..Default::default()
        };
        assert_eq!(f.window(), (20, MAX_LIMIT));

        let f = RecordFilter {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(f.window(), (0, 1));
    }
}
