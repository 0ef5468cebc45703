use sqlx::MySqlConnection;

use crate::error::{AppError, AppResult};
use crate::model::employee::{Employee, NewEmployee};
use crate::utils::db_utils::{ColumnKind, Patchable, build_update_sql, execute_update};

pub const PATCHABLE: Patchable = &[
    ("employee_number", ColumnKind::Text),
    ("name", ColumnKind::Text),
    ("hire_date", ColumnKind::Date),
    ("resignation_date", ColumnKind::Date),
    ("kincone_name", ColumnKind::Text),
    ("freee_name", ColumnKind::Text),
    ("kiwi_name", ColumnKind::Text),
    ("remote_allowance", ColumnKind::Bool),
    ("is_active", ColumnKind::Bool),
];

pub async fn list_owned(conn: &mut MySqlConnection, owner_id: u64) -> AppResult<Vec<Employee>> {
    let rows = sqlx::query_as::<_, Employee>(
        "SELECT * FROM employees WHERE user_id = ? ORDER BY id",
    )
    .bind(owner_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

/// Active employees of every owner, for report aggregation.
pub async fn list_active(conn: &mut MySqlConnection) -> AppResult<Vec<Employee>> {
    let rows = sqlx::query_as::<_, Employee>(
        "SELECT * FROM employees WHERE is_active = TRUE ORDER BY id",
    )
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

pub async fn find(conn: &mut MySqlConnection, id: u64) -> AppResult<Option<Employee>> {
    let row = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// 404 when missing, 403 when another user owns it.
pub async fn get_owned(
    conn: &mut MySqlConnection,
    id: u64,
    owner_id: u64,
) -> AppResult<Employee> {
    let employee = find(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found("Employee"))?;
    if employee.user_id != owner_id {
        return Err(AppError::forbidden());
    }
    Ok(employee)
}

/// Ownership check for a record's optional employee link. Unlinked rows
/// are visible to everyone.
pub async fn ensure_link_owned(
    conn: &mut MySqlConnection,
    employee_id: Option<u64>,
    owner_id: u64,
) -> AppResult<()> {
    match employee_id {
        Some(id) => get_owned(conn, id, owner_id).await.map(|_| ()),
        None => Ok(()),
    }
}

pub async fn number_taken(
    conn: &mut MySqlConnection,
    owner_id: u64,
    employee_number: &str,
    except_id: Option<u64>,
) -> AppResult<bool> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM employees
        WHERE user_id = ? AND employee_number = ? AND id <> ?
        "#,
    )
    .bind(owner_id)
    .bind(employee_number)
    .bind(except_id.unwrap_or(0))
    .fetch_one(conn)
    .await?;
    Ok(count > 0)
}

pub async fn insert(
    conn: &mut MySqlConnection,
    owner_id: u64,
    new: &NewEmployee,
) -> AppResult<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO employees
        (user_id, employee_number, name, hire_date, resignation_date,
         kincone_name, freee_name, kiwi_name, remote_allowance, is_active)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(owner_id)
    .bind(new.employee_number.trim())
    .bind(&new.name)
    .bind(new.hire_date)
    .bind(new.resignation_date)
    .bind(&new.kincone_name)
    .bind(&new.freee_name)
    .bind(&new.kiwi_name)
    .bind(new.remote_allowance)
    .bind(new.is_active)
    .execute(conn)
    .await?;
    Ok(result.last_insert_id())
}

pub async fn update(
    conn: &mut MySqlConnection,
    id: u64,
    payload: &serde_json::Value,
) -> AppResult<u64> {
    let update = build_update_sql("employees", payload, PATCHABLE, id)?;
    Ok(execute_update(conn, update).await?)
}

pub async fn delete(conn: &mut MySqlConnection, id: u64) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
