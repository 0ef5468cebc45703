use sqlx::MySqlConnection;

use crate::error::{AppError, AppResult};
use crate::model::calculation_period::{CalculationPeriod, PeriodStatus};

pub async fn list(conn: &mut MySqlConnection) -> AppResult<Vec<CalculationPeriod>> {
    let rows = sqlx::query_as::<_, CalculationPeriod>(
        "SELECT * FROM calculation_periods ORDER BY year DESC, month DESC",
    )
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

pub async fn find(conn: &mut MySqlConnection, id: u64) -> AppResult<Option<CalculationPeriod>> {
    let row = sqlx::query_as::<_, CalculationPeriod>("SELECT * FROM calculation_periods WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Like [`find`], but a missing period is a 404.
pub async fn get(conn: &mut MySqlConnection, id: u64) -> AppResult<CalculationPeriod> {
    find(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found("Calculation period"))
}

/// Like [`get`], but the period must still accept imports and edits.
pub async fn get_editable(conn: &mut MySqlConnection, id: u64) -> AppResult<CalculationPeriod> {
    let period = get(conn, id).await?;
    if !period.status.accepts_edits() {
        return Err(AppError::Conflict(format!(
            "Calculation period {} is {} and cannot be modified",
            period.period_name, period.status
        )));
    }
    Ok(period)
}

pub async fn find_by_month(
    conn: &mut MySqlConnection,
    year: i32,
    month: u32,
) -> AppResult<Option<CalculationPeriod>> {
    let row = sqlx::query_as::<_, CalculationPeriod>(
        "SELECT * FROM calculation_periods WHERE year = ? AND month = ?",
    )
    .bind(year)
    .bind(month)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn insert(
    conn: &mut MySqlConnection,
    year: i32,
    month: u32,
    period_name: &str,
    status: PeriodStatus,
) -> AppResult<u64> {
    let result = sqlx::query(
        "INSERT INTO calculation_periods (year, month, period_name, status) VALUES (?, ?, ?, ?)",
    )
    .bind(year)
    .bind(month)
    .bind(period_name)
    .bind(status.as_ref())
    .execute(conn)
    .await?;
    Ok(result.last_insert_id())
}

pub async fn update(
    conn: &mut MySqlConnection,
    id: u64,
    period_name: Option<&str>,
    status: Option<PeriodStatus>,
) -> AppResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE calculation_periods
        SET period_name = COALESCE(?, period_name),
            status = COALESCE(?, status)
        WHERE id = ?
        "#,
    )
    .bind(period_name)
    .bind(status.map(|s| s.as_ref().to_string()))
    .bind(id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete(conn: &mut MySqlConnection, id: u64) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM calculation_periods WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
