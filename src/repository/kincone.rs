use rust_decimal::Decimal;
use sqlx::MySqlConnection;

use crate::csv_import::Insertable;
use crate::error::AppResult;
use crate::model::kincone_transportation::{
    KINCONE_SOURCE, KinconeTransportation, NewKinconeTransportation,
};
use crate::utils::db_utils::{ColumnKind, Patchable};

use super::RecordTable;

pub struct Kincone;

impl RecordTable for Kincone {
    const TABLE: &'static str = "kincone_transportation";
    const PATCHABLE: Patchable = &[
        ("employee_id", ColumnKind::Id),
        ("employee_number", ColumnKind::Text),
        ("employee_name", ColumnKind::Text),
        ("usage_date", ColumnKind::Date),
        ("departure", ColumnKind::Text),
        ("destination", ColumnKind::Text),
        ("transportation_type", ColumnKind::Text),
        ("amount", ColumnKind::Decimal),
        ("usage_count", ColumnKind::Int),
        ("route_info", ColumnKind::Text),
        ("purpose", ColumnKind::Text),
        ("approval_status", ColumnKind::Text),
    ];
    type Row = KinconeTransportation;
}

impl Insertable for NewKinconeTransportation {
    async fn insert(&self, conn: &mut MySqlConnection) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO kincone_transportation
            (calculation_period_id, employee_id, employee_number, employee_name,
             usage_date, departure, destination, transportation_type,
             amount, usage_count, route_info, purpose, approval_status, data_source)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(self.calculation_period_id)
        .bind(self.employee_id)
        .bind(&self.employee_number)
        .bind(&self.employee_name)
        .bind(self.usage_date)
        .bind(&self.departure)
        .bind(&self.destination)
        .bind(&self.transportation_type)
        .bind(self.amount)
        .bind(self.usage_count)
        .bind(&self.route_info)
        .bind(&self.purpose)
        .bind(&self.approval_status)
        .bind(KINCONE_SOURCE)
        .execute(conn)
        .await?;
        Ok(result.last_insert_id())
    }
}

/// `(employee_id, amount)` for every linked transportation row of the period.
pub async fn amounts_for_period(
    conn: &mut MySqlConnection,
    calculation_period_id: u64,
) -> AppResult<Vec<(u64, Decimal)>> {
    let rows = sqlx::query_as::<_, (u64, Decimal)>(
        r#"
        SELECT employee_id, amount FROM kincone_transportation
        WHERE calculation_period_id = ? AND employee_id IS NOT NULL
        ORDER BY id
        "#,
    )
    .bind(calculation_period_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}
