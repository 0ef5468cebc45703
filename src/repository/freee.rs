use rust_decimal::Decimal;
use sqlx::MySqlConnection;

use crate::csv_import::Insertable;
use crate::error::AppResult;
use crate::model::freee_expense::{FREEE_SOURCE, FreeeExpense, NewFreeeExpense};
use crate::utils::db_utils::{ColumnKind, Patchable};

use super::RecordTable;

pub struct Freee;

impl RecordTable for Freee {
    const TABLE: &'static str = "freee_expenses";
    const PATCHABLE: Patchable = &[
        ("employee_id", ColumnKind::Id),
        ("income_expense_type", ColumnKind::Text),
        ("management_number", ColumnKind::Text),
        ("occurrence_date", ColumnKind::Date),
        ("payment_due_date", ColumnKind::Date),
        ("partner_name", ColumnKind::Text),
        ("account_item", ColumnKind::Text),
        ("tax_classification", ColumnKind::Text),
        ("amount", ColumnKind::Decimal),
        ("tax_calculation_type", ColumnKind::Text),
        ("tax_amount", ColumnKind::Decimal),
        ("notes", ColumnKind::Text),
        ("item_name", ColumnKind::Text),
        ("department", ColumnKind::Text),
        ("memo_tags", ColumnKind::Text),
        ("payment_date", ColumnKind::Date),
        ("payment_account", ColumnKind::Text),
        ("payment_amount", ColumnKind::Decimal),
        ("employee_number", ColumnKind::Text),
    ];
    type Row = FreeeExpense;
}

impl Insertable for NewFreeeExpense {
    async fn insert(&self, conn: &mut MySqlConnection) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO freee_expenses
            (calculation_period_id, employee_id, income_expense_type, management_number,
             occurrence_date, payment_due_date, partner_name, account_item,
             tax_classification, amount, tax_calculation_type, tax_amount,
             notes, item_name, department, memo_tags,
             payment_date, payment_account, payment_amount, employee_number, data_source)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(self.calculation_period_id)
        .bind(self.employee_id)
        .bind(&self.income_expense_type)
        .bind(&self.management_number)
        .bind(self.occurrence_date)
        .bind(self.payment_due_date)
        .bind(&self.partner_name)
        .bind(&self.account_item)
        .bind(&self.tax_classification)
        .bind(self.amount)
        .bind(&self.tax_calculation_type)
        .bind(self.tax_amount)
        .bind(&self.notes)
        .bind(&self.item_name)
        .bind(&self.department)
        .bind(&self.memo_tags)
        .bind(self.payment_date)
        .bind(&self.payment_account)
        .bind(self.payment_amount)
        .bind(&self.employee_number)
        .bind(FREEE_SOURCE)
        .execute(conn)
        .await?;
        Ok(result.last_insert_id())
    }
}

/// `(employee_id, amount)` for every linked expense line of the period.
pub async fn amounts_for_period(
    conn: &mut MySqlConnection,
    calculation_period_id: u64,
) -> AppResult<Vec<(u64, Decimal)>> {
    let rows = sqlx::query_as::<_, (u64, Decimal)>(
        r#"
        SELECT employee_id, amount FROM freee_expenses
        WHERE calculation_period_id = ? AND employee_id IS NOT NULL
        ORDER BY id
        "#,
    )
    .bind(calculation_period_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}
