use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const FREEE_SOURCE: &str = "freee_csv";

/// An expense line exported from the freee expense system.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct FreeeExpense {
    pub id: u64,
    pub calculation_period_id: u64,
    pub employee_id: Option<u64>,
    pub income_expense_type: String,
    pub management_number: Option<String>,
    pub occurrence_date: Option<NaiveDate>,
    pub payment_due_date: Option<NaiveDate>,
    /// Vendor field; employees are encoded as `★<number><name>`.
    #[schema(example = "★1001Hanako Yamada")]
    pub partner_name: String,
    pub account_item: String,
    pub tax_classification: String,
    pub amount: Decimal,
    pub tax_calculation_type: String,
    pub tax_amount: Decimal,
    pub notes: Option<String>,
    pub item_name: Option<String>,
    pub department: Option<String>,
    pub memo_tags: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub payment_account: Option<String>,
    pub payment_amount: Option<Decimal>,
    pub employee_number: Option<String>,
    pub data_source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewFreeeExpense {
    pub calculation_period_id: u64,
    pub employee_id: Option<u64>,
    #[serde(default)]
    pub income_expense_type: String,
    pub management_number: Option<String>,
    pub occurrence_date: Option<NaiveDate>,
    pub payment_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub partner_name: String,
    #[serde(default)]
    pub account_item: String,
    #[serde(default)]
    pub tax_classification: String,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub tax_calculation_type: String,
    #[serde(default)]
    pub tax_amount: Decimal,
    pub notes: Option<String>,
    pub item_name: Option<String>,
    pub department: Option<String>,
    pub memo_tags: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub payment_account: Option<String>,
    pub payment_amount: Option<Decimal>,
    pub employee_number: Option<String>,
}
