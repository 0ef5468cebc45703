use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const KINCONE_SOURCE: &str = "kincone_csv";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct KinconeTransportation {
    pub id: u64,
    pub calculation_period_id: u64,
    pub employee_id: Option<u64>,
    pub employee_number: String,
    pub employee_name: String,
    pub usage_date: Option<NaiveDate>,
    pub departure: String,
    pub destination: String,
    pub transportation_type: Option<String>,
    pub amount: Decimal,
    pub usage_count: i32,
    pub route_info: Option<String>,
    pub purpose: Option<String>,
    #[schema(example = "pending")]
    pub approval_status: String,
    pub data_source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewKinconeTransportation {
    pub calculation_period_id: u64,
    pub employee_id: Option<u64>,
    #[serde(default)]
    pub employee_number: String,
    #[serde(default)]
    pub employee_name: String,
    pub usage_date: Option<NaiveDate>,
    #[serde(default)]
    pub departure: String,
    #[serde(default)]
    pub destination: String,
    pub transportation_type: Option<String>,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default = "default_usage_count")]
    pub usage_count: i32,
    pub route_info: Option<String>,
    pub purpose: Option<String>,
    #[serde(default = "default_approval_status")]
    pub approval_status: String,
}

fn default_usage_count() -> i32 {
    1
}

fn default_approval_status() -> String {
    "pending".to_string()
}
