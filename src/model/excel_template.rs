use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const XLS_MIME: &str = "application/vnd.ms-excel";

/// Listing view; the workbook bytes are only loaded on demand.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct ExcelTemplateSummary {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub template_type: Option<String>,
    pub file_name: String,
    pub file_size: Option<i64>,
    pub mime_type: String,
    #[schema(example = "2.0")]
    pub version: String,
    pub is_active: bool,
    pub created_by_user_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExcelTemplate {
    pub id: u64,
    pub name: String,
    pub file_name: String,
    pub file_data: Vec<u8>,
    pub mime_type: String,
    pub is_active: bool,
}

#[derive(Debug)]
pub struct NewExcelTemplate {
    pub name: String,
    pub description: Option<String>,
    pub file_name: String,
    pub file_data: Vec<u8>,
    pub mime_type: String,
}
