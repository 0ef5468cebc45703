use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "user_id": 1,
        "employee_number": "1001",
        "name": "Hanako Yamada",
        "hire_date": "2021-04-01",
        "resignation_date": null,
        "kincone_name": "Yamada Hanako",
        "freee_name": "★1001Yamada Hanako",
        "kiwi_name": "hanako",
        "remote_allowance": true,
        "is_active": true,
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    })
)]
pub struct Employee {
    pub id: u64,

    /// Owning user; every employee-bound query is scoped by it.
    pub user_id: u64,

    /// Human-assigned number shared by every source system.
    pub employee_number: String,

    pub name: String,

    pub hire_date: Option<NaiveDate>,

    pub resignation_date: Option<NaiveDate>,

    /// Display name in the transportation system.
    pub kincone_name: Option<String>,

    /// Display name in the expense system.
    pub freee_name: Option<String>,

    pub kiwi_name: Option<String>,

    pub remote_allowance: bool,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewEmployee {
    #[schema(example = "1001")]
    pub employee_number: String,
    #[schema(example = "Hanako Yamada")]
    pub name: String,
    #[schema(example = "2021-04-01", format = "date", value_type = Option<String>)]
    pub hire_date: Option<NaiveDate>,
    #[schema(format = "date", value_type = Option<String>)]
    pub resignation_date: Option<NaiveDate>,
    pub kincone_name: Option<String>,
    pub freee_name: Option<String>,
    pub kiwi_name: Option<String>,
    #[serde(default)]
    pub remote_allowance: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
