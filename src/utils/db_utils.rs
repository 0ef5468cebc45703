use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use sqlx::MySqlConnection;

use crate::duration::WorkDuration;
use crate::error::AppError;

/// How a patchable column accepts JSON input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Int,
    Id,
    Decimal,
    Bool,
    Date,
    /// Work time, stored as canonical `H:MM`.
    Duration,
}

/// Columns a partial update may touch, with their kinds.
pub type Patchable = &'static [(&'static str, ColumnKind)];

/// SQL bindable value
#[derive(Debug, PartialEq)]
pub enum SqlValue {
    String(String),
    I64(i64),
    U64(u64),
    Decimal(Decimal),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Build `UPDATE table SET ... WHERE id = ?` from a JSON object.
///
/// Keys outside `columns` are rejected, as are values that do not fit the
/// column kind. `null` clears nullable columns.
pub fn build_update_sql(
    table: &str,
    payload: &Value,
    columns: Patchable,
    id: u64,
) -> Result<SqlUpdate, AppError> {
    let obj = payload
        .as_object()
        .ok_or_else(|| AppError::BadRequest("Payload must be a JSON object".into()))?;

    if obj.is_empty() {
        return Err(AppError::BadRequest("No fields provided for update".into()));
    }

    let mut assigns = Vec::with_capacity(obj.len());
    let mut values = Vec::with_capacity(obj.len() + 1);

    for (key, value) in ordered(obj) {
        let Some((column, kind)) = columns.iter().find(|(c, _)| *c == key) else {
            return Err(AppError::BadRequest(format!("Field {key} cannot be updated")));
        };
        assigns.push(format!("{column} = ?"));
        values.push(convert(column, *kind, value)?);
    }

    values.push(SqlValue::U64(id));

    Ok(SqlUpdate {
        sql: format!("UPDATE {table} SET {} WHERE id = ?", assigns.join(", ")),
        values,
    })
}

fn ordered(obj: &Map<String, Value>) -> Vec<(&str, &Value)> {
    let mut entries: Vec<_> = obj.iter().map(|(k, v)| (k.as_str(), v)).collect();
    entries.sort_by_key(|(k, _)| *k);
    entries
}

fn convert(column: &str, kind: ColumnKind, value: &Value) -> Result<SqlValue, AppError> {
    let invalid = || AppError::BadRequest(format!("Invalid value for {column}"));

    if value.is_null() {
        return Ok(SqlValue::Null);
    }

    let converted = match kind {
        ColumnKind::Text => SqlValue::String(value.as_str().ok_or_else(invalid)?.to_string()),
        ColumnKind::Int => SqlValue::I64(value.as_i64().ok_or_else(invalid)?),
        ColumnKind::Id => SqlValue::U64(value.as_u64().ok_or_else(invalid)?),
        ColumnKind::Bool => SqlValue::Bool(value.as_bool().ok_or_else(invalid)?),
        ColumnKind::Decimal => {
            let d = match value {
                Value::String(s) => Decimal::from_str(s.trim()).map_err(|_| invalid())?,
                Value::Number(n) => Decimal::from_str(&n.to_string()).map_err(|_| invalid())?,
                _ => return Err(invalid()),
            };
            SqlValue::Decimal(d)
        }
        ColumnKind::Date => {
            let s = value.as_str().ok_or_else(invalid)?;
            SqlValue::Date(NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| invalid())?)
        }
        ColumnKind::Duration => {
            let s = value.as_str().ok_or_else(invalid)?;
            let d: WorkDuration = s.trim().parse().map_err(|_| invalid())?;
            SqlValue::String(d.to_string())
        }
    };
    Ok(converted)
}

/// Execute the update, returning rows affected.
pub async fn execute_update(
    conn: &mut MySqlConnection,
    update: SqlUpdate,
) -> Result<u64, sqlx::Error> {
    tracing::debug!(sql = %update.sql, "Executing partial update");
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::U64(v) => query.bind(v),
            SqlValue::Decimal(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(conn).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    const COLUMNS: Patchable = &[
        ("employee_name", ColumnKind::Text),
        ("work_days", ColumnKind::Int),
        ("paid_leave_used", ColumnKind::Decimal),
        ("total_work_time", ColumnKind::Duration),
        ("period_start", ColumnKind::Date),
        ("employee_id", ColumnKind::Id),
    ];

    /// Value bound for `column`, if the update sets it.
    fn value_of<'a>(update: &'a SqlUpdate, column: &str) -> Option<&'a SqlValue> {
        let set = update.sql.split(" WHERE ").next()?;
        let set = set.split(" SET ").nth(1)?;
        set.split(", ")
            .position(|assign| assign.strip_suffix(" = ?") == Some(column))
            .and_then(|i| update.values.get(i))
    }

    #[test]
    fn builds_statement_for_allowed_columns() {
        let update = build_update_sql(
            "attendance_records",
            &json!({"work_days": 21, "employee_name": "Hanako"}),
            COLUMNS,
            9,
        )
        .unwrap();
        assert_eq!(
            update.sql,
            "UPDATE attendance_records SET employee_name = ?, work_days = ? WHERE id = ?"
        );
        assert_eq!(update.values.last(), Some(&SqlValue::U64(9)));
        assert_eq!(value_of(&update, "work_days"), Some(&SqlValue::I64(21)));
    }

    #[test]
    fn durations_are_normalized() {
        let update =
            build_update_sql("t", &json!({"total_work_time": "142:02:00"}), COLUMNS, 1).unwrap();
        assert_eq!(
            value_of(&update, "total_work_time"),
            Some(&SqlValue::String("142:02".into()))
        );
    }

    #[test]
    fn bad_durations_are_rejected() {
        let err = build_update_sql("t", &json!({"total_work_time": "-3:00"}), COLUMNS, 1);
        assert!(matches!(err, Err(AppError::BadRequest(_))));

        let err = build_update_sql(
            "t",
            &json!({"total_work_time": "18446744073709551615:00"}),
            COLUMNS,
            1,
        );
        assert!(matches!(err, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn decimals_accept_numbers_and_strings() {
        let a = build_update_sql("t", &json!({"paid_leave_used": 1.5}), COLUMNS, 1).unwrap();
        let b = build_update_sql("t", &json!({"paid_leave_used": "1.5"}), COLUMNS, 1).unwrap();
        assert_eq!(value_of(&a, "paid_leave_used"), Some(&SqlValue::Decimal(dec!(1.5))));
        assert_eq!(a.values, b.values);
    }

    #[test]
    fn null_clears_a_column() {
        let update = build_update_sql("t", &json!({"employee_id": null}), COLUMNS, 1).unwrap();
        assert_eq!(value_of(&update, "employee_id"), Some(&SqlValue::Null));
    }

    #[test]
    fn unknown_or_empty_payloads_are_rejected() {
        assert!(build_update_sql("t", &json!({"id": 4}), COLUMNS, 1).is_err());
        assert!(build_update_sql("t", &json!({}), COLUMNS, 1).is_err());
        assert!(build_update_sql("t", &json!([1]), COLUMNS, 1).is_err());
        assert!(build_update_sql("t", &json!({"period_start": "2025/01/01"}), COLUMNS, 1).is_err());
    }
}
