use sqlx::MySqlConnection;

use crate::error::AppResult;
use crate::model::excel_template::{ExcelTemplate, ExcelTemplateSummary, NewExcelTemplate};

const SUMMARY_COLUMNS: &str = "id, name, description, template_type, file_name, file_size, \
                               mime_type, version, is_active, created_by_user_id, created_at, updated_at";

pub async fn list_owned(
    conn: &mut MySqlConnection,
    owner_id: u64,
) -> AppResult<Vec<ExcelTemplateSummary>> {
    let sql = format!(
        "SELECT {SUMMARY_COLUMNS} FROM excel_templates WHERE created_by_user_id = ? ORDER BY id DESC"
    );
    let rows = sqlx::query_as::<_, ExcelTemplateSummary>(&sql)
        .bind(owner_id)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn find_summary(
    conn: &mut MySqlConnection,
    id: u64,
) -> AppResult<Option<ExcelTemplateSummary>> {
    let sql = format!("SELECT {SUMMARY_COLUMNS} FROM excel_templates WHERE id = ?");
    let row = sqlx::query_as::<_, ExcelTemplateSummary>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// The template with its workbook bytes, if `owner_id` owns it.
pub async fn find_owned(
    conn: &mut MySqlConnection,
    id: u64,
    owner_id: u64,
) -> AppResult<Option<ExcelTemplate>> {
    let row = sqlx::query_as::<_, ExcelTemplate>(
        r#"
        SELECT id, name, file_name, file_data, mime_type, is_active
        FROM excel_templates
        WHERE id = ? AND created_by_user_id = ?
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

/// Store a new template; its version is `N.0` where N counts the owner's
/// uploads including this one.
pub async fn insert(
    conn: &mut MySqlConnection,
    owner_id: u64,
    new: &NewExcelTemplate,
) -> AppResult<u64> {
    let existing: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM excel_templates WHERE created_by_user_id = ?")
            .bind(owner_id)
            .fetch_one(&mut *conn)
            .await?;

    let result = sqlx::query(
        r#"
        INSERT INTO excel_templates
        (name, description, template_type, file_name, file_data, file_size,
         mime_type, version, is_active, created_by_user_id)
        VALUES (?, ?, 'salary', ?, ?, ?, ?, ?, TRUE, ?)
        "#,
    )
    .bind(&new.name)
    .bind(&new.description)
    .bind(&new.file_name)
    .bind(&new.file_data)
    .bind(new.file_data.len() as i64)
    .bind(&new.mime_type)
    .bind(version_label(existing))
    .bind(owner_id)
    .execute(conn)
    .await?;
    Ok(result.last_insert_id())
}

pub async fn delete_owned(conn: &mut MySqlConnection, id: u64, owner_id: u64) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM excel_templates WHERE id = ? AND created_by_user_id = ?")
        .bind(id)
        .bind(owner_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

fn version_label(existing: i64) -> String {
    format!("{}.0", existing + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_upload_is_version_one() {
        assert_eq!(version_label(0), "1.0");
        assert_eq!(version_label(4), "5.0");
    }
}
