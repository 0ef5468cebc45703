use actix_multipart::Multipart;
use actix_web::http::header::{CONTENT_TYPE, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{info, warn};

use crate::api::upload::read_form;
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::model::excel_template::{ExcelTemplateSummary, NewExcelTemplate, XLS_MIME, XLSX_MIME};
use crate::repository::templates;

fn is_spreadsheet(content_type: Option<&str>) -> bool {
    matches!(content_type, Some(XLSX_MIME) | Some(XLS_MIME))
}

pub(crate) fn attachment(file_name: &str) -> ContentDisposition {
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(file_name.to_string())],
    }
}

/// List Templates
///
/// The caller's templates, newest upload first.
#[utoipa::path(
    get,
    path = "/api/excel-templates",
    responses(
        (status = 200, description = "Template list without file contents", body = [ExcelTemplateSummary])
    ),
    tag = "Template",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_templates(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> AppResult<impl Responder> {
    let mut conn = pool.acquire().await?;
    let rows = templates::list_owned(&mut conn, auth.user_id).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Upload Template
///
/// Multipart fields `name`, optional `description`, and `file`
/// (`.xlsx` or `.xls`). Versions count up per user: `1.0`, `2.0`, ...
#[utoipa::path(
    post,
    path = "/api/excel-templates",
    request_body(content_type = "multipart/form-data", content = Object),
    responses(
        (status = 200, description = "Template stored", body = ExcelTemplateSummary),
        (status = 400, description = "Missing name or not an Excel file", body = Object, example = json!({
            "message": "Only Excel files (.xlsx or .xls) can be uploaded"
        }))
    ),
    tag = "Template",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_template(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: Multipart,
) -> AppResult<impl Responder> {
    let mut form = read_form(payload, config.max_upload_bytes).await?;
    let name = form
        .text("name")
        .ok_or_else(|| AppError::BadRequest("Template name is required".into()))?;
    let file = form.take_file("file")?;

    if !is_spreadsheet(file.content_type.as_deref()) {
        warn!(content_type = ?file.content_type, "Rejected template upload");
        return Err(AppError::BadRequest(
            "Only Excel files (.xlsx or .xls) can be uploaded".into(),
        ));
    }
    if file.bytes.is_empty() {
        return Err(AppError::BadRequest("Template file is empty".into()));
    }

    let new = NewExcelTemplate {
        name,
        description: form.text("description"),
        file_name: file.file_name.unwrap_or_else(|| "template.xlsx".to_string()),
        mime_type: file.content_type.unwrap_or_else(|| XLSX_MIME.to_string()),
        file_data: file.bytes,
    };

    let mut tx = pool.begin().await?;
    let id = templates::insert(&mut tx, auth.user_id, &new).await?;
    let stored = templates::find_summary(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("template {id} vanished after insert")))?;
    tx.commit().await?;

    info!(
        id,
        name = %stored.name,
        version = %stored.version,
        size = new.file_data.len(),
        user_id = auth.user_id,
        "Template uploaded"
    );
    Ok(HttpResponse::Ok().json(stored))
}

/// Download Template
#[utoipa::path(
    get,
    path = "/api/excel-templates/{template_id}/download",
    params(
        ("template_id", Path, description = "Template ID")
    ),
    responses(
        (status = 200, description = "Workbook bytes", content_type = "application/octet-stream"),
        (status = 404, description = "Template not found")
    ),
    tag = "Template",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download_template(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> AppResult<impl Responder> {
    let mut conn = pool.acquire().await?;
    let template = templates::find_owned(&mut conn, path.into_inner(), auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Template"))?;

    Ok(HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, template.mime_type))
        .insert_header(attachment(&template.file_name))
        .body(template.file_data))
}

/// Delete Template
#[utoipa::path(
    delete,
    path = "/api/excel-templates/{template_id}",
    params(
        ("template_id", Path, description = "Template ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Template deleted successfully"
        })),
        (status = 404, description = "Template not found")
    ),
    tag = "Template",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_template(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> AppResult<impl Responder> {
    let template_id = path.into_inner();
    let mut conn = pool.acquire().await?;
    if templates::delete_owned(&mut conn, template_id, auth.user_id).await? == 0 {
        return Err(AppError::not_found("Template"));
    }

    info!(template_id, user_id = auth.user_id, "Template deleted");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Template deleted successfully"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_excel_mime_types_are_accepted() {
        assert!(is_spreadsheet(Some(XLSX_MIME)));
        assert!(is_spreadsheet(Some(XLS_MIME)));
        assert!(!is_spreadsheet(Some("text/csv")));
        assert!(!is_spreadsheet(Some("application/octet-stream")));
        assert!(!is_spreadsheet(None));
    }

    #[test]
    fn attachment_header_carries_file_name() {
        let header = attachment("salary.xlsx");
        assert!(header.is_attachment());
        assert_eq!(header.get_filename(), Some("salary.xlsx"));
    }
}
