use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use crate::api::excel_templates::attachment;
use crate::auth::auth::AuthUser;
use crate::error::AppResult;
use crate::model::excel_template::XLSX_MIME;
use crate::payroll::{PayrollGenerationResult, PayrollService, WorkDataSummary};

#[derive(Debug, Deserialize, ToSchema)]
pub struct GeneratePayroll {
    #[schema(example = 3)]
    pub calculation_period_id: u64,
    #[schema(example = 1)]
    pub template_id: u64,
}

/// Generate Payroll Workbook
///
/// Fills the template with every active employee's work data for the
/// period. Failures come back as a structured result with status 400.
#[utoipa::path(
    post,
    path = "/api/payroll/generate",
    request_body = GeneratePayroll,
    responses(
        (status = 200, description = "Workbook generated", body = PayrollGenerationResult),
        (status = 400, description = "Generation failed", body = PayrollGenerationResult, example = json!({
            "status": "error",
            "messages": ["No work data found for 2025-01"]
        }))
    ),
    tag = "Payroll",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn generate(
    auth: AuthUser,
    service: web::Data<PayrollService>,
    payload: web::Json<GeneratePayroll>,
) -> impl Responder {
    info!(
        calculation_period_id = payload.calculation_period_id,
        template_id = payload.template_id,
        user = %auth.username,
        "Payroll generation requested"
    );
    let result = service
        .generate(payload.calculation_period_id, payload.template_id, auth.user_id)
        .await;

    if result.is_success() {
        HttpResponse::Ok().json(result)
    } else {
        HttpResponse::BadRequest().json(result)
    }
}

/// Work Data Summary
///
/// The per-employee figures a generated workbook would contain.
#[utoipa::path(
    get,
    path = "/api/payroll/work-data-summary/{calculation_period_id}",
    params(
        ("calculation_period_id", Path, description = "Calculation period ID")
    ),
    responses(
        (status = 200, description = "One summary per active employee", body = [WorkDataSummary]),
        (status = 404, description = "Calculation period not found")
    ),
    tag = "Payroll",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn work_data_summary(
    _auth: AuthUser,
    service: web::Data<PayrollService>,
    path: web::Path<u64>,
) -> AppResult<impl Responder> {
    let summaries = service.work_data_summary(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(summaries))
}

/// Download Generated Workbook
#[utoipa::path(
    get,
    path = "/api/payroll/download/{file_name}",
    params(
        ("file_name", Path, description = "Name returned by generate")
    ),
    responses(
        (status = 200, description = "Workbook bytes", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Invalid file name"),
        (status = 404, description = "File not found")
    ),
    tag = "Payroll",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download(
    _auth: AuthUser,
    service: web::Data<PayrollService>,
    path: web::Path<String>,
) -> AppResult<impl Responder> {
    let file_name = path.into_inner();
    let bytes = service.read_output(&file_name).await?;

    Ok(HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, XLSX_MIME))
        .insert_header(attachment(&file_name))
        .body(bytes))
}
