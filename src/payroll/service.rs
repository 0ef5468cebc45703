use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use actix_web::web;
use anyhow::{Context, anyhow, bail};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::repository::{periods, templates};

use super::aggregator::{WorkDataSummary, load_summaries};
use super::filler::fill_template;

/// Output names carry the generation time in Japan Standard Time.
const JST_OFFSET_HOURS: i64 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Success,
    Error,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(
    example = json!({
        "status": "success",
        "messages": [],
        "file_name": "payroll_2025_01_20250205093000.xlsx",
        "download_url": "/api/payroll/download/payroll_2025_01_20250205093000.xlsx"
    })
)]
pub struct PayrollGenerationResult {
    pub status: GenerationStatus,
    pub messages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl PayrollGenerationResult {
    fn failed(message: String) -> Self {
        Self {
            status: GenerationStatus::Error,
            messages: vec![message],
            file_name: None,
            download_url: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == GenerationStatus::Success
    }
}

/// `payroll_<year>_<MM>_<YYYYMMDDHHMMSS>.xlsx`, timestamp in UTC+9.
pub fn output_file_name(year: i32, month: u32, now: DateTime<Utc>) -> String {
    let local = now + Duration::hours(JST_OFFSET_HOURS);
    format!("payroll_{year}_{month:02}_{}.xlsx", local.format("%Y%m%d%H%M%S"))
}

/// Only bare `.xlsx` names may be served from the output directory.
pub fn validate_download_name(file_name: &str) -> AppResult<()> {
    if file_name.contains("..") || file_name.contains('/') || file_name.contains('\\') {
        return Err(AppError::BadRequest("Invalid file name".into()));
    }
    if !file_name.ends_with(".xlsx") {
        return Err(AppError::BadRequest("Only .xlsx files can be downloaded".into()));
    }
    Ok(())
}

pub fn write_output(dir: &Path, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, bytes)?;
    Ok(path)
}

#[derive(Clone)]
pub struct PayrollService {
    pool: MySqlPool,
    output_dir: PathBuf,
    download_base: String,
}

impl PayrollService {
    /// `download_base` is the public path that serves generated files.
    pub fn new(pool: MySqlPool, output_dir: impl Into<PathBuf>, download_base: &str) -> Self {
        Self {
            pool,
            output_dir: output_dir.into(),
            download_base: download_base.trim_end_matches('/').to_string(),
        }
    }

    pub async fn work_data_summary(&self, calculation_period_id: u64) -> AppResult<Vec<WorkDataSummary>> {
        let mut conn = self.pool.acquire().await?;
        periods::get(&mut conn, calculation_period_id).await?;
        load_summaries(&mut conn, calculation_period_id).await
    }

    /// Fill the owner's template for the period and save the result.
    /// Failures are reported in the returned value, never as `Err`.
    pub async fn generate(
        &self,
        calculation_period_id: u64,
        template_id: u64,
        owner_id: u64,
    ) -> PayrollGenerationResult {
        match self.try_generate(calculation_period_id, template_id, owner_id).await {
            Ok(file_name) => {
                info!(file_name = %file_name, calculation_period_id, "Payroll workbook generated");
                PayrollGenerationResult {
                    status: GenerationStatus::Success,
                    messages: Vec::new(),
                    download_url: Some(format!("{}/{}", self.download_base, file_name)),
                    file_name: Some(file_name),
                }
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), calculation_period_id, template_id, "Payroll generation failed");
                PayrollGenerationResult::failed(e.to_string())
            }
        }
    }

    async fn try_generate(
        &self,
        calculation_period_id: u64,
        template_id: u64,
        owner_id: u64,
    ) -> anyhow::Result<String> {
        let mut conn = self.pool.acquire().await?;

        let Some(period) = periods::find(&mut conn, calculation_period_id).await? else {
            bail!("Calculation period not found");
        };

        let template = templates::find_owned(&mut conn, template_id, owner_id)
            .await?
            .filter(|t| t.is_active)
            .ok_or_else(|| anyhow!("Template not found"))?;

        let summaries = load_summaries(&mut conn, calculation_period_id).await?;
        if summaries.is_empty() {
            bail!("No work data found for {}", period.period_name);
        }
        drop(conn);

        info!(
            template = %template.name,
            size = template.file_data.len(),
            employees = summaries.len(),
            "Loaded payroll template"
        );

        let file_name = output_file_name(period.year, period.month, Utc::now());
        let dir = self.output_dir.clone();
        let name = file_name.clone();

        let saved = web::block(move || -> anyhow::Result<PathBuf> {
            let bytes = fill_template(&template.file_data, &summaries)
                .context("Failed to read the template file")?;
            write_output(&dir, &name, &bytes).context("Failed to save the generated file")
        })
        .await
        .map_err(|e| anyhow!("Report generation was interrupted: {e}"))??;

        info!(path = %saved.display(), "Saved payroll workbook");
        Ok(file_name)
    }

    /// Bytes of a generated file; 404 when it does not exist.
    pub async fn read_output(&self, file_name: &str) -> AppResult<Vec<u8>> {
        validate_download_name(file_name)?;
        let path = self.output_dir.join(file_name);
        let bytes = web::block(move || fs::read(path)).await?;
        match bytes {
            Ok(b) => Ok(b),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(AppError::not_found("File")),
            Err(e) => Err(e.into()),
        }
    }
}
