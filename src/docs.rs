use crate::api::calculation_periods::{CreatePeriod, PeriodCheck, UpdatePeriod};
use crate::api::payroll::GeneratePayroll;
use crate::csv_import::ImportResponse;
use crate::model::attendance_record::{AttendanceRecord, NewAttendanceRecord};
use crate::model::calculation_period::{CalculationPeriod, PeriodStatus};
use crate::model::employee::{Employee, NewEmployee};
use crate::model::excel_template::ExcelTemplateSummary;
use crate::model::freee_expense::{FreeeExpense, NewFreeeExpense};
use crate::model::kincone_transportation::{KinconeTransportation, NewKinconeTransportation};
use crate::payroll::WorkDataSummary;
use crate::payroll::service::{GenerationStatus, PayrollGenerationResult};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll Report API",
        version = "1.0.0",
        description = r#"
## Payroll Data Aggregation

Collects monthly work data from three external exports and fills a
company payroll workbook with it.

### Sources
- **Attendance** CSV: work days, work-time totals, leave and absence
- **freee** expense CSV: reimbursable expenses, one line per receipt
- **kincone** transportation CSV: commuting and travel fee totals

### Flow
1. Start a calculation period for the month
2. Import the three CSV exports into it
3. Upload the payroll workbook template
4. Generate the filled workbook and download it

### Security
Every endpoint requires a **JWT Bearer** access token.
"#,
    ),
    paths(
        crate::api::calculation_periods::list_periods,
        crate::api::calculation_periods::current_period,
        crate::api::calculation_periods::get_period,
        crate::api::calculation_periods::create_period,
        crate::api::calculation_periods::update_period,
        crate::api::calculation_periods::delete_period,
        crate::api::calculation_periods::check_period,
        crate::api::calculation_periods::start_calculation,

        crate::api::employees::list_employees,
        crate::api::employees::get_employee,
        crate::api::employees::create_employee,
        crate::api::employees::update_employee,
        crate::api::employees::delete_employee,

        crate::api::attendance_records::list_records,
        crate::api::attendance_records::get_record,
        crate::api::attendance_records::create_record,
        crate::api::attendance_records::update_record,
        crate::api::attendance_records::delete_record,
        crate::api::attendance_records::delete_all_records,
        crate::api::attendance_records::import_csv,

        crate::api::freee_expenses::list_expenses,
        crate::api::freee_expenses::get_expense,
        crate::api::freee_expenses::create_expense,
        crate::api::freee_expenses::update_expense,
        crate::api::freee_expenses::delete_expense,
        crate::api::freee_expenses::delete_all_expenses,
        crate::api::freee_expenses::import_csv,

        crate::api::kincone_transportation::list_transportation,
        crate::api::kincone_transportation::get_transportation,
        crate::api::kincone_transportation::create_transportation,
        crate::api::kincone_transportation::update_transportation,
        crate::api::kincone_transportation::delete_transportation,
        crate::api::kincone_transportation::delete_all_transportation,
        crate::api::kincone_transportation::import_csv,

        crate::api::excel_templates::list_templates,
        crate::api::excel_templates::upload_template,
        crate::api::excel_templates::download_template,
        crate::api::excel_templates::delete_template,

        crate::api::payroll::generate,
        crate::api::payroll::work_data_summary,
        crate::api::payroll::download
    ),
    components(
        schemas(
            CalculationPeriod,
            PeriodStatus,
            CreatePeriod,
            UpdatePeriod,
            PeriodCheck,
            Employee,
            NewEmployee,
            AttendanceRecord,
            NewAttendanceRecord,
            FreeeExpense,
            NewFreeeExpense,
            KinconeTransportation,
            NewKinconeTransportation,
            ImportResponse,
            ExcelTemplateSummary,
            GeneratePayroll,
            GenerationStatus,
            PayrollGenerationResult,
            WorkDataSummary
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Calculation Period", description = "Monthly payroll cycles"),
        (name = "Employee", description = "Employee master data"),
        (name = "Attendance", description = "Attendance records and CSV import"),
        (name = "Expense", description = "freee expenses and CSV import"),
        (name = "Transportation", description = "kincone transportation fees and CSV import"),
        (name = "Template", description = "Payroll workbook templates"),
        (name = "Payroll", description = "Work data summary and workbook generation"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
