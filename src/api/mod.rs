pub mod attendance_records;
pub mod calculation_periods;
pub mod employees;
pub mod excel_templates;
pub mod freee_expenses;
pub mod kincone_transportation;
pub mod payroll;
pub mod records;
pub mod upload;
