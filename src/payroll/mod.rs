//! Work-data aggregation and spreadsheet report generation.

pub mod aggregator;
pub mod filler;
pub mod service;
pub mod template;

pub use aggregator::WorkDataSummary;
pub use service::{PayrollGenerationResult, PayrollService};
