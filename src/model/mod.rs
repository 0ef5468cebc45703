pub mod attendance_record;
pub mod calculation_period;
pub mod employee;
pub mod excel_template;
pub mod freee_expense;
pub mod kincone_transportation;

/// A row that belongs to one calculation period and, optionally, to one
/// employee.
pub trait PeriodRecord {
    fn calculation_period_id(&self) -> u64;
    fn employee_id(&self) -> Option<u64>;
}

macro_rules! period_record {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl PeriodRecord for $ty {
                fn calculation_period_id(&self) -> u64 {
                    self.calculation_period_id
                }

                fn employee_id(&self) -> Option<u64> {
                    self.employee_id
                }
            }
        )+
    };
}

period_record!(
    attendance_record::AttendanceRecord,
    attendance_record::NewAttendanceRecord,
    freee_expense::FreeeExpense,
    freee_expense::NewFreeeExpense,
    kincone_transportation::KinconeTransportation,
    kincone_transportation::NewKinconeTransportation,
);
