use crate::matcher::find_employee;
use crate::model::attendance_record::NewAttendanceRecord;
use crate::model::employee::Employee;

use crate::error::AppResult;

use super::fields::{Aliases, parse_date, parse_decimal, parse_duration, parse_int};
use super::{ImportBatch, parse_rows};

pub const EMPLOYEE_NUMBER: Aliases = &["従業員番号", "Employee Number"];
pub const EMPLOYEE_NAME: Aliases = &["従業員名", "Employee Name"];
pub const PERIOD_START: Aliases = &["集計開始日", "Period Start"];
pub const PERIOD_END: Aliases = &["集計終了日", "Period End"];
pub const WORK_DAYS: Aliases = &["勤務日数", "Work Days"];
pub const TOTAL_WORK_TIME: Aliases = &["総労働時間", "Total Work Time"];
pub const REGULAR_WORK_TIME: Aliases = &["所定労働時間", "Regular Work Time"];
pub const ACTUAL_WORK_TIME: Aliases = &["実労働時間", "Actual Work Time"];
pub const OVERTIME_WORK_TIME: Aliases = &["時間外労働時間", "Overtime Work Time"];
pub const LATE_NIGHT_WORK_TIME: Aliases = &["深夜労働時間", "Late Night Work Time"];
pub const HOLIDAY_WORK_TIME: Aliases = &["休日労働時間", "Holiday Work Time"];
pub const PAID_LEAVE_USED: Aliases = &["有給取得日数", "Paid Leave Used"];
pub const PAID_LEAVE_REMAINING: Aliases = &["有給残日数", "Paid Leave Remaining"];
pub const ABSENCE_DAYS: Aliases = &["欠勤日数", "Absence Days"];
pub const TARDINESS_COUNT: Aliases = &["遅刻回数", "Tardiness Count"];
pub const EARLY_LEAVE_COUNT: Aliases = &["早退回数", "Early Leave Count"];

/// Parse an attendance export. Rows whose employee number matches none of
/// `employees` are kept with no employee link.
pub fn parse(
    text: &str,
    calculation_period_id: u64,
    employees: &[Employee],
) -> AppResult<ImportBatch<NewAttendanceRecord>> {
    parse_rows(text, |row| {
        let employee_number = row.get_trimmed(EMPLOYEE_NUMBER);
        let employee_id = find_employee(employees, &employee_number).map(|e| e.id);

        Ok(NewAttendanceRecord {
            calculation_period_id,
            employee_id,
            employee_name: row.get_trimmed(EMPLOYEE_NAME),
            employee_number,
            period_start: parse_date(row.get(PERIOD_START)),
            period_end: parse_date(row.get(PERIOD_END)),
            work_days: Some(parse_int(row.get(WORK_DAYS))),
            total_work_time: parse_duration(row.get(TOTAL_WORK_TIME)),
            regular_work_time: parse_duration(row.get(REGULAR_WORK_TIME)),
            actual_work_time: parse_duration(row.get(ACTUAL_WORK_TIME)),
            overtime_work_time: parse_duration(row.get(OVERTIME_WORK_TIME)),
            late_night_work_time: parse_duration(row.get(LATE_NIGHT_WORK_TIME)),
            holiday_work_time: parse_duration(row.get(HOLIDAY_WORK_TIME)),
            paid_leave_used: Some(parse_decimal(row.get(PAID_LEAVE_USED))),
            paid_leave_remaining: Some(parse_decimal(row.get(PAID_LEAVE_REMAINING))),
            absence_days: parse_int(row.get(ABSENCE_DAYS)),
            tardiness_count: parse_int(row.get(TARDINESS_COUNT)),
            early_leave_count: parse_int(row.get(EARLY_LEAVE_COUNT)),
            raw_data: Some(row.to_json()),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::tests::employee;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const HEADER: &str = "従業員番号,従業員名,集計開始日,集計終了日,勤務日数,総労働時間,深夜労働時間,有給取得日数,欠勤日数";

    #[test]
    fn parses_japanese_export() {
        let text = format!("{HEADER}\n007,山田花子,2025/01/01,2025-01-31,20,142:02:00,3:30,1.5,0\n");
        let staff = vec![employee(11, "7")];
        let batch = parse(&text, 3, &staff).unwrap();
        assert!(batch.is_clean());

        let (line, rec) = &batch.records[0];
        assert_eq!(*line, 2);
        assert_eq!(rec.calculation_period_id, 3);
        assert_eq!(rec.employee_id, Some(11));
        assert_eq!(rec.employee_number, "007");
        assert_eq!(rec.employee_name, "山田花子");
        assert_eq!(rec.period_start, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(rec.period_end, NaiveDate::from_ymd_opt(2025, 1, 31));
        assert_eq!(rec.work_days, Some(20));
        assert_eq!(rec.total_work_time.as_deref(), Some("142:02"));
        assert_eq!(rec.late_night_work_time.as_deref(), Some("3:30"));
        assert_eq!(rec.holiday_work_time, None);
        assert_eq!(rec.paid_leave_used, Some(dec!(1.5)));
        assert_eq!(rec.paid_leave_remaining, Some(dec!(0)));
        assert_eq!(rec.raw_data.as_ref().unwrap()["従業員名"], "山田花子");
    }

    #[test]
    fn english_headers_are_accepted() {
        let text = "Employee Number,Employee Name,Work Days,Total Work Time\n1001,Hanako,18,120.5\n";
        let batch = parse(text, 1, &[]).unwrap();
        let (_, rec) = &batch.records[0];
        assert_eq!(rec.employee_id, None);
        assert_eq!(rec.work_days, Some(18));
        assert_eq!(rec.total_work_time.as_deref(), Some("120:30"));
    }

    #[test]
    fn unparseable_cells_fall_back_to_defaults() {
        let text = format!("{HEADER}\n1,a,someday,,n/a,-,later,x,y\n");
        let batch = parse(&text, 1, &[]).unwrap();
        let (_, rec) = &batch.records[0];
        assert_eq!(rec.period_start, None);
        assert_eq!(rec.work_days, Some(0));
        assert_eq!(rec.total_work_time, None);
        assert_eq!(rec.late_night_work_time, None);
        assert_eq!(rec.paid_leave_used, Some(dec!(0)));
        assert_eq!(rec.absence_days, 0);
    }

    #[test]
    fn short_and_trailing_comma_rows_still_import() {
        let text = "従業員番号,従業員名,勤務日数\n1,a,20,\n2,b\n3,c,18\n";
        let batch = parse(text, 1, &[]).unwrap();
        assert!(batch.is_clean(), "{:?}", batch.errors);
        assert_eq!(batch.records.len(), 3);

        let work_days: Vec<_> = batch.records.iter().map(|(_, r)| r.work_days).collect();
        assert_eq!(work_days, vec![Some(20), Some(0), Some(18)]);
        assert_eq!(batch.records[1].1.employee_name, "b");
    }

    #[test]
    fn oversized_durations_become_empty() {
        let text = format!("{HEADER}\n1,a,,,20,18446744073709551615:00,999999999999999 days 1:00,,\n");
        let batch = parse(&text, 1, &[]).unwrap();
        let (_, rec) = &batch.records[0];
        assert_eq!(rec.total_work_time, None);
        assert_eq!(rec.late_night_work_time, None);
    }
}
