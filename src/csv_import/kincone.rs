use crate::error::AppResult;
use crate::matcher::find_employee;
use crate::model::employee::Employee;
use crate::model::kincone_transportation::NewKinconeTransportation;

use super::fields::{Aliases, parse_date, parse_decimal, parse_int_or};
use super::{ImportBatch, parse_rows};

pub const EMPLOYEE_NUMBER: Aliases = &["従業員番号", "Employee Number"];
pub const EMPLOYEE_NAME: Aliases = &["従業員名", "Employee Name"];
pub const TRANSPORTATION_FEE: Aliases = &["交通費", "Transportation Fee"];
pub const COMMUTING_FEE: Aliases = &["通勤費", "Commuting Fee"];
pub const TOTAL_AMOUNT: Aliases = &["総額", "Total Amount"];
pub const PERIOD_START: Aliases = &["集計開始日", "Period Start"];
pub const PERIOD_END: Aliases = &["集計終了日", "Period End"];
pub const USAGE_COUNT: Aliases = &["利用件数", "Usage Count"];

/// The kincone export is a per-employee summary, not a trip log: the period
/// start becomes the usage date and the fee breakdown goes to `route_info`.
pub fn parse(
    text: &str,
    calculation_period_id: u64,
    employees: &[Employee],
) -> AppResult<ImportBatch<NewKinconeTransportation>> {
    parse_rows(text, |row| {
        let employee_number = row.get_trimmed(EMPLOYEE_NUMBER);
        let employee_id = find_employee(employees, &employee_number).map(|e| e.id);

        let transportation_fee = parse_decimal(row.get(TRANSPORTATION_FEE));
        let commuting_fee = parse_decimal(row.get(COMMUTING_FEE));
        let start = parse_date(row.get(PERIOD_START));
        let end = parse_date(row.get(PERIOD_END));

        let purpose = match (start, end) {
            (Some(s), Some(e)) => Some(format!("{s} - {e}")),
            _ => None,
        };

        Ok(NewKinconeTransportation {
            calculation_period_id,
            employee_id,
            employee_number,
            employee_name: row.get_trimmed(EMPLOYEE_NAME),
            usage_date: start,
            departure: String::new(),
            destination: String::new(),
            transportation_type: None,
            amount: parse_decimal(row.get(TOTAL_AMOUNT)),
            usage_count: parse_int_or(row.get(USAGE_COUNT), 1),
            route_info: Some(format!(
                "transportation: {transportation_fee}, commuting: {commuting_fee}"
            )),
            purpose,
            approval_status: "pending".to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::tests::employee;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const HEADER: &str = "従業員番号,従業員名,交通費,通勤費,総額,集計開始日,集計終了日,利用件数";

    #[test]
    fn parses_monthly_summary() {
        let text = format!("{HEADER}\n1001,山田,\"1,200\",8000,\"9,200\",2025/01/01,2025/01/31,14\n");
        let batch = parse(&text, 2, &[employee(3, "1001")]).unwrap();
        let (_, rec) = &batch.records[0];
        assert_eq!(rec.employee_id, Some(3));
        assert_eq!(rec.amount, dec!(9200));
        assert_eq!(rec.usage_count, 14);
        assert_eq!(rec.usage_date, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(rec.route_info.as_deref(), Some("transportation: 1200, commuting: 8000"));
        assert_eq!(rec.purpose.as_deref(), Some("2025-01-01 - 2025-01-31"));
        assert_eq!(rec.approval_status, "pending");
    }

    #[test]
    fn usage_count_defaults_to_one() {
        let text = format!("{HEADER}\n1001,山田,0,0,,,2025/01/31,\n");
        let batch = parse(&text, 2, &[]).unwrap();
        let (_, rec) = &batch.records[0];
        assert_eq!(rec.usage_count, 1);
        assert_eq!(rec.amount, dec!(0));
        assert_eq!(rec.purpose, None);
        assert_eq!(rec.employee_id, None);
    }

    #[test]
    fn ragged_rows_take_defaults() {
        let text = format!("{HEADER}\n1,a,0,0,0,,,1,\n2,b,0,0\n");
        let batch = parse(&text, 2, &[]).unwrap();
        assert!(batch.is_clean(), "{:?}", batch.errors);
        assert_eq!(batch.records.len(), 2);

        let (line, short) = &batch.records[1];
        assert_eq!(*line, 3);
        assert_eq!(short.employee_name, "b");
        assert_eq!(short.amount, dec!(0));
        assert_eq!(short.usage_count, 1);
    }
}
