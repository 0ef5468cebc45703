use anyhow::Result;
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, info};

use crate::duration::WorkDuration;

use super::aggregator::WorkDataSummary;
use super::template::{CellValue, CellWrites, HEADER_ROWS, column_index, employee_column, patch_first_sheet};

const ALLOWANCE_CAP: i32 = 10;

fn capped(count: i32, no_cap: bool) -> i32 {
    if no_cap { count } else { count.min(ALLOWANCE_CAP) }
}

/// Duration text as `H:MM`; anything unparseable is written verbatim.
fn hours_text(raw: &str) -> CellValue {
    CellValue::Text(WorkDuration::normalize(raw).unwrap_or_else(|| raw.to_string()))
}

/// Column letter and value of every set field of `summary`.
pub fn row_cells(summary: &WorkDataSummary) -> Vec<(&'static str, CellValue)> {
    let s = summary;
    let no_cap = s.no_allowance_cap;
    let mut cells = Vec::new();

    if let Some(days) = s.working_days {
        cells.push(("E", CellValue::Number(days.into())));
    }
    if let Some(hours) = &s.total_work_hours {
        cells.push(("F", hours_text(hours)));
    }
    if let Some(days) = s.paid_leave_days.and_then(|d| d.to_f64()) {
        cells.push(("G", CellValue::Number(days)));
    }
    if let Some(n) = s.special_holiday {
        cells.push(("H", CellValue::Formula(format!("=H2+{n}"))));
    }
    if let Some(n) = s.special_holiday_without_pay {
        cells.push(("I", CellValue::Formula(format!("=I2+{n}"))));
    }
    if let Some(hours) = &s.statutory_holiday_hours {
        cells.push(("N", hours_text(hours)));
    }
    if let Some(hours) = &s.night_working_hours {
        cells.push(("O", hours_text(hours)));
    }
    if let Some(days) = s.absence_days {
        cells.push(("P", CellValue::Number(days.into())));
    }
    if let Some(n) = s.remote_count {
        cells.push(("X", CellValue::Number(capped(n, no_cap).into())));
    }
    if let Some(n) = s.office_count {
        cells.push(("AF", CellValue::Formula(format!("=2000*{}", capped(n, no_cap)))));
    }
    if let Some(n) = s.lunch_count {
        cells.push(("AG", CellValue::Formula(format!("=500*{}", capped(n, no_cap)))));
    }
    if let Some(n) = s.event_count {
        cells.push(("AH", CellValue::Formula(format!("=3000*{n}"))));
    }
    if let Some(points) = s.kiwi_points {
        cells.push(("AK", CellValue::Number(points.into())));
    }
    if let Some(n) = s.office_count {
        cells.push(("AP", CellValue::Number(n.into())));
    }
    if let (Some(before), Some(trip), Some(onday), Some(holidays)) = (
        s.trip_night_before_count,
        s.trip_count,
        s.travel_onday_count,
        s.travel_holidays_count,
    ) {
        cells.push((
            "AR",
            CellValue::Formula(format!(
                "=2000*{before}+2000*{trip}+2000*{onday}+1000*{holidays}"
            )),
        ));
    }
    if let Some(total) = s.freee_expenses {
        cells.push(("AT", CellValue::Number(total as f64)));
    }
    if let Some(total) = s.kincone_expenses {
        cells.push(("AU", CellValue::Number(total as f64)));
    }
    cells
}

/// Sheet row for each summary, by first column-A match. Employees absent
/// from the template are left out.
pub fn locate_rows(employee_column: &[String], summaries: &[WorkDataSummary]) -> Vec<(u32, usize)> {
    summaries
        .iter()
        .enumerate()
        .filter_map(|(i, summary)| {
            match employee_column.iter().position(|n| *n == summary.employee_number) {
                Some(t) => Some((t as u32 + HEADER_ROWS + 1, i)),
                None => {
                    debug!(employee_number = %summary.employee_number, "Employee not in template");
                    None
                }
            }
        })
        .collect()
}

/// Write every summary into its template row and return the workbook.
pub fn fill_template(template: &[u8], summaries: &[WorkDataSummary]) -> Result<Vec<u8>> {
    let column = employee_column(template)?;
    let rows = locate_rows(&column, summaries);

    let mut writes = CellWrites::new();
    for &(row, i) in &rows {
        for (letters, value) in row_cells(&summaries[i]) {
            if let Some(col) = column_index(letters) {
                writes.insert((row, col), value);
            }
        }
    }

    info!(
        summaries = summaries.len(),
        matched = rows.len(),
        cells = writes.len(),
        "Filling payroll template"
    );
    patch_first_sheet(template, &writes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
    use rust_decimal_macros::dec;
    use rust_xlsxwriter::Workbook;
    use std::io::Cursor;

    fn summary(number: &str) -> WorkDataSummary {
        WorkDataSummary {
            employee_id: 1,
            employee_number: number.to_string(),
            employee_name: "Hanako".to_string(),
            ..Default::default()
        }
    }

    fn cell<'a>(cells: &'a [(&'static str, CellValue)], col: &str) -> Option<&'a CellValue> {
        cells.iter().find(|(c, _)| *c == col).map(|(_, v)| v)
    }

    /// Five header rows, then employee numbers in column A.
    fn template(numbers: &[&str]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Payroll").unwrap();
        sheet.write_string(1, 7, "base").unwrap();
        sheet.write_string(4, 0, "No.").unwrap();
        for (t, number) in numbers.iter().enumerate() {
            let row = 5 + t as u32;
            match number.parse::<f64>() {
                Ok(n) => sheet.write_number(row, 0, n).unwrap(),
                Err(_) => sheet.write_string(row, 0, *number).unwrap(),
            };
            sheet.write_string(row, 1, "name").unwrap();
        }
        workbook.add_worksheet().write_string(0, 0, "other").unwrap();
        workbook.save_to_buffer().unwrap()
    }

    fn open(bytes: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
        open_workbook_from_rs(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn lunch_is_capped_without_override() {
        let mut s = summary("1");
        s.lunch_count = Some(12);
        assert_eq!(cell(&row_cells(&s), "AG"), Some(&CellValue::Formula("=500*10".into())));

        s.no_allowance_cap = true;
        assert_eq!(cell(&row_cells(&s), "AG"), Some(&CellValue::Formula("=500*12".into())));
    }

    #[test]
    fn remote_and_office_share_the_cap() {
        let mut s = summary("1");
        s.remote_count = Some(15);
        s.office_count = Some(11);
        let cells = row_cells(&s);
        assert_eq!(cell(&cells, "X"), Some(&CellValue::Number(10.0)));
        assert_eq!(cell(&cells, "AF"), Some(&CellValue::Formula("=2000*10".into())));
        assert_eq!(cell(&cells, "AP"), Some(&CellValue::Number(11.0)));
    }

    #[test]
    fn trip_formula_needs_all_four_counts() {
        let mut s = summary("1");
        s.trip_night_before_count = Some(1);
        s.trip_count = Some(2);
        s.travel_onday_count = Some(0);
        assert_eq!(cell(&row_cells(&s), "AR"), None);

        s.travel_holidays_count = Some(1);
        assert_eq!(
            cell(&row_cells(&s), "AR"),
            Some(&CellValue::Formula("=2000*1+2000*2+2000*0+1000*1".into()))
        );
    }

    #[test]
    fn unset_fields_are_not_written() {
        assert!(row_cells(&summary("1")).is_empty());

        let mut s = summary("1");
        s.total_work_hours = Some("142:02:00".into());
        s.night_working_hours = Some("late".into());
        s.paid_leave_days = Some(dec!(1.5));
        s.special_holiday = Some(2);
        let cells = row_cells(&s);
        assert_eq!(cell(&cells, "F"), Some(&CellValue::Text("142:02".into())));
        assert_eq!(cell(&cells, "O"), Some(&CellValue::Text("late".into())));
        assert_eq!(cell(&cells, "G"), Some(&CellValue::Number(1.5)));
        assert_eq!(cell(&cells, "H"), Some(&CellValue::Formula("=H2+2".into())));
    }

    #[test]
    fn tabular_index_maps_to_sheet_row() {
        let column: Vec<String> = ["1000", "", "1002", "1001"].iter().map(|s| s.to_string()).collect();
        let summaries = vec![summary("1001"), summary("9999")];
        assert_eq!(locate_rows(&column, &summaries), vec![(9, 0)]);
    }

    #[test]
    fn fills_matching_rows_and_preserves_the_rest() {
        let bytes = template(&["1000", "1002", "EX-7", "1001"]);
        let mut s = summary("1001");
        s.working_days = Some(20);
        s.total_work_hours = Some("142:02".into());
        s.lunch_count = Some(12);
        s.freee_expenses = Some(3500);
        let absent = WorkDataSummary {
            working_days: Some(5),
            ..summary("4242")
        };

        let out = fill_template(&bytes, &[s, absent]).unwrap();
        let mut wb = open(out);
        let range = wb.worksheet_range_at(0).unwrap().unwrap();

        assert_eq!(range.get_value((8, 4)), Some(&Data::Float(20.0)));
        assert_eq!(range.get_value((8, 5)), Some(&Data::String("142:02".into())));
        assert_eq!(range.get_value((8, 45)), Some(&Data::Float(3500.0)));
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("Payroll".into())));
        assert_eq!(range.get_value((8, 1)), Some(&Data::String("name".into())));
        for r in 5..8 {
            assert_ne!(range.get_value((r, 4)), Some(&Data::Float(5.0)));
        }

        let formulas = wb.worksheet_formula("Sheet1").unwrap();
        assert_eq!(formulas.get_value((8, 32)).map(String::as_str), Some("500*10"));

        let other = wb.worksheet_range("Sheet2").unwrap();
        assert_eq!(other.get_value((0, 0)), Some(&Data::String("other".into())));
    }

    #[test]
    fn numeric_employee_cells_are_matched_as_text() {
        let bytes = template(&["1001"]);
        assert_eq!(employee_column(&bytes).unwrap(), vec!["1001".to_string()]);
    }

    #[test]
    fn unreadable_template_is_an_error() {
        assert!(fill_template(b"not a workbook", &[summary("1")]).is_err());
    }
}
