use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AppResult;
use crate::matcher::find_employee;
use crate::model::employee::Employee;
use crate::model::freee_expense::NewFreeeExpense;

use super::fields::{Aliases, non_empty, parse_date, parse_decimal};
use super::{ImportBatch, parse_rows};

pub const INCOME_EXPENSE_TYPE: Aliases = &["収支区分", "Income/Expense Type"];
pub const MANAGEMENT_NUMBER: Aliases = &["管理番号", "Management Number"];
pub const OCCURRENCE_DATE: Aliases = &["発生日", "Occurrence Date"];
pub const PAYMENT_DUE_DATE: Aliases = &["支払期日", "Payment Due Date"];
pub const PARTNER_NAME: Aliases = &["取引先", "Partner"];
pub const ACCOUNT_ITEM: Aliases = &["勘定科目", "Account Item"];
pub const TAX_CLASSIFICATION: Aliases = &["税区分", "Tax Classification"];
pub const AMOUNT: Aliases = &["金額", "Amount"];
pub const TAX_CALCULATION_TYPE: Aliases = &["税計算区分", "Tax Calculation Type"];
pub const TAX_AMOUNT: Aliases = &["税額", "Tax Amount"];
pub const NOTES: Aliases = &["備考", "Notes"];
pub const ITEM_NAME: Aliases = &["品目", "Item"];
pub const DEPARTMENT: Aliases = &["部門", "Department"];
pub const MEMO_TAGS: Aliases = &["メモタグ（複数指定可、カンマ区切り）", "Memo Tags"];
pub const PAYMENT_DATE: Aliases = &["支払日", "Payment Date"];
pub const PAYMENT_ACCOUNT: Aliases = &["支払口座", "Payment Account"];
pub const PAYMENT_AMOUNT: Aliases = &["支払金額", "Payment Amount"];

static EMPLOYEE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^★(\d+)").expect("valid marker regex"));

/// `★1001Hanako Yamada` → `1001`.
pub fn extract_employee_number(partner_name: &str) -> Option<String> {
    EMPLOYEE_MARKER
        .captures(partner_name.trim())
        .map(|c| c[1].to_string())
}

pub fn parse(
    text: &str,
    calculation_period_id: u64,
    employees: &[Employee],
) -> AppResult<ImportBatch<NewFreeeExpense>> {
    parse_rows(text, |row| {
        let partner_name = row.get_trimmed(PARTNER_NAME);
        let employee_number = extract_employee_number(&partner_name);
        let employee_id = employee_number
            .as_deref()
            .and_then(|n| find_employee(employees, n))
            .map(|e| e.id);

        Ok(NewFreeeExpense {
            calculation_period_id,
            employee_id,
            income_expense_type: row.get_trimmed(INCOME_EXPENSE_TYPE),
            management_number: non_empty(row.get(MANAGEMENT_NUMBER)),
            occurrence_date: parse_date(row.get(OCCURRENCE_DATE)),
            payment_due_date: parse_date(row.get(PAYMENT_DUE_DATE)),
            partner_name,
            account_item: row.get_trimmed(ACCOUNT_ITEM),
            tax_classification: row.get_trimmed(TAX_CLASSIFICATION),
            amount: parse_decimal(row.get(AMOUNT)),
            tax_calculation_type: row.get_trimmed(TAX_CALCULATION_TYPE),
            tax_amount: parse_decimal(row.get(TAX_AMOUNT)),
            notes: non_empty(row.get(NOTES)),
            item_name: non_empty(row.get(ITEM_NAME)),
            department: non_empty(row.get(DEPARTMENT)),
            memo_tags: non_empty(row.get(MEMO_TAGS)),
            payment_date: parse_date(row.get(PAYMENT_DATE)),
            payment_account: non_empty(row.get(PAYMENT_ACCOUNT)),
            payment_amount: Some(parse_decimal(row.get(PAYMENT_AMOUNT))),
            employee_number,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::tests::employee;
    use rust_decimal_macros::dec;

    #[test]
    fn employee_number_comes_from_the_star_prefix() {
        assert_eq!(extract_employee_number("★100吉村芙実").as_deref(), Some("100"));
        assert_eq!(extract_employee_number(" ★0042 Taro").as_deref(), Some("0042"));
        assert_eq!(extract_employee_number("Acme ★100"), None);
        assert_eq!(extract_employee_number("★Taro"), None);
        assert_eq!(extract_employee_number(""), None);
    }

    #[test]
    fn parses_expense_lines() {
        let text = "収支区分,取引先,発生日,金額,税額,備考,メモタグ（複数指定可、カンマ区切り）\n\
                    支出,★0042山田,2025/01/15,\"1,000\",90,,\"a,b\"\n\
                    支出,文房具店,2025-01-20,2500円,,文具,\n";
        let staff = vec![employee(5, "42")];
        let batch = parse(text, 9, &staff).unwrap();
        assert!(batch.is_clean());
        assert_eq!(batch.records.len(), 2);

        let (_, first) = &batch.records[0];
        assert_eq!(first.employee_number.as_deref(), Some("0042"));
        assert_eq!(first.employee_id, Some(5));
        assert_eq!(first.amount, dec!(1000));
        assert_eq!(first.tax_amount, dec!(90));
        assert_eq!(first.notes, None);
        assert_eq!(first.memo_tags.as_deref(), Some("a,b"));

        let (_, second) = &batch.records[1];
        assert_eq!(second.employee_number, None);
        assert_eq!(second.employee_id, None);
        assert_eq!(second.amount, dec!(2500));
        assert_eq!(second.tax_amount, dec!(0));
        assert_eq!(second.notes.as_deref(), Some("文具"));
    }

    #[test]
    fn unmatched_star_numbers_stay_unlinked() {
        let text = "取引先,金額\n★77Ghost,100\n";
        let batch = parse(text, 1, &[employee(1, "7")]).unwrap();
        let (_, rec) = &batch.records[0];
        assert_eq!(rec.employee_number.as_deref(), Some("77"));
        assert_eq!(rec.employee_id, None);
    }
}
