use tracing::{debug, warn};

use crate::model::employee::Employee;

/// Resolve a free-text employee number from an imported row.
///
/// `candidates` must already be scoped to the importing user. An exact
/// string match wins; otherwise both sides are compared as integers so
/// that `"007"` finds an employee stored as `"7"`. When several stored
/// numbers normalize to the same integer the first one in `candidates`
/// is returned.
pub fn find_employee<'a>(candidates: &'a [Employee], employee_number: &str) -> Option<&'a Employee> {
    let wanted = employee_number.trim();
    if wanted.is_empty() {
        return None;
    }

    if let Some(exact) = candidates.iter().find(|e| e.employee_number == wanted) {
        return Some(exact);
    }

    let Ok(wanted_int) = wanted.parse::<i64>() else {
        warn!(employee_number = wanted, "No employee matches non-numeric number");
        return None;
    };

    let found = candidates
        .iter()
        .find(|e| e.employee_number.trim().parse::<i64>().ok() == Some(wanted_int));

    match found {
        Some(emp) => {
            debug!(
                csv = wanted,
                stored = %emp.employee_number,
                employee_id = emp.id,
                "Employee matched by numeric value"
            );
            Some(emp)
        }
        None => {
            warn!(employee_number = wanted, "No employee matches employee number");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;

    pub(crate) fn employee(id: u64, number: &str) -> Employee {
        Employee {
            id,
            user_id: 1,
            employee_number: number.to_string(),
            name: format!("Employee {number}"),
            hire_date: None,
            resignation_date: None,
            kincone_name: None,
            freee_name: None,
            kiwi_name: None,
            remote_allowance: false,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn leading_zeros_match_numeric_value() {
        let staff = vec![employee(1, "12"), employee(2, "7")];
        assert_eq!(find_employee(&staff, "007").map(|e| e.id), Some(2));
        assert_eq!(find_employee(&staff, "7").map(|e| e.id), Some(2));
    }

    #[test]
    fn exact_match_beats_numeric_equivalence() {
        let staff = vec![employee(1, "0100"), employee(2, "100")];
        assert_eq!(find_employee(&staff, "100").map(|e| e.id), Some(2));
        assert_eq!(find_employee(&staff, "0100").map(|e| e.id), Some(1));
    }

    #[test]
    fn non_numeric_input_only_matches_exactly() {
        let staff = vec![employee(1, "A-7"), employee(2, "7")];
        assert_eq!(find_employee(&staff, "A-7").map(|e| e.id), Some(1));
        assert!(find_employee(&staff, "a-7").is_none());
        assert!(find_employee(&staff, "7a").is_none());
    }

    #[test]
    fn blank_or_unknown_numbers_match_nothing() {
        let staff = vec![employee(1, "7")];
        assert!(find_employee(&staff, "  ").is_none());
        assert!(find_employee(&staff, "8").is_none());
    }

    #[test]
    fn stored_numbers_that_do_not_parse_are_skipped() {
        let staff = vec![employee(1, "X1"), employee(2, "001")];
        assert_eq!(find_employee(&staff, "1").map(|e| e.id), Some(2));
    }
}
