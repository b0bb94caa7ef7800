//! Search filters for the list views.
//!
//! Lists are fetched whole and narrowed here, in process. That is fine at the
//! size of one company's staff but does not scale past it.

use serde::Deserialize;

use crate::models::employee::Employee;
use crate::models::timesheet::TimesheetEntry;

fn term(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

fn contains_ignoring_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct EmployeeFilter {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl EmployeeFilter {
    /// Id must match exactly; name and email match case-insensitive
    /// substrings. Blank terms match everything.
    pub fn matches(&self, employee: &Employee) -> bool {
        term(&self.id).map_or(true, |id| employee.id.to_string() == id)
            && term(&self.name).map_or(true, |name| contains_ignoring_case(&employee.full_name, name))
            && term(&self.email).map_or(true, |email| contains_ignoring_case(&employee.email, email))
    }

    pub fn apply(&self, employees: Vec<Employee>) -> Vec<Employee> {
        employees.into_iter().filter(|employee| self.matches(employee)).collect()
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct TimesheetFilter {
    pub id: Option<String>,
    pub employee_id: Option<String>,
}

impl TimesheetFilter {
    pub fn matches(&self, entry: &TimesheetEntry) -> bool {
        term(&self.id).map_or(true, |id| entry.id.to_string() == id)
            && term(&self.employee_id).map_or(true, |employee_id| entry.employee_id.to_string() == employee_id)
    }

    pub fn apply(&self, entries: Vec<TimesheetEntry>) -> Vec<TimesheetEntry> {
        entries.into_iter().filter(|entry| self.matches(entry)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(id: i64, full_name: &str, email: &str) -> Employee {
        Employee {
            id,
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone_number: None,
            date_of_birth: Some("1990-01-01".to_string()),
            job_title: None,
            department: None,
            salary: None,
            start_date: None,
            end_date: None,
            photo_path: None,
            cv_path: None,
            id_document_path: None,
        }
    }

    fn entry(id: i64, employee_id: i64) -> TimesheetEntry {
        TimesheetEntry {
            id,
            start_time: "2025-02-10T08:00:00".to_string(),
            end_time: "2025-02-10T16:00:00".to_string(),
            employee_id,
            summary: None,
            full_name: "John Doe".to_string(),
        }
    }

    fn staff() -> Vec<Employee> {
        vec![
            employee(1, "John Doe", "john.doe@example.com"),
            employee(2, "Jane Smith", "jane.smith@example.com"),
            employee(12, "Alice Johnson", "alice.johnson@example.com"),
        ]
    }

    #[test]
    fn empty_filter_keeps_everything() {
        assert_eq!(EmployeeFilter::default().apply(staff()).len(), 3);
    }

    #[test]
    fn id_is_an_exact_match() {
        let filter = EmployeeFilter { id: Some("1".into()), ..Default::default() };
        let ids: Vec<i64> = filter.apply(staff()).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn name_and_email_match_substrings_ignoring_case() {
        let filter = EmployeeFilter {
            name: Some("JOHN".into()),
            email: Some("example.com".into()),
            ..Default::default()
        };
        let ids: Vec<i64> = filter.apply(staff()).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 12]);
    }

    #[test]
    fn blank_terms_are_ignored() {
        let filter = EmployeeFilter { name: Some("  ".into()), ..Default::default() };
        assert_eq!(filter.apply(staff()).len(), 3);
    }

    #[test]
    fn timesheets_filter_by_id_and_employee() {
        let entries = vec![entry(1, 1), entry(2, 2), entry(3, 1)];
        let by_employee = TimesheetFilter { employee_id: Some("1".into()), ..Default::default() };
        let ids: Vec<i64> = by_employee.apply(entries.clone()).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let both = TimesheetFilter { id: Some("3".into()), employee_id: Some("2".into()) };
        assert!(both.apply(entries).is_empty());
    }
}
