use serde::{Deserialize, Serialize};

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Timesheet {
    pub id: i64,
    pub start_time: String,
    pub end_time: String,
    pub employee_id: i64,
    pub summary: Option<String>,
}

/// A timesheet joined with the name of the employee it belongs to.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimesheetEntry {
    pub id: i64,
    pub start_time: String,
    pub end_time: String,
    pub employee_id: i64,
    pub summary: Option<String>,
    pub full_name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct TimesheetForm {
    pub employee_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub summary: Option<String>,
}
