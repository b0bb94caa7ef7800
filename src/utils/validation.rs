//! Acceptance rules for employee and timesheet submissions.
//!
//! The same functions back the pre-submit check endpoints and the
//! create/update handlers, so a submission is judged identically in both
//! places. Nothing here touches the store or the clock: "today" is passed in.

use std::borrow::Cow;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use validator::{ValidationError, ValidationErrors};

use crate::models::employee::EmployeeForm;
use crate::models::timesheet::TimesheetForm;

pub const MINIMUM_AGE_YEARS: i32 = 18;

pub const FULL_NAME: &str = "full_name";
pub const EMAIL: &str = "email";
pub const PHONE_NUMBER: &str = "phone_number";
pub const DATE_OF_BIRTH: &str = "date_of_birth";
pub const JOB_TITLE: &str = "job_title";
pub const DEPARTMENT: &str = "department";
pub const SALARY: &str = "salary";
pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";

pub const EMPLOYEE_ID: &str = "employee_id";
pub const START_TIME: &str = "start_time";
pub const END_TIME: &str = "end_time";
pub const SUMMARY: &str = "summary";

/// Why a single field was rejected. The code doubles as the
/// `ValidationError` code reported to the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    InvalidDate,
    Underage,
    DateOrderViolation,
    MissingRequiredField,
    InvalidIdentifier,
    UnknownEmployee,
}

impl Violation {
    pub fn code(self) -> &'static str {
        match self {
            Violation::InvalidDate => "invalid_date",
            Violation::Underage => "underage",
            Violation::DateOrderViolation => "date_order",
            Violation::MissingRequiredField => "required",
            Violation::InvalidIdentifier => "invalid_identifier",
            Violation::UnknownEmployee => "unknown_employee",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        [
            Violation::InvalidDate,
            Violation::Underage,
            Violation::DateOrderViolation,
            Violation::MissingRequiredField,
            Violation::InvalidIdentifier,
            Violation::UnknownEmployee,
        ]
        .into_iter()
        .find(|violation| violation.code() == code)
    }
}

/// Records `violation` against `field`.
pub fn reject(
    errors: &mut ValidationErrors,
    field: &'static str,
    violation: Violation,
    message: impl Into<Cow<'static, str>>,
) {
    let mut error = ValidationError::new(violation.code());
    error.message = Some(message.into());
    errors.add(field, error);
}

/// The first violation recorded against `field`, if any.
pub fn violation_of(errors: &ValidationErrors, field: &str) -> Option<Violation> {
    errors
        .field_errors()
        .get(field)
        .and_then(|field_errors| field_errors.first())
        .and_then(|error| Violation::from_code(&error.code))
}

/// Which fields must be non-empty for a submission to be accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredFields(Vec<&'static str>);

impl RequiredFields {
    pub fn new(fields: &[&'static str]) -> Self {
        RequiredFields(fields.to_vec())
    }

    pub fn with(mut self, field: &'static str) -> Self {
        if !self.contains(field) {
            self.0.push(field);
        }
        self
    }

    pub fn without(mut self, field: &str) -> Self {
        self.0.retain(|required| *required != field);
        self
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|required| *required == field)
    }
}

#[derive(Debug, Clone)]
pub struct EmployeeRules {
    pub required: RequiredFields,
}

impl Default for EmployeeRules {
    fn default() -> Self {
        EmployeeRules {
            required: RequiredFields::new(&[FULL_NAME, EMAIL]),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimesheetRules {
    pub required: RequiredFields,
}

impl TimesheetRules {
    /// New timesheets may be saved without a summary.
    pub fn for_create() -> Self {
        TimesheetRules {
            required: RequiredFields::new(&[EMPLOYEE_ID, START_TIME, END_TIME]),
        }
    }

    /// Edits must keep a summary.
    pub fn for_update() -> Self {
        TimesheetRules {
            required: Self::for_create().required.with(SUMMARY),
        }
    }
}

impl Default for TimesheetRules {
    fn default() -> Self {
        Self::for_create()
    }
}

/// An employee submission that passed every rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidEmployee {
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub date_of_birth: NaiveDate,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub salary: Option<f64>,
    /// Normalized when it parses, otherwise kept as submitted.
    pub start_date: Option<String>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidTimesheet {
    pub employee_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub summary: Option<String>,
}

/// Storage format for calendar dates.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Storage format for timestamps, matching `datetime-local` inputs.
pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Parses a calendar date. A full timestamp is accepted and truncated to
/// midnight.
///
/// An offset on the timestamp is ignored: the date is the one written down.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_wall_clock(raw).map(|timestamp| timestamp.date()))
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|timestamp| timestamp.date_naive()))
}

fn parse_wall_clock(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Parses a wall-clock timestamp. Timestamps carrying an offset are
/// converted to local time; a bare date means midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    parse_wall_clock(raw)
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|timestamp| timestamp.with_timezone(&Local).naive_local())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Latest birth date that still makes someone of age on `today`.
///
/// A 29 February `today` rolls over to 1 March when the target year has no
/// leap day.
pub fn min_age_date(today: NaiveDate) -> NaiveDate {
    let year = today.year() - MINIMUM_AGE_YEARS;
    today
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .unwrap_or(NaiveDate::MIN)
}

/// Non-blank trimmed value of an optional form field.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

fn required_message(field: &str) -> String {
    match field {
        FULL_NAME => "Full name is required".to_string(),
        EMAIL => "Email is required".to_string(),
        EMPLOYEE_ID => "Employee is required".to_string(),
        START_TIME => "Start date and time is required".to_string(),
        END_TIME => "End date and time is required".to_string(),
        SUMMARY => "Summary is required".to_string(),
        other => format!("{} is required", other.replace('_', " ")),
    }
}

fn check_required<'a>(
    errors: &mut ValidationErrors,
    required: &RequiredFields,
    fields: impl IntoIterator<Item = (&'static str, &'a Option<String>)>,
) {
    for (field, value) in fields {
        if required.contains(field) && present(value).is_none() {
            reject(errors, field, Violation::MissingRequiredField, required_message(field));
        }
    }
}

fn optional_date(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &Option<String>,
) -> Option<NaiveDate> {
    let raw = present(value)?;
    let date = parse_date(raw);
    if date.is_none() {
        reject(errors, field, Violation::InvalidDate, format!("Invalid {} format", field.replace('_', " ")));
    }
    date
}

fn optional_timestamp(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &Option<String>,
) -> Option<NaiveDateTime> {
    let raw = present(value)?;
    let timestamp = parse_timestamp(raw);
    if timestamp.is_none() {
        reject(errors, field, Violation::InvalidDate, format!("Invalid {} format", field.replace('_', " ")));
    }
    timestamp
}

fn check_date_of_birth(
    errors: &mut ValidationErrors,
    rules: &EmployeeRules,
    value: &Option<String>,
    today: NaiveDate,
) -> Option<NaiveDate> {
    if present(value).is_none() {
        // A configured requirement has already been reported.
        if !rules.required.contains(DATE_OF_BIRTH) {
            reject(errors, DATE_OF_BIRTH, Violation::InvalidDate, "Invalid date of birth format");
        }
        return None;
    }

    let date_of_birth = optional_date(errors, DATE_OF_BIRTH, value)?;
    if date_of_birth > min_age_date(today) {
        reject(
            errors,
            DATE_OF_BIRTH,
            Violation::Underage,
            format!("Employee must be at least {} years old", MINIMUM_AGE_YEARS),
        );
        return None;
    }
    Some(date_of_birth)
}

/// A salary that is not a number is stored as unknown rather than rejected.
fn salary(value: &Option<String>) -> Option<f64> {
    present(value)
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|salary| salary.is_finite())
}

/// Judges an employee submission against `rules` as of `today`.
pub fn validate_employee(
    form: &EmployeeForm,
    today: NaiveDate,
    rules: &EmployeeRules,
) -> Result<ValidEmployee, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    check_required(
        &mut errors,
        &rules.required,
        [
            (FULL_NAME, &form.full_name),
            (EMAIL, &form.email),
            (PHONE_NUMBER, &form.phone_number),
            (DATE_OF_BIRTH, &form.date_of_birth),
            (JOB_TITLE, &form.job_title),
            (DEPARTMENT, &form.department),
            (SALARY, &form.salary),
            (START_DATE, &form.start_date),
            (END_DATE, &form.end_date),
        ],
    );

    let date_of_birth = check_date_of_birth(&mut errors, rules, &form.date_of_birth, today);

    // The start date only has to parse when there is an end date to order it
    // against. Both ends are compared at midnight; the same day is fine.
    let end_date = optional_date(&mut errors, END_DATE, &form.end_date);
    let start_date = if end_date.is_some() {
        optional_date(&mut errors, START_DATE, &form.start_date)
    } else {
        present(&form.start_date).and_then(parse_date)
    };
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            reject(&mut errors, END_DATE, Violation::DateOrderViolation, "Start date must be before end date");
        }
    }

    match (errors.is_empty(), date_of_birth) {
        (true, Some(date_of_birth)) => Ok(ValidEmployee {
            full_name: present(&form.full_name).unwrap_or_default().to_string(),
            email: present(&form.email).unwrap_or_default().to_string(),
            phone_number: present(&form.phone_number).map(str::to_string),
            date_of_birth,
            job_title: present(&form.job_title).map(str::to_string),
            department: present(&form.department).map(str::to_string),
            salary: salary(&form.salary),
            start_date: start_date
                .map(format_date)
                .or_else(|| present(&form.start_date).map(str::to_string)),
            end_date,
        }),
        _ => Err(errors),
    }
}

/// Judges a timesheet submission against `rules`.
pub fn validate_timesheet(
    form: &TimesheetForm,
    rules: &TimesheetRules,
) -> Result<ValidTimesheet, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    check_required(
        &mut errors,
        &rules.required,
        [
            (EMPLOYEE_ID, &form.employee_id),
            (START_TIME, &form.start_time),
            (END_TIME, &form.end_time),
            (SUMMARY, &form.summary),
        ],
    );

    let employee_id = present(&form.employee_id).and_then(|raw| match raw.parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => {
            reject(&mut errors, EMPLOYEE_ID, Violation::InvalidIdentifier, "Employee is invalid");
            None
        }
    });

    // Full timestamps, strictly ordered.
    let start_time = optional_timestamp(&mut errors, START_TIME, &form.start_time);
    let end_time = optional_timestamp(&mut errors, END_TIME, &form.end_time);
    if let (Some(start), Some(end)) = (start_time, end_time) {
        if start >= end {
            reject(
                &mut errors,
                END_TIME,
                Violation::DateOrderViolation,
                "End date and time must be after start date and time",
            );
        }
    }

    match (errors.is_empty(), employee_id, start_time, end_time) {
        (true, Some(employee_id), Some(start_time), Some(end_time)) => Ok(ValidTimesheet {
            employee_id,
            start_time,
            end_time,
            summary: present(&form.summary).map(str::to_string),
        }),
        (true, ..) => {
            // Reached only when the configured rules stop requiring one of
            // the columns a timesheet cannot be stored without.
            let mut errors = errors;
            let parsed = [
                (EMPLOYEE_ID, employee_id.is_some()),
                (START_TIME, start_time.is_some()),
                (END_TIME, end_time.is_some()),
            ];
            for (field, is_parsed) in parsed {
                if !is_parsed {
                    reject(&mut errors, field, Violation::MissingRequiredField, required_message(field));
                }
            }
            Err(errors)
        }
        _ => Err(errors),
    }
}
