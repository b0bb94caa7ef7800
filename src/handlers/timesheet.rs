use actix_web::{web, HttpResponse};
use chrono::{Local, NaiveDateTime};
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::AppError;
use crate::handlers::employee::{employee_exists, employee_options};
use crate::handlers::parse_id;
use crate::models::timesheet::{Timesheet, TimesheetEntry, TimesheetForm};
use crate::utils::calendar::{self, CalendarEvent};
use crate::utils::filters::TimesheetFilter;
use crate::utils::validation::{
    self, format_timestamp, parse_timestamp, reject, TimesheetRules, ValidTimesheet, Violation, EMPLOYEE_ID,
};

const ENTRIES_QUERY: &str = "SELECT timesheets.id, timesheets.start_time, timesheets.end_time, timesheets.employee_id, timesheets.summary, employees.full_name
    FROM timesheets JOIN employees ON timesheets.employee_id = employees.id
    ORDER BY timesheets.id";

#[derive(Deserialize, Validate)]
pub struct CalendarQuery {
    #[validate(custom = "validate_month")]
    month: Option<String>,
    id: Option<String>,
    employee_id: Option<String>,
}

fn validate_month(month: &str) -> Result<(), ValidationError> {
    if calendar::parse_month(month).is_none() {
        let mut error = ValidationError::new(Violation::InvalidDate.code());
        error.message = Some("Month must be formatted as YYYY-MM".into());
        return Err(error);
    }
    Ok(())
}

impl CalendarEvent for TimesheetEntry {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }

    fn starts_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.start_time)
    }
}

async fn fetch_timesheet(pool: &SqlitePool, id: i64) -> Result<Timesheet, AppError> {
    sqlx::query_as::<_, Timesheet>("SELECT * FROM timesheets WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Timesheet not found".to_string()))
}

async fn fetch_entries(pool: &SqlitePool) -> Result<Vec<TimesheetEntry>, AppError> {
    let entries = sqlx::query_as::<_, TimesheetEntry>(ENTRIES_QUERY)
        .fetch_all(pool)
        .await?;
    Ok(entries)
}

/// Applies `rules`, then makes sure the referenced employee exists.
async fn accept(pool: &SqlitePool, form: &TimesheetForm, rules: &TimesheetRules) -> Result<ValidTimesheet, AppError> {
    let timesheet = match validation::validate_timesheet(form, rules) {
        Ok(timesheet) => {
            if employee_exists(pool, timesheet.employee_id).await? {
                Ok(timesheet)
            } else {
                let mut errors = ValidationErrors::new();
                reject(&mut errors, EMPLOYEE_ID, Violation::UnknownEmployee, "Employee does not exist");
                Err(AppError::Validation(errors))
            }
        }
        Err(errors) => Err(AppError::Validation(errors)),
    };

    if let Err(err) = &timesheet {
        warn!("Rejected timesheet submission: {}", err);
    }
    timesheet
}

pub async fn get_timesheets(
    pool: web::Data<SqlitePool>,
    query: web::Query<TimesheetFilter>,
) -> Result<HttpResponse, AppError> {
    let entries = fetch_entries(&pool).await?;

    Ok(HttpResponse::Ok().json(query.apply(entries)))
}

/// What the blank timesheet form needs: the employees to choose from.
pub async fn new_timesheet(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let employees = employee_options(&pool).await?;

    Ok(HttpResponse::Ok().json(json!({ "employees": employees })))
}

pub async fn get_calendar(
    pool: web::Data<SqlitePool>,
    query: web::Query<CalendarQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let reference = query
        .month
        .as_deref()
        .and_then(calendar::parse_month)
        .unwrap_or_else(|| Local::now().date_naive());
    let filter = TimesheetFilter {
        id: query.id.clone(),
        employee_id: query.employee_id.clone(),
    };
    let entries = filter.apply(fetch_entries(&pool).await?);

    Ok(HttpResponse::Ok().json(calendar::project(reference, &entries)))
}

pub async fn get_timesheet(
    pool: web::Data<SqlitePool>,
    timesheet_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&timesheet_id, "timesheet")?;
    let timesheet = fetch_timesheet(&pool, id).await?;
    let employees = employee_options(&pool).await?;

    Ok(HttpResponse::Ok().json(json!({
        "timesheet": timesheet,
        "employees": employees,
    })))
}

/// Runs the creation rules without saving anything.
pub async fn check_timesheet(form: web::Json<TimesheetForm>) -> Result<HttpResponse, AppError> {
    validation::validate_timesheet(&form, &TimesheetRules::for_create())?;

    Ok(HttpResponse::Ok().json(json!({ "valid": true })))
}

pub async fn create_timesheet(
    pool: web::Data<SqlitePool>,
    form: web::Form<TimesheetForm>,
) -> Result<HttpResponse, AppError> {
    let timesheet = accept(&pool, &form, &TimesheetRules::for_create()).await?;

    let result = sqlx::query("INSERT INTO timesheets (employee_id, start_time, end_time, summary) VALUES (?, ?, ?, ?)")
        .bind(timesheet.employee_id)
        .bind(format_timestamp(timesheet.start_time))
        .bind(format_timestamp(timesheet.end_time))
        .bind(&timesheet.summary)
        .execute(&**pool)
        .await?;

    let id = result.last_insert_rowid();
    info!("Created timesheet {} for employee {}", id, timesheet.employee_id);

    let created = fetch_timesheet(&pool, id).await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn update_timesheet(
    pool: web::Data<SqlitePool>,
    timesheet_id: web::Path<String>,
    form: web::Form<TimesheetForm>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&timesheet_id, "timesheet")?;
    fetch_timesheet(&pool, id).await?;

    let timesheet = accept(&pool, &form, &TimesheetRules::for_update()).await?;

    sqlx::query(
        "UPDATE timesheets SET
            summary = ?,
            start_time = ?,
            end_time = ?,
            employee_id = ?
         WHERE id = ?",
    )
    .bind(&timesheet.summary)
    .bind(format_timestamp(timesheet.start_time))
    .bind(format_timestamp(timesheet.end_time))
    .bind(timesheet.employee_id)
    .bind(id)
    .execute(&**pool)
    .await?;

    info!("Updated timesheet {}", id);

    let updated = fetch_timesheet(&pool, id).await?;
    Ok(HttpResponse::Ok().json(updated))
}
