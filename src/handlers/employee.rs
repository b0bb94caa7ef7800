use actix_multipart::form::{bytes::Bytes, text::Text, MultipartForm};
use actix_web::{web, HttpResponse};
use chrono::Local;
use log::{info, warn};
use serde_json::json;
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::handlers::parse_id;
use crate::models::employee::{Employee, EmployeeDocuments, EmployeeForm, EmployeeOption};
use crate::utils::filters::EmployeeFilter;
use crate::utils::validation::{self, format_date, EmployeeRules, ValidEmployee};

/// Employee form as posted by the browser. Uploaded files are read only for
/// their names.
#[derive(MultipartForm)]
pub struct EmployeeUpload {
    full_name: Option<Text<String>>,
    email: Option<Text<String>>,
    phone_number: Option<Text<String>>,
    date_of_birth: Option<Text<String>>,
    job_title: Option<Text<String>>,
    department: Option<Text<String>>,
    salary: Option<Text<String>>,
    start_date: Option<Text<String>>,
    end_date: Option<Text<String>>,
    photo: Option<Bytes>,
    cv: Option<Bytes>,
    id_document: Option<Bytes>,
}

fn text(field: Option<Text<String>>) -> Option<String> {
    field.map(Text::into_inner)
}

fn file_name(file: Option<Bytes>) -> Option<String> {
    file.and_then(|file| file.file_name)
        .filter(|name| !name.trim().is_empty())
}

impl EmployeeUpload {
    fn into_parts(self) -> (EmployeeForm, EmployeeDocuments) {
        let form = EmployeeForm {
            full_name: text(self.full_name),
            email: text(self.email),
            phone_number: text(self.phone_number),
            date_of_birth: text(self.date_of_birth),
            job_title: text(self.job_title),
            department: text(self.department),
            salary: text(self.salary),
            start_date: text(self.start_date),
            end_date: text(self.end_date),
        };
        let documents = EmployeeDocuments {
            photo_path: file_name(self.photo),
            cv_path: file_name(self.cv),
            id_document_path: file_name(self.id_document),
        };
        (form, documents)
    }
}

fn accept(form: &EmployeeForm) -> Result<ValidEmployee, AppError> {
    let today = Local::now().date_naive();
    validation::validate_employee(form, today, &EmployeeRules::default()).map_err(|errors| {
        let err = AppError::Validation(errors);
        warn!("Rejected employee submission: {}", err);
        err
    })
}

pub async fn fetch_employee(pool: &SqlitePool, id: i64) -> Result<Employee, AppError> {
    sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))
}

pub async fn employee_exists(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Choices for the employee selector on the timesheet forms.
pub async fn employee_options(pool: &SqlitePool) -> Result<Vec<EmployeeOption>, AppError> {
    let options = sqlx::query_as::<_, EmployeeOption>("SELECT id, full_name FROM employees ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(options)
}

pub async fn get_employees(
    pool: web::Data<SqlitePool>,
    query: web::Query<EmployeeFilter>,
) -> Result<HttpResponse, AppError> {
    let employees = sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY id")
        .fetch_all(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(query.apply(employees)))
}

pub async fn get_employee(
    pool: web::Data<SqlitePool>,
    employee_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&employee_id, "employee")?;
    let employee = fetch_employee(&pool, id).await?;

    Ok(HttpResponse::Ok().json(employee))
}

/// Runs the submission rules without saving anything.
pub async fn check_employee(form: web::Json<EmployeeForm>) -> Result<HttpResponse, AppError> {
    accept(&form)?;

    Ok(HttpResponse::Ok().json(json!({ "valid": true })))
}

pub async fn create_employee(
    pool: web::Data<SqlitePool>,
    MultipartForm(upload): MultipartForm<EmployeeUpload>,
) -> Result<HttpResponse, AppError> {
    let (form, documents) = upload.into_parts();
    let employee = accept(&form)?;

    let result = sqlx::query(
        "INSERT INTO employees
        (full_name, email, phone_number, date_of_birth, job_title, department, salary, start_date, end_date, photo_path, cv_path, id_document_path)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&employee.full_name)
    .bind(&employee.email)
    .bind(&employee.phone_number)
    .bind(format_date(employee.date_of_birth))
    .bind(&employee.job_title)
    .bind(&employee.department)
    .bind(employee.salary)
    .bind(&employee.start_date)
    .bind(employee.end_date.map(format_date))
    .bind(&documents.photo_path)
    .bind(&documents.cv_path)
    .bind(&documents.id_document_path)
    .execute(&**pool)
    .await?;

    let id = result.last_insert_rowid();
    info!("Created employee {} <{}>", id, employee.email);

    let created = fetch_employee(&pool, id).await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn update_employee(
    pool: web::Data<SqlitePool>,
    employee_id: web::Path<String>,
    MultipartForm(upload): MultipartForm<EmployeeUpload>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&employee_id, "employee")?;
    fetch_employee(&pool, id).await?;

    let (form, documents) = upload.into_parts();
    let employee = accept(&form)?;

    // Stored document names are only replaced by newly uploaded files.
    sqlx::query(
        "UPDATE employees SET
            full_name = ?,
            email = ?,
            phone_number = ?,
            date_of_birth = ?,
            job_title = ?,
            department = ?,
            salary = ?,
            start_date = ?,
            end_date = ?,
            photo_path = COALESCE(?, photo_path),
            cv_path = COALESCE(?, cv_path),
            id_document_path = COALESCE(?, id_document_path)
         WHERE id = ?",
    )
    .bind(&employee.full_name)
    .bind(&employee.email)
    .bind(&employee.phone_number)
    .bind(format_date(employee.date_of_birth))
    .bind(&employee.job_title)
    .bind(&employee.department)
    .bind(employee.salary)
    .bind(&employee.start_date)
    .bind(employee.end_date.map(format_date))
    .bind(&documents.photo_path)
    .bind(&documents.cv_path)
    .bind(&documents.id_document_path)
    .bind(id)
    .execute(&**pool)
    .await?;

    info!("Updated employee {}", id);

    let updated = fetch_employee(&pool, id).await?;
    Ok(HttpResponse::Ok().json(updated))
}
