use serde::{Deserialize, Serialize};

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub salary: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub photo_path: Option<String>,
    pub cv_path: Option<String>,
    pub id_document_path: Option<String>,
}

/// Entry of the employee selector on the timesheet forms.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EmployeeOption {
    pub id: i64,
    pub full_name: String,
}

/// Raw employee fields as submitted by a form, before validation.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct EmployeeForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub salary: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Filenames of the documents attached to a submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeDocuments {
    pub photo_path: Option<String>,
    pub cv_path: Option<String>,
    pub id_document_path: Option<String>,
}
