use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use validator::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    /// Field-keyed rejection of a submission.
    Validation(ValidationErrors),
    InvalidIdentifier(String),
    NotFound(String),
    DatabaseError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct FieldError {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
struct FieldErrorsResponse {
    #[serde(rename = "fieldErrors")]
    field_errors: BTreeMap<String, FieldError>,
}

/// One entry per rejected field, keeping the first reason recorded for it.
pub fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, FieldError> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, reasons)| {
            reasons.first().map(|reason| {
                let message = reason
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| reason.code.to_string());
                (
                    field.to_string(),
                    FieldError {
                        code: reason.code.to_string(),
                        message,
                    },
                )
            })
        })
        .collect()
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(errors) => {
                let fields: Vec<String> = field_errors(errors)
                    .into_iter()
                    .map(|(field, error)| format!("{}: {}", field, error.message))
                    .collect();
                write!(f, "Validation Error: {}", fields.join(", "))
            }
            AppError::InvalidIdentifier(msg) => write!(f, "Invalid Identifier: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(errors) => HttpResponse::BadRequest().json(FieldErrorsResponse {
                field_errors: field_errors(errors),
            }),
            AppError::InvalidIdentifier(msg) => HttpResponse::BadRequest().json(ErrorResponse { error: msg.clone() }),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(ErrorResponse { error: msg.clone() }),
            AppError::DatabaseError(msg) => HttpResponse::InternalServerError().json(ErrorResponse { error: msg.clone() }),
        }
    }
}
