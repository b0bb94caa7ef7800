#![allow(dead_code)]

use hr_manager_backend::db::{create_pool, ensure_schema};
use sqlx::SqlitePool;

const BOUNDARY: &str = "----hr-manager-test-boundary";

/// A private in-memory database with both tables created.
pub async fn test_pool() -> SqlitePool {
    // One connection, so every query sees the same in-memory database.
    let pool = create_pool("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory database");
    ensure_schema(&pool).await.expect("Failed to create tables");
    pool
}

pub async fn insert_employee(pool: &SqlitePool, full_name: &str, email: &str) -> i64 {
    sqlx::query("INSERT INTO employees (full_name, email, date_of_birth) VALUES (?, ?, '1990-01-01')")
        .bind(full_name)
        .bind(email)
        .execute(pool)
        .await
        .expect("Failed to insert employee")
        .last_insert_rowid()
}

/// Content type and body of a `multipart/form-data` submission.
pub fn multipart(fields: &[(&str, &str)], files: &[(&str, &str)]) -> (String, Vec<u8>) {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    for (name, file_name) in files {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\ncontents\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    (format!("multipart/form-data; boundary={BOUNDARY}"), body.into_bytes())
}
