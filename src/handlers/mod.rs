pub mod employee;
pub mod timesheet;

use crate::errors::AppError;

/// Parses an id taken from a request path.
pub fn parse_id(raw: &str, entity: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::InvalidIdentifier(format!("Invalid {} ID", entity)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_ids_must_be_numeric() {
        assert_eq!(parse_id("42", "employee").unwrap(), 42);
        match parse_id("abc", "employee") {
            Err(AppError::InvalidIdentifier(msg)) => assert_eq!(msg, "Invalid employee ID"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
