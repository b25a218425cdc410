//! Result type aliases

use crate::error::WfError;

/// Standard Result type for Workforce operations
pub type WfResult<T> = Result<T, WfError>;

/// Turns an optional lookup into a `NotFound` error
pub trait OrNotFound<T> {
    fn or_not_found(self, entity: &'static str, field: &'static str, value: impl ToString) -> WfResult<T>;
}

impl<T> OrNotFound<T> for Option<T> {
    fn or_not_found(self, entity: &'static str, field: &'static str, value: impl ToString) -> WfResult<T> {
        self.ok_or_else(|| WfError::not_found(entity, field, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_not_found() {
        let found: Option<i32> = Some(1);
        assert_eq!(found.or_not_found("Project", "id", 1).unwrap(), 1);

        let missing: Option<i32> = None;
        let err = missing.or_not_found("Project", "name", "Launch").unwrap_err();
        assert_eq!(err.to_string(), "Not found: Project with name=Launch");
    }
}
