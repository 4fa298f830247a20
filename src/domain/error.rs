//! Validation errors for domain value objects.

use thiserror::Error;

/// Error returned when constructing a value object from invalid input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be at most {max} characters (got {len})")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },
}

impl DomainError {
    pub(crate) fn check(
        field: &'static str,
        value: &str,
        max: usize,
    ) -> Result<(), DomainError> {
        if value.is_empty() {
            return Err(DomainError::Empty { field });
        }
        if value.chars().count() > max {
            return Err(DomainError::TooLong {
                field,
                max,
                len: value.chars().count(),
            });
        }
        Ok(())
    }
}
