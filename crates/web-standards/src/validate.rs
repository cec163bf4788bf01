use mcp_common::mcp_api::FieldViolation;

use crate::error::AppError;

const MAX_TEXT_LEN: usize = 256;

#[derive(Debug, Clone, Copy)]
pub struct LimitRange {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

pub const LIST_LIMIT: LimitRange = LimitRange {
    min: 1,
    max: 500,
    default: 50,
};

pub const SEARCH_LIMIT: LimitRange = LimitRange {
    min: 1,
    max: 100,
    default: 20,
};

/// Collects every field problem in a request before failing, so the caller sees them all.
#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<FieldViolation>,
}

impl Validator {
    /// Trimmed value of a required text field.
    pub fn required(&mut self, field: &str, value: &str) -> String {
        let value = value.trim();
        if value.is_empty() {
            self.reject(field, "must not be empty".to_string());
        } else {
            self.check_len(field, value);
        }
        value.to_string()
    }

    /// Trimmed value of an optional text field; present-but-blank is a violation.
    pub fn optional(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        let value = value?;
        Some(self.required(field, value))
    }

    pub fn limit(&mut self, field: &str, value: Option<u32>, range: LimitRange) -> usize {
        let value = value.unwrap_or(range.default);
        if !(range.min..=range.max).contains(&value) {
            self.reject(
                field,
                format!("must be between {} and {}, got {value}", range.min, range.max),
            );
        }
        value as usize
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation {
                violations: self.violations,
            })
        }
    }

    fn check_len(&mut self, field: &str, value: &str) {
        if value.chars().count() > MAX_TEXT_LEN {
            self.reject(field, format!("must be at most {MAX_TEXT_LEN} characters"));
        }
    }

    fn reject(&mut self, field: &str, message: String) {
        self.violations.push(FieldViolation {
            field: field.to_string(),
            message,
        });
    }
}
