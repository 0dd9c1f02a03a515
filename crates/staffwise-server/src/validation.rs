//! Explicit request validation.
//!
//! Request bodies deserialize into structs whose fields are all optional.
//! Each handler then runs a `validate()` built on [`FieldErrors`], which
//! records every problem before any write happens and reports them together
//! as a single [`Error::Validation`].

use chrono::NaiveDate;
use staffwise_core::{Error, Result, Seniority};

/// Accumulates per-field validation failures.
///
/// The accessor methods always return a value so validation can continue
/// past the first failure; the placeholder returned for an invalid field is
/// never used because [`FieldErrors::finish`] fails first.
#[derive(Debug, Default)]
pub struct FieldErrors {
    problems: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, problem: String) {
        self.problems.push(problem);
    }

    /// A present, non-blank string. Surrounding whitespace is trimmed.
    pub fn required_text(&mut self, field: &str, value: Option<String>) -> String {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => v,
            _ => {
                self.push(format!("{field} is required"));
                String::new()
            }
        }
    }

    /// A present, positive row id.
    pub fn required_id<T: From<i64>>(&mut self, field: &str, value: Option<i64>) -> T {
        match value {
            Some(v) if v > 0 => T::from(v),
            Some(_) => {
                self.push(format!("{field} must be a positive integer"));
                T::from(0)
            }
            None => {
                self.push(format!("{field} is required"));
                T::from(0)
            }
        }
    }

    /// A present `YYYY-MM-DD` date.
    pub fn required_date(&mut self, field: &str, value: Option<String>) -> NaiveDate {
        match value {
            Some(v) => self.parse_date(field, &v).unwrap_or(NaiveDate::MIN),
            None => {
                self.push(format!("{field} is required"));
                NaiveDate::MIN
            }
        }
    }

    /// An optional `YYYY-MM-DD` date; `null` and absent are both `None`.
    pub fn optional_date(&mut self, field: &str, value: Option<String>) -> Option<NaiveDate> {
        value.and_then(|v| self.parse_date(field, &v))
    }

    fn parse_date(&mut self, field: &str, raw: &str) -> Option<NaiveDate> {
        match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(d) => Some(d),
            Err(_) => {
                self.push(format!("{field} must be a date (YYYY-MM-DD)"));
                None
            }
        }
    }

    /// A present integer in `0..=u32::MAX`.
    pub fn required_hours(&mut self, field: &str, value: Option<i64>) -> u32 {
        match value {
            Some(v) => u32::try_from(v).unwrap_or_else(|_| {
                self.push(format!("{field} must be a non-negative integer"));
                0
            }),
            None => {
                self.push(format!("{field} is required"));
                0
            }
        }
    }

    /// A present seniority code or label.
    pub fn required_seniority(&mut self, field: &str, value: Option<String>) -> Seniority {
        match value {
            Some(v) => v.parse().unwrap_or_else(|_: Error| {
                let codes: Vec<&str> = Seniority::ALL.iter().map(|s| s.code()).collect();
                self.push(format!(
                    "{field} must be one of {} (got '{}')",
                    codes.join(", "),
                    v.trim()
                ));
                Seniority::Junior
            }),
            None => {
                self.push(format!("{field} is required"));
                Seniority::Junior
            }
        }
    }

    /// Record a cross-field rule.
    pub fn check(&mut self, ok: bool, problem: &str) {
        if !ok {
            self.push(problem.to_string());
        }
    }

    /// Fail with every recorded problem, or succeed if there were none.
    pub fn finish(self) -> Result<()> {
        if self.problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self.problems.join("; ")))
        }
    }
}
