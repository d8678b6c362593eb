//! Form validation rules applied before anything is submitted.
//!
//! Mirrors the usual form validators: `required`, `min_len`, `email` and
//! `min_value`. Rules accumulate per field; the first failing rule for a field
//! wins so messages stay readable.

use crate::error::{DomainError, DomainResult};

/// Per-field validation failures, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for `field`, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, msg)| msg.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(f, msg)| (*f, msg.as_str()))
    }

    fn has(&self, field: &str) -> bool {
        self.0.iter().any(|(f, _)| *f == field)
    }
}

impl core::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, (field, msg)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field} {msg}")?;
        }
        Ok(())
    }
}

/// Accumulating validator.
///
/// ```
/// use vitrine_core::Validator;
///
/// let mut v = Validator::new();
/// v.required("email", "").email("email", "");
/// assert_eq!(v.errors().get("email"), Some("is required"));
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(&mut self, field: &'static str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, "is required".to_string());
        }
        self
    }

    pub fn min_len(&mut self, field: &'static str, value: &str, min: usize) -> &mut Self {
        if value.chars().count() < min {
            self.fail(field, format!("must be at least {min} characters"));
        }
        self
    }

    pub fn email(&mut self, field: &'static str, value: &str) -> &mut Self {
        if !looks_like_email(value) {
            self.fail(field, "must be a valid email address".to_string());
        }
        self
    }

    pub fn min_value(&mut self, field: &'static str, value: f64, min: f64) -> &mut Self {
        if !value.is_finite() {
            self.fail(field, "must be a number".to_string());
        } else if value < min {
            self.fail(field, format!("must be at least {min}"));
        }
        self
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// `Ok(())` when every rule passed, otherwise a `DomainError::Validation`
    /// listing the failing fields.
    pub fn finish(self) -> DomainResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(self.errors.to_string()))
        }
    }

    fn fail(&mut self, field: &'static str, msg: String) {
        if !self.errors.has(field) {
            self.errors.0.push((field, msg));
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}
