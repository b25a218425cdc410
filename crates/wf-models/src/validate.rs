//! Field validators
//!
//! Side-effect free checks used by every entity constructor and setter.
//! Each check returns the normalized value or the field's errors.

use chrono::NaiveDate;
use wf_core::error::ValidationErrors;

/// Date format accepted from text input
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Upper bound (inclusive) for hours worked in one record
pub const MAX_HOURS: f64 = 24.0;

pub type FieldResult<T> = Result<T, ValidationErrors>;

/// Values that may be interpreted as a number
///
/// Text input is trimmed and parsed; `None` means "not a number".
pub trait IntoNumber {
    fn into_number(self) -> Option<f64>;
}

impl IntoNumber for f64 {
    fn into_number(self) -> Option<f64> {
        Some(self)
    }
}

impl IntoNumber for f32 {
    fn into_number(self) -> Option<f64> {
        Some(f64::from(self))
    }
}

impl IntoNumber for i32 {
    fn into_number(self) -> Option<f64> {
        Some(f64::from(self))
    }
}

impl IntoNumber for i64 {
    fn into_number(self) -> Option<f64> {
        Some(self as f64)
    }
}

impl IntoNumber for u32 {
    fn into_number(self) -> Option<f64> {
        Some(f64::from(self))
    }
}

impl IntoNumber for &str {
    fn into_number(self) -> Option<f64> {
        self.trim().parse::<f64>().ok()
    }
}

impl IntoNumber for String {
    fn into_number(self) -> Option<f64> {
        self.as_str().into_number()
    }
}

impl IntoNumber for &String {
    fn into_number(self) -> Option<f64> {
        self.as_str().into_number()
    }
}

/// Values that may be interpreted as a calendar date
pub trait IntoDate {
    fn into_date(self) -> Option<NaiveDate>;
}

impl IntoDate for NaiveDate {
    fn into_date(self) -> Option<NaiveDate> {
        Some(self)
    }
}

impl IntoDate for &str {
    fn into_date(self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.trim(), DATE_FORMAT).ok()
    }
}

impl IntoDate for String {
    fn into_date(self) -> Option<NaiveDate> {
        self.as_str().into_date()
    }
}

impl IntoDate for &String {
    fn into_date(self) -> Option<NaiveDate> {
        self.as_str().into_date()
    }
}

/// Required text: trimmed, must not be empty
pub fn required_text(field: &str, value: &str) -> FieldResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationErrors::single(field, "can't be blank"));
    }
    Ok(trimmed.to_string())
}

/// Required text with a maximum length in characters
pub fn bounded_text(field: &str, value: &str, max: usize) -> FieldResult<String> {
    let trimmed = required_text(field, value)?;
    if trimmed.chars().count() > max {
        return Err(ValidationErrors::single(
            field,
            format!("is too long (maximum is {} characters)", max),
        ));
    }
    Ok(trimmed)
}

/// Optional text: trimmed, blank becomes `None`
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Monetary amount: finite and not negative (zero allowed)
pub fn non_negative_amount(field: &str, value: impl IntoNumber) -> FieldResult<f64> {
    match value.into_number() {
        Some(amount) if !amount.is_finite() => {
            Err(ValidationErrors::single(field, "must be a finite number"))
        }
        Some(amount) if amount < 0.0 => Err(ValidationErrors::single(field, "must not be negative")),
        Some(amount) => Ok(amount),
        None => Err(ValidationErrors::single(field, "is not a number")),
    }
}

/// Hours worked: numeric and within `(0, 24]`
pub fn hours(field: &str, value: impl IntoNumber) -> FieldResult<f64> {
    match value.into_number() {
        Some(h) if h.is_finite() && h > 0.0 && h <= MAX_HOURS => Ok(h),
        Some(_) => Err(ValidationErrors::single(
            field,
            format!("must be greater than 0 and at most {}", MAX_HOURS),
        )),
        None => Err(ValidationErrors::single(field, "is not a number")),
    }
}

/// Calendar date from a structured value or `YYYY-MM-DD` text
pub fn date(field: &str, value: impl IntoDate) -> FieldResult<NaiveDate> {
    value
        .into_date()
        .ok_or_else(|| ValidationErrors::single(field, "is not a valid date (use YYYY-MM-DD)"))
}
