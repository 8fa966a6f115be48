//! Submitted form payloads and their validation.
//!
//! Every form deserializes from `application/x-www-form-urlencoded` into
//! plain strings so that rejected input can be echoed back unchanged.

pub mod accounts;
pub mod recipes;

use std::collections::BTreeMap;

pub use accounts::{LoginForm, PasswordResetForm, SetPasswordForm, SignupForm};
pub use recipes::{IngredientForm, InstructionForm, RecipeForm};

pub const REQUIRED: &str = "This field is required.";
pub const NOT_A_NUMBER: &str = "Enter a whole number.";

/// Validation messages keyed by field, plus form-wide ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
    non_field: Vec<String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has(&self, field: &str) -> bool {
        !self.field(field).is_empty()
    }

    pub fn non_field(&self) -> &[String] {
        &self.non_field
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

pub(crate) fn required_text(
    errors: &mut FormErrors,
    field: &'static str,
    value: &str,
    max_len: usize,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    } else {
        check_max_len(errors, field, value, max_len);
    }
    value.to_string()
}

pub(crate) fn optional_text(
    errors: &mut FormErrors,
    field: &'static str,
    value: &str,
    max_len: Option<usize>,
) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Some(max_len) = max_len {
        check_max_len(errors, field, value, max_len);
    }
    Some(value.to_string())
}

pub(crate) fn positive_integer(errors: &mut FormErrors, field: &'static str, value: &str) -> i32 {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
        return 0;
    }
    match value.parse::<i32>() {
        Ok(number) if number >= 1 => number,
        Ok(number) => {
            errors.add(field, "Ensure this value is greater than or equal to 1.");
            number
        }
        Err(_) => {
            errors.add(field, NOT_A_NUMBER);
            0
        }
    }
}

fn check_max_len(errors: &mut FormErrors, field: &'static str, value: &str, max_len: usize) {
    let len = value.chars().count();
    if len > max_len {
        errors.add(
            field,
            format!("Ensure this value has at most {max_len} characters (it has {len})."),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{FormErrors, REQUIRED, optional_text, positive_integer, required_text};

    #[test]
    fn required_text_trims_and_flags_blank_values() {
        let mut errors = FormErrors::new();

        assert_eq!(required_text(&mut errors, "name", "  Soup ", 10), "Soup");
        assert!(errors.is_empty());

        required_text(&mut errors, "name", "   ", 10);
        assert_eq!(errors.field("name"), [REQUIRED.to_string()]);
    }

    #[test]
    fn max_length_counts_characters() {
        let mut errors = FormErrors::new();

        required_text(&mut errors, "amount", &"é".repeat(20), 20);
        assert!(errors.is_empty());

        required_text(&mut errors, "amount", &"é".repeat(21), 20);
        assert_eq!(
            errors.field("amount"),
            ["Ensure this value has at most 20 characters (it has 21).".to_string()]
        );
    }

    #[test]
    fn blank_optional_text_becomes_none() {
        let mut errors = FormErrors::new();

        assert_eq!(optional_text(&mut errors, "notes", "   ", None), None);
        assert_eq!(
            optional_text(&mut errors, "notes", " salt to taste ", None),
            Some("salt to taste".to_string())
        );
    }

    #[test]
    fn positive_integer_boundaries() {
        let mut errors = FormErrors::new();
        assert_eq!(positive_integer(&mut errors, "servings", "1"), 1);
        assert!(errors.is_empty());

        for bad in ["0", "-1", "two", ""] {
            let mut errors = FormErrors::new();
            positive_integer(&mut errors, "servings", bad);
            assert!(errors.has("servings"), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn into_result_passes_value_through_when_clean() {
        assert_eq!(FormErrors::new().into_result(5), Ok(5));

        let mut errors = FormErrors::new();
        errors.add_non_field("nope");
        assert!(errors.into_result(5).is_err());
    }
}
