//! Modal forms and their acknowledgments.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::core::{Error, Result};

/// Client-side receipt for a submitted modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Acknowledgment {
    pub id: Uuid,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Acknowledgment {
    pub fn new(message: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), message: message.into(), at: Utc::now() }
    }

    /// Short reference shown to the user.
    pub fn reference(&self) -> String {
        self.id.simple().to_string()[..8].to_uppercase()
    }
}

/// One input of a modal form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    /// Fixed options; empty for free text
    pub choices: &'static [&'static str],
}

impl FormField {
    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self { key, label, value: String::new(), choices: &[] }
    }

    /// A field limited to `choices`, starting at the first one.
    pub fn choice(key: &'static str, label: &'static str, choices: &'static [&'static str]) -> Self {
        let value = choices.first().map(ToString::to_string).unwrap_or_default();
        Self { key, label, value, choices }
    }

    pub fn is_choice(&self) -> bool {
        !self.choices.is_empty()
    }

    fn cycle(&mut self, forward: bool) {
        if self.choices.is_empty() {
            return;
        }
        let n = self.choices.len();
        let current = self.choices.iter().position(|c| *c == self.value).unwrap_or(0);
        let next = if forward { (current + 1) % n } else { (current + n - 1) % n };
        self.value = self.choices[next].to_string();
    }
}

/// Modal dialog with a list of fields and a single focused input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalForm {
    pub title: &'static str,
    pub fields: Vec<FormField>,
    pub focus: usize,
    /// Last validation failure, shown inline
    pub error: Option<String>,
}

impl ModalForm {
    pub fn new(title: &'static str, fields: Vec<FormField>) -> Self {
        Self { title, fields, focus: 0, error: None }
    }

    /// Value of a field; empty if the key is unknown.
    pub fn value(&self, key: &str) -> &str {
        self.fields.iter().find(|f| f.key == key).map_or("", |f| f.value.as_str())
    }

    /// Set a field by key. Unknown keys are ignored.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.key == key) {
            field.value = value.into();
        }
    }

    /// Trimmed value, or a validation error naming the field.
    pub fn required(&self, key: &str) -> Result<&str> {
        let value = self.value(key).trim();
        if value.is_empty() {
            Err(Error::validation(key, "is required"))
        } else {
            Ok(value)
        }
    }

    /// Parse a `YYYY-MM-DD` field.
    pub fn date(&self, key: &str) -> Result<NaiveDate> {
        let raw = self.required(key)?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| Error::validation(key, format!("'{raw}' is not a YYYY-MM-DD date")))
    }

    pub fn focused(&self) -> Option<&FormField> {
        self.fields.get(self.focus)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Type into the focused text field.
    pub fn enter_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if !field.is_choice() {
                field.value.push(c);
            }
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if !field.is_choice() {
                field.value.pop();
            }
        }
    }

    /// Step through the options of the focused choice field.
    pub fn cycle_choice(&mut self, forward: bool) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.cycle(forward);
        }
    }

    /// Run a validator, keeping the error on the form when it fails.
    pub(crate) fn check<T>(&mut self, validate: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let result = validate(self);
        self.error = result.as_ref().err().map(ToString::to_string);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ModalForm {
        ModalForm::new(
            "Test",
            vec![
                FormField::choice("kind", "Kind", &["a", "b", "c"]),
                FormField::text("date", "Date"),
            ],
        )
    }

    #[test]
    fn test_choice_cycles() {
        let mut form = form();
        assert_eq!(form.value("kind"), "a");
        form.cycle_choice(false);
        assert_eq!(form.value("kind"), "c");
        form.cycle_choice(true);
        assert_eq!(form.value("kind"), "a");
        form.enter_char('x');
        assert_eq!(form.value("kind"), "a");
    }

    #[test]
    fn test_typing_and_focus() {
        let mut form = form();
        form.focus_prev();
        assert_eq!(form.focused().map(|f| f.key), Some("date"));
        for c in "2025-10-01".chars() {
            form.enter_char(c);
        }
        assert_eq!(form.date("date").unwrap(), NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
        form.delete_char();
        assert!(form.date("date").is_err());
    }

    #[test]
    fn test_check_records_error() {
        let mut form = form();
        let err = form.check(|f| f.required("date").map(str::to_string)).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(form.error.as_deref(), Some("date: is required"));
        form.set("date", "x");
        form.check(|f| f.required("date").map(str::to_string)).unwrap();
        assert!(form.error.is_none());
    }

    #[test]
    fn test_acknowledgment_reference() {
        let ack = Acknowledgment::new("ok");
        assert_eq!(ack.reference().len(), 8);
        assert_ne!(ack.id, Acknowledgment::new("ok").id);
    }
}
