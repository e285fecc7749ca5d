//! Raw input events and their coercion into field values

use super::DraftError;
use crate::schema::{FieldDef, FieldKind, FieldValue};

/// Kind of HTML control an input event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    TextArea,
    Select,
    Date,
    Checkbox,
    Radio,
}

impl InputType {
    /// Checkbox and radio controls report `checked` rather than `value`
    pub fn is_toggle(&self) -> bool {
        matches!(self, InputType::Checkbox | InputType::Radio)
    }
}

/// One input change event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInput {
    pub input_type: InputType,
    pub value: String,
    pub checked: bool,
}

impl RawInput {
    pub fn new(input_type: InputType, value: impl Into<String>) -> Self {
        Self { input_type, value: value.into(), checked: false }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(InputType::Text, value)
    }

    pub fn textarea(value: impl Into<String>) -> Self {
        Self::new(InputType::TextArea, value)
    }

    pub fn select(value: impl Into<String>) -> Self {
        Self::new(InputType::Select, value)
    }

    pub fn date(value: impl Into<String>) -> Self {
        Self::new(InputType::Date, value)
    }

    pub fn checkbox(checked: bool) -> Self {
        Self { input_type: InputType::Checkbox, value: "on".to_string(), checked }
    }

    pub fn radio(checked: bool) -> Self {
        Self { input_type: InputType::Radio, value: "on".to_string(), checked }
    }

    /// Coerce by the field's declared kind
    pub(crate) fn coerce(self, def: &FieldDef) -> Result<FieldValue, DraftError> {
        match (def.kind, self.input_type.is_toggle()) {
            (FieldKind::Flag, true) => Ok(FieldValue::Flag(self.checked)),
            (FieldKind::Flag, false) => parse_flag(&self.value).map(FieldValue::Flag).ok_or_else(|| {
                DraftError::TypeMismatch { field: def.name.clone(), expected: "a boolean" }
            }),
            (_, true) => Err(DraftError::TypeMismatch { field: def.name.clone(), expected: "a string" }),
            (_, false) => Ok(FieldValue::Text(self.value)),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "true" | "on" | "1" => Some(true),
        "false" | "off" | "0" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("on"), Some(true));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("TRUE"), None);
    }

    #[test]
    fn test_text_passes_through() {
        let def = FieldDef::date("pubDate");
        // dates pass through as typed
        assert_eq!(RawInput::date("20xx").coerce(&def), Ok(FieldValue::from("20xx")));
    }

    #[test]
    fn test_radio_into_flag() {
        let def = FieldDef::flag("public");
        assert_eq!(RawInput::radio(true).coerce(&def), Ok(FieldValue::Flag(true)));
        assert_eq!(RawInput::checkbox(false).coerce(&def), Ok(FieldValue::Flag(false)));
    }
}
