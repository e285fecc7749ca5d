//! Field definitions and field values
//!
//! A [`FieldDef`] is one row of a variant's field table: name, label, kind,
//! required flag and default. [`FieldValue`] is what a field holds at runtime,
//! both in drafts and in persisted records.

use serde::{Deserialize, Serialize};

/// Declared primitive type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-form string
    Text,
    /// Boolean flag (checkbox / radio)
    Flag,
    /// Date string as a date input emits it, stored verbatim
    Date,
    /// String restricted to a fixed set of options
    Choice(&'static [&'static str]),
}

impl FieldKind {
    /// Name used in schema descriptions
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Flag => "boolean",
            FieldKind::Date => "date",
            FieldKind::Choice(_) => "choice",
        }
    }

    /// True for kinds stored as strings
    pub fn is_textual(&self) -> bool {
        !matches!(self, FieldKind::Flag)
    }
}

/// Runtime value of a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            FieldValue::Text(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Flag(b) => serde_json::Value::Bool(*b),
            FieldValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// One entry of a variant's field table
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    /// Human-readable name used in error messages
    pub label: String,
    pub kind: FieldKind,
    /// Required fields must be non-empty at persistence time
    pub required: bool,
    /// Overrides the kind's default when set
    pub default: Option<FieldValue>,
}

impl FieldDef {
    fn with_kind(name: &str, kind: FieldKind) -> Self {
        Self { name: name.to_string(), label: name.to_string(), kind, required: false, default: None }
    }

    pub fn text(name: &str) -> Self {
        Self::with_kind(name, FieldKind::Text)
    }

    pub fn flag(name: &str) -> Self {
        Self::with_kind(name, FieldKind::Flag)
    }

    pub fn date(name: &str) -> Self {
        Self::with_kind(name, FieldKind::Date)
    }

    pub fn choice(name: &str, options: &'static [&'static str]) -> Self {
        Self::with_kind(name, FieldKind::Choice(options))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Value used when a draft or payload omits this field
    pub fn default_value(&self) -> FieldValue {
        if let Some(value) = &self.default {
            return value.clone();
        }
        match self.kind {
            FieldKind::Flag => FieldValue::Flag(false),
            FieldKind::Choice(options) => {
                FieldValue::Text(options.first().copied().unwrap_or_default().to_string())
            }
            FieldKind::Text | FieldKind::Date => FieldValue::Text(String::new()),
        }
    }

    /// Check one value against this definition, returning the user-facing message on failure
    pub fn check(&self, value: &FieldValue) -> Result<(), String> {
        match (self.kind, value) {
            (FieldKind::Flag, FieldValue::Flag(_)) => Ok(()),
            (FieldKind::Flag, FieldValue::Text(_)) => Err(format!("{} must be a boolean", self.label)),
            (_, FieldValue::Flag(_)) => Err(format!("{} must be a string", self.label)),
            (FieldKind::Text | FieldKind::Date, FieldValue::Text(s)) => self.check_presence(s),
            (FieldKind::Choice(options), FieldValue::Text(s)) => {
                if options.contains(&s.as_str()) {
                    Ok(())
                } else {
                    Err(format!("{} must be one of: {}", self.label, options.join(", ")))
                }
            }
        }
    }

    fn check_presence(&self, s: &str) -> Result<(), String> {
        if self.required && s.is_empty() {
            Err(format!("{} is required", self.label))
        } else {
            Ok(())
        }
    }

    /// JSON description for schema-driven form renderers
    pub fn describe(&self) -> serde_json::Value {
        let mut desc = serde_json::json!({
            "name": self.name,
            "label": self.label,
            "type": self.kind.type_name(),
            "required": self.required,
            "default": self.default_value().to_json(),
        });
        if let FieldKind::Choice(options) = self.kind {
            desc["options"] = serde_json::json!(options);
        }
        desc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_by_kind() {
        assert_eq!(FieldDef::text("a").default_value(), FieldValue::Text(String::new()));
        assert_eq!(FieldDef::flag("b").default_value(), FieldValue::Flag(false));
        assert_eq!(
            FieldDef::choice("s", &["pending", "completed"]).default_value(),
            FieldValue::Text("pending".to_string())
        );
        assert_eq!(FieldDef::text("c").with_default("x").default_value(), FieldValue::from("x"));
    }

    #[test]
    fn test_required_text() {
        let def = FieldDef::text("title").required().with_label("Title");
        assert_eq!(def.check(&FieldValue::from("")), Err("Title is required".to_string()));
        assert!(def.check(&FieldValue::from(" ")).is_ok());
        assert!(def.check(&FieldValue::from("x")).is_ok());
    }

    #[test]
    fn test_date_field() {
        let def = FieldDef::date("pubDate");
        assert!(def.check(&FieldValue::from("")).is_ok());
        assert!(def.check(&FieldValue::from("2024-02-29")).is_ok());
        // any string passes; only presence is checked
        assert!(def.check(&FieldValue::from("2024/01/05")).is_ok());
        assert!(def.check(&FieldValue::Flag(true)).is_err());
        assert_eq!(def.required().check(&FieldValue::from("")).unwrap_err(), "pubDate is required");
    }

    #[test]
    fn test_type_mismatch() {
        assert!(FieldDef::flag("public").check(&FieldValue::from("true")).is_err());
        assert!(FieldDef::text("title").check(&FieldValue::Flag(true)).is_err());
    }

    #[test]
    fn test_choice() {
        let def = FieldDef::choice("status", &["pending", "completed"]);
        assert!(def.check(&FieldValue::from("completed")).is_ok());
        let err = def.check(&FieldValue::from("done")).unwrap_err();
        assert_eq!(err, "status must be one of: pending, completed");
    }

    #[test]
    fn test_untagged_serde() {
        let v: FieldValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, FieldValue::Flag(true));
        let v: FieldValue = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(v, FieldValue::from("x"));
        assert!(serde_json::from_str::<FieldValue>("3").is_err());
    }
}
