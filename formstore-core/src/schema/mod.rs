//! Record schemas
//!
//! A [`RecordSchema`] is the closed field table of one variant (`todo8`,
//! `todo9`, ...) plus the few wire conventions that differ between variants:
//! which fields are searched, the name of the search query parameter, and the
//! JSON envelope used for responses.
//!
//! Everything else in the crate (form drafts, the SQL store, the gateway, the
//! HTTP handler and client) is generic over a schema.
//!
//! # Example
//!
//! ```rust,ignore
//! use formstore_core::schema::{FieldDef, RecordSchema};
//!
//! let schema = RecordSchema::builder("notes")
//!     .field(FieldDef::text("title").required())
//!     .field(FieldDef::text("content"))
//!     .field(FieldDef::flag("pinned"))
//!     .build()?;
//! ```

pub mod field;
pub mod variants;

pub use field::{FieldDef, FieldKind, FieldValue};

use crate::record::Record;
use serde_json::Value;
use std::collections::BTreeMap;

/// Field values keyed by field name
pub type Values = BTreeMap<String, FieldValue>;

/// Per-field error messages keyed by field name
pub type FieldErrors = BTreeMap<String, String>;

/// Columns managed by the store, never declared by a schema
pub const RESERVED_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Schema construction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),
    #[error("field '{0}' is declared twice")]
    DuplicateField(String),
    #[error("field '{0}' is managed by the store and cannot be declared")]
    ReservedField(String),
    #[error("search field '{0}' is not a declared text field")]
    InvalidSearchField(String),
    #[error("field '{field}' has an invalid default: {reason}")]
    InvalidDefault { field: String, reason: String },
    #[error("schema '{0}' declares no fields")]
    NoFields(String),
}

/// Payload rejected before or during field validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// The payload is not a JSON object
    Malformed(String),
    /// One or more fields failed their checks
    Invalid(FieldErrors),
}

/// JSON envelope used when returning records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// Lists are bare arrays, records bare objects
    Bare,
    /// Lists are `{list_key: [...]}`, records `{item_key: {...}}`
    Wrapped { list_key: String, item_key: String },
}

impl Envelope {
    /// The `{"todos": [...]}` / `{"todo": {...}}` convention
    pub fn todos() -> Self {
        Envelope::Wrapped { list_key: "todos".to_string(), item_key: "todo".to_string() }
    }

    pub fn wrap_list(&self, records: &[Record]) -> Value {
        let list = serde_json::to_value(records).unwrap_or_else(|_| Value::Array(Vec::new()));
        match self {
            Envelope::Bare => list,
            Envelope::Wrapped { list_key, .. } => serde_json::json!({ list_key.as_str(): list }),
        }
    }

    pub fn wrap_item(&self, record: &Record) -> Value {
        let item = serde_json::to_value(record).unwrap_or(Value::Null);
        match self {
            Envelope::Bare => item,
            Envelope::Wrapped { item_key, .. } => serde_json::json!({ item_key.as_str(): item }),
        }
    }

    pub fn unwrap_list(&self, mut body: Value) -> Option<Value> {
        match self {
            Envelope::Bare => Some(body),
            Envelope::Wrapped { list_key, .. } => body.get_mut(list_key.as_str()).map(Value::take),
        }
    }

    pub fn unwrap_item(&self, mut body: Value) -> Option<Value> {
        match self {
            Envelope::Bare => Some(body),
            Envelope::Wrapped { item_key, .. } => body.get_mut(item_key.as_str()).map(Value::take),
        }
    }
}

/// Closed field table of one record variant
#[derive(Debug, Clone)]
pub struct RecordSchema {
    variant: String,
    table: String,
    fields: Vec<FieldDef>,
    title_field: String,
    content_field: String,
    search_param: String,
    envelope: Envelope,
}

impl RecordSchema {
    pub fn builder(variant: &str) -> RecordSchemaBuilder {
        RecordSchemaBuilder::new(variant)
    }

    /// Variant name, also the last segment of `/api/<variant>`
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// SQL table holding this variant's records
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn title_field(&self) -> &str {
        &self.title_field
    }

    pub fn content_field(&self) -> &str {
        &self.content_field
    }

    /// Query parameter carrying the list filter
    pub fn search_param(&self) -> &str {
        &self.search_param
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// A value for every declared field, all defaults
    pub fn defaults(&self) -> Values {
        self.fields.iter().map(|f| (f.name.clone(), f.default_value())).collect()
    }

    /// Names of the required fields, in declaration order
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter(|f| f.required).map(|f| f.name.as_str())
    }

    /// Check a set of values against the field table.
    ///
    /// Undeclared names are dropped and omitted fields take their defaults.
    /// On success every declared field is present in the result.
    pub fn validate_values(&self, values: &Values) -> Result<Values, FieldErrors> {
        let mut out = Values::new();
        let mut errors = FieldErrors::new();
        for def in &self.fields {
            let value = values.get(&def.name).cloned().unwrap_or_else(|| def.default_value());
            if let Err(message) = def.check(&value) {
                errors.insert(def.name.clone(), message);
            }
            out.insert(def.name.clone(), value);
        }
        if errors.is_empty() {
            Ok(out)
        } else {
            Err(errors)
        }
    }

    /// Decode and validate a JSON payload.
    ///
    /// The payload must be an object. Keys outside the field table (including
    /// `id` and the timestamps) are ignored; missing or `null` fields take
    /// their defaults; a JSON type that does not match the field kind is a
    /// field error.
    pub fn parse_payload(&self, payload: &Value) -> Result<Values, PayloadError> {
        let object = payload
            .as_object()
            .ok_or_else(|| PayloadError::Malformed("expected a JSON object".to_string()))?;

        let mut values = Values::new();
        let mut errors = FieldErrors::new();
        for def in &self.fields {
            match object.get(&def.name) {
                None | Some(Value::Null) => {}
                Some(Value::Bool(b)) if def.kind == FieldKind::Flag => {
                    values.insert(def.name.clone(), FieldValue::Flag(*b));
                }
                Some(Value::String(s)) if def.kind.is_textual() => {
                    values.insert(def.name.clone(), FieldValue::Text(s.clone()));
                }
                Some(_) => {
                    let expected = if def.kind.is_textual() { "a string" } else { "a boolean" };
                    errors.insert(def.name.clone(), format!("{} must be {}", def.label, expected));
                }
            }
        }

        match self.validate_values(&values) {
            Ok(valid) if errors.is_empty() => Ok(valid),
            Ok(_) => Err(PayloadError::Invalid(errors)),
            Err(check_errors) => {
                // shape errors win over check errors for the same field
                for (field, message) in check_errors {
                    errors.entry(field).or_insert(message);
                }
                Err(PayloadError::Invalid(errors))
            }
        }
    }

    /// Field table as JSON, for schema-driven form renderers
    pub fn describe(&self) -> Value {
        serde_json::json!({
            "variant": self.variant,
            "table": self.table,
            "titleField": self.title_field,
            "contentField": self.content_field,
            "searchParam": self.search_param,
            "fields": self.fields.iter().map(FieldDef::describe).collect::<Vec<_>>(),
        })
    }
}

/// Builder for [`RecordSchema`]
pub struct RecordSchemaBuilder {
    variant: String,
    table: Option<String>,
    fields: Vec<FieldDef>,
    title_field: String,
    content_field: String,
    search_param: String,
    envelope: Envelope,
}

impl RecordSchemaBuilder {
    fn new(variant: &str) -> Self {
        Self {
            variant: variant.to_string(),
            table: None,
            fields: Vec::new(),
            title_field: "title".to_string(),
            content_field: "content".to_string(),
            search_param: "search".to_string(),
            envelope: Envelope::Bare,
        }
    }

    /// Table name (defaults to the variant name)
    pub fn table(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn title_field(mut self, name: &str) -> Self {
        self.title_field = name.to_string();
        self
    }

    pub fn content_field(mut self, name: &str) -> Self {
        self.content_field = name.to_string();
        self
    }

    pub fn search_param(mut self, name: &str) -> Self {
        self.search_param = name.to_string();
        self
    }

    pub fn envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }

    pub fn build(self) -> Result<RecordSchema, SchemaError> {
        let table = self.table.unwrap_or_else(|| self.variant.clone());
        check_identifier(&self.variant)?;
        check_identifier(&table)?;

        if self.fields.is_empty() {
            return Err(SchemaError::NoFields(self.variant));
        }

        for (i, def) in self.fields.iter().enumerate() {
            check_field_identifier(&def.name)?;
            if RESERVED_FIELDS.contains(&def.name.as_str()) {
                return Err(SchemaError::ReservedField(def.name.clone()));
            }
            if self.fields[..i].iter().any(|other| other.name == def.name) {
                return Err(SchemaError::DuplicateField(def.name.clone()));
            }
            if let Some(default) = &def.default {
                // a required field may legitimately default to empty
                let probe = FieldDef { required: false, ..def.clone() };
                probe.check(default).map_err(|reason| SchemaError::InvalidDefault {
                    field: def.name.clone(),
                    reason,
                })?;
            }
            if let FieldKind::Choice(options) = def.kind {
                if options.is_empty() {
                    return Err(SchemaError::InvalidDefault {
                        field: def.name.clone(),
                        reason: "choice declares no options".to_string(),
                    });
                }
            }
        }

        for search in [&self.title_field, &self.content_field] {
            match self.fields.iter().find(|f| &f.name == search) {
                Some(def) if def.kind.is_textual() => {}
                _ => return Err(SchemaError::InvalidSearchField(search.clone())),
            }
        }

        Ok(RecordSchema {
            variant: self.variant,
            table,
            fields: self.fields,
            title_field: self.title_field,
            content_field: self.content_field,
            search_param: self.search_param,
            envelope: self.envelope,
        })
    }
}

/// SQL-safe lowercase identifier
fn check_identifier(name: &str) -> Result<(), SchemaError> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(SchemaError::InvalidIdentifier(name.to_string()))
    }
}

/// Field names may also use camelCase (todo9 declares `foodOrange`, `pubDate`)
fn check_field_identifier(name: &str) -> Result<(), SchemaError> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(SchemaError::InvalidIdentifier(name.to_string()))
    }
}
