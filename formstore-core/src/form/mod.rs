//! Client-side form drafts
//!
//! A [`Draft`] holds the in-progress values of one form, coerces raw input
//! events into typed field values, validates against the variant's schema and
//! guards submission with an explicit state machine:
//!
//! ```text
//! Empty ──set_field──▶ Editing ──validate ok──▶ Validated ──begin_submit──▶ Submitting
//!                        ▲  ▲                       │                      │       │
//!                        │  └──────set_field────────┘                 Ok   │       │ Err
//!                        │                                                 ▼       ▼
//!                        └──────────────set_field──────────── Failed ◀──┘   Submitted (→ Empty)
//! ```

mod input;

pub use input::{InputType, RawInput};

use crate::schema::{FieldErrors, FieldKind, FieldValue, RecordSchema, Values};
use std::sync::Arc;

/// Lifecycle of a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    Empty,
    Editing,
    Validated,
    Submitting,
    Submitted,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("unknown field '{0}'")]
    FieldUnknown(String),
    #[error("field '{field}' expects {expected}")]
    TypeMismatch { field: String, expected: &'static str },
    #[error("draft is being submitted")]
    Busy,
    #[error("draft must be validated before submission")]
    NotValidated,
    #[error("draft is not being submitted")]
    NotSubmitting,
}

/// In-progress values of one form
#[derive(Debug, Clone)]
pub struct Draft {
    schema: Arc<RecordSchema>,
    values: Values,
    errors: FieldErrors,
    state: DraftState,
    failure: Option<String>,
}

impl Draft {
    /// Fresh draft filled with the schema defaults
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        let values = schema.defaults();
        Self { schema, values, errors: FieldErrors::new(), state: DraftState::Empty, failure: None }
    }

    /// Draft pre-filled from an existing record's values.
    ///
    /// Only declared fields are taken, and only when their type matches the
    /// field kind; everything else keeps its default.
    pub fn from_base(schema: Arc<RecordSchema>, base: &Values) -> Self {
        let mut draft = Self::new(schema);
        for def in draft.schema.fields() {
            if let Some(value) = base.get(&def.name) {
                let fits = match value {
                    FieldValue::Flag(_) => def.kind == FieldKind::Flag,
                    FieldValue::Text(_) => def.kind.is_textual(),
                };
                if fits {
                    draft.values.insert(def.name.clone(), value.clone());
                }
            }
        }
        draft
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn state(&self) -> DraftState {
        self.state
    }

    /// Message of the last failed submission, if the draft is in `Failed`
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Apply one input event to a field
    pub fn set_field(&mut self, name: &str, input: RawInput) -> Result<(), DraftError> {
        if self.state == DraftState::Submitting {
            return Err(DraftError::Busy);
        }
        let def = self.schema.field(name).ok_or_else(|| DraftError::FieldUnknown(name.to_string()))?;
        let value = input.coerce(def)?;

        self.values.insert(name.to_string(), value);
        self.errors.remove(name);
        self.failure = None;
        self.state = DraftState::Editing;
        Ok(())
    }

    /// Check the current values; stores and returns the field errors on failure
    pub fn validate(&mut self) -> Result<Values, FieldErrors> {
        if self.state == DraftState::Submitting {
            // state is frozen while a submission is in flight
            return self.schema.validate_values(&self.values);
        }
        match self.schema.validate_values(&self.values) {
            Ok(values) => {
                self.errors.clear();
                self.failure = None;
                self.state = DraftState::Validated;
                Ok(values)
            }
            Err(errors) => {
                self.errors = errors.clone();
                if self.state != DraftState::Failed {
                    self.state = DraftState::Editing;
                }
                Err(errors)
            }
        }
    }

    /// Enter `Submitting` and return the payload to send
    pub fn begin_submit(&mut self) -> Result<Values, DraftError> {
        match self.state {
            DraftState::Submitting => Err(DraftError::Busy),
            DraftState::Validated => {
                self.state = DraftState::Submitting;
                Ok(self.values.clone())
            }
            _ => Err(DraftError::NotValidated),
        }
    }

    /// Leave `Submitting`.
    ///
    /// On success the draft reports `Submitted` and is reset to a fresh
    /// `Empty` draft. On failure it keeps its values and enters `Failed`.
    pub fn finish_submit(&mut self, outcome: Result<(), String>) -> Result<DraftState, DraftError> {
        if self.state != DraftState::Submitting {
            return Err(DraftError::NotSubmitting);
        }
        match outcome {
            Ok(()) => {
                self.reset();
                Ok(DraftState::Submitted)
            }
            Err(message) => {
                self.failure = Some(message);
                self.state = DraftState::Failed;
                Ok(DraftState::Failed)
            }
        }
    }

    /// Attach field errors reported by the server after a rejected submission
    pub fn absorb_errors(&mut self, errors: FieldErrors) {
        self.errors.extend(errors);
    }

    /// Back to defaults and `Empty`
    pub fn reset(&mut self) {
        self.values = self.schema.defaults();
        self.errors.clear();
        self.failure = None;
        self.state = DraftState::Empty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::variants;

    fn todo9_draft() -> Draft {
        Draft::new(Arc::new(variants::todo9().unwrap()))
    }

    #[test]
    fn test_new_draft_defaults() {
        let draft = todo9_draft();
        assert_eq!(draft.state(), DraftState::Empty);
        assert_eq!(draft.value("public"), Some(&FieldValue::Flag(false)));
        assert_eq!(draft.value("title"), Some(&FieldValue::from("")));
        assert_eq!(draft.values().len(), 10);
    }

    #[test]
    fn test_from_base_takes_declared_fields_only() {
        let mut base = Values::new();
        base.insert("title".into(), "t".into());
        base.insert("public".into(), true.into());
        base.insert("content".into(), true.into());
        base.insert("extra".into(), "x".into());

        let draft = Draft::from_base(Arc::new(variants::todo9().unwrap()), &base);
        assert_eq!(draft.value("title"), Some(&FieldValue::from("t")));
        assert_eq!(draft.value("public"), Some(&FieldValue::Flag(true)));
        assert_eq!(draft.value("content"), Some(&FieldValue::from("")));
        assert!(draft.value("extra").is_none());
        assert_eq!(draft.state(), DraftState::Empty);
    }

    #[test]
    fn test_set_field_coercion() {
        let mut draft = todo9_draft();
        draft.set_field("foodApple", RawInput::checkbox(true)).unwrap();
        draft.set_field("qty1", RawInput::text("3")).unwrap();
        draft.set_field("public", RawInput::text("on")).unwrap();
        assert_eq!(draft.value("foodApple"), Some(&FieldValue::Flag(true)));
        assert_eq!(draft.value("qty1"), Some(&FieldValue::from("3")));
        assert_eq!(draft.value("public"), Some(&FieldValue::Flag(true)));
        assert_eq!(draft.state(), DraftState::Editing);
    }

    #[test]
    fn test_set_field_errors() {
        let mut draft = todo9_draft();
        assert_eq!(
            draft.set_field("nope", RawInput::text("x")),
            Err(DraftError::FieldUnknown("nope".into()))
        );
        assert!(matches!(
            draft.set_field("title", RawInput::checkbox(true)),
            Err(DraftError::TypeMismatch { .. })
        ));
        assert!(matches!(
            draft.set_field("public", RawInput::text("maybe")),
            Err(DraftError::TypeMismatch { .. })
        ));
        assert_eq!(draft.state(), DraftState::Empty);
    }

    #[test]
    fn test_validate_flags_exactly_empty_required() {
        let mut draft = todo9_draft();
        draft.set_field("content", RawInput::textarea("x")).unwrap();
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["title"]);
        assert_eq!(draft.state(), DraftState::Editing);
        assert_eq!(draft.errors().len(), 1);
    }

    #[test]
    fn test_free_form_date_passes_validation() {
        let mut draft = todo9_draft();
        draft.set_field("title", RawInput::text("a")).unwrap();
        draft.set_field("content", RawInput::text("b")).unwrap();
        draft.set_field("pubDate", RawInput::date("2024/01/05")).unwrap();
        let values = draft.validate().unwrap();
        assert_eq!(values["pubDate"], FieldValue::from("2024/01/05"));
        assert_eq!(draft.state(), DraftState::Validated);
    }

    #[test]
    fn test_editing_clears_only_that_error() {
        let mut draft = todo9_draft();
        let _ = draft.validate();
        assert_eq!(draft.errors().len(), 2);
        draft.set_field("title", RawInput::text("a")).unwrap();
        assert!(!draft.errors().contains_key("title"));
        assert!(draft.errors().contains_key("content"));
    }

    #[test]
    fn test_submit_cycle() {
        let mut draft = todo9_draft();
        assert_eq!(draft.begin_submit(), Err(DraftError::NotValidated));

        draft.set_field("title", RawInput::text("a")).unwrap();
        draft.set_field("content", RawInput::text("b")).unwrap();
        let payload = draft.validate().unwrap();
        assert_eq!(payload.len(), 10);
        assert_eq!(draft.state(), DraftState::Validated);

        draft.set_field("qty2", RawInput::text("1")).unwrap();
        assert_eq!(draft.state(), DraftState::Editing);
        draft.validate().unwrap();

        draft.begin_submit().unwrap();
        assert_eq!(draft.state(), DraftState::Submitting);
        assert_eq!(draft.begin_submit(), Err(DraftError::Busy));
        assert_eq!(draft.set_field("title", RawInput::text("x")), Err(DraftError::Busy));
        assert!(draft.validate().is_ok());
        assert_eq!(draft.state(), DraftState::Submitting);

        assert_eq!(draft.finish_submit(Ok(())), Ok(DraftState::Submitted));
        assert_eq!(draft.state(), DraftState::Empty);
        assert_eq!(draft.value("title"), Some(&FieldValue::from("")));
        assert_eq!(draft.finish_submit(Ok(())), Err(DraftError::NotSubmitting));
    }

    #[test]
    fn test_failed_submission_keeps_data() {
        let mut draft = todo9_draft();
        draft.set_field("title", RawInput::text("a")).unwrap();
        draft.set_field("content", RawInput::text("b")).unwrap();
        draft.validate().unwrap();
        draft.begin_submit().unwrap();

        assert_eq!(draft.finish_submit(Err("connection refused".into())), Ok(DraftState::Failed));
        assert_eq!(draft.state(), DraftState::Failed);
        assert_eq!(draft.failure(), Some("connection refused"));
        assert_eq!(draft.value("title"), Some(&FieldValue::from("a")));

        // retry straight from Failed
        draft.validate().unwrap();
        assert_eq!(draft.state(), DraftState::Validated);
        assert!(draft.failure().is_none());

        draft.set_field("title", RawInput::text("b")).unwrap();
        assert_eq!(draft.state(), DraftState::Editing);
        assert!(draft.failure().is_none());
    }

    #[test]
    fn test_absorb_server_errors() {
        let mut draft = todo9_draft();
        let mut errors = FieldErrors::new();
        errors.insert("title".into(), "title already taken".into());
        draft.absorb_errors(errors);
        assert_eq!(draft.errors().len(), 1);
    }
}
