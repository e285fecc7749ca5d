//! Form session: one draft, one dialog, one cached list

use super::{ClientError, RecordClient};
use crate::form::{Draft, DraftError, DraftState, RawInput};
use crate::record::Record;
use crate::schema::FieldErrors;

/// What a submit will do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Local validation failed; nothing was sent
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),
    #[error(transparent)]
    Draft(#[from] DraftError),
    /// Sent, but the server or the transport refused it
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Client-side state of one variant's form page
pub struct FormSession {
    client: RecordClient,
    draft: Draft,
    mode: FormMode,
    dialog_open: bool,
    records: Vec<Record>,
    filter: Option<String>,
    last_error: Option<String>,
}

impl FormSession {
    pub fn new(client: RecordClient) -> Self {
        let draft = Draft::new(client.schema().clone());
        Self {
            client,
            draft,
            mode: FormMode::Create,
            dialog_open: false,
            records: Vec::new(),
            filter: None,
            last_error: None,
        }
    }

    pub fn client(&self) -> &RecordClient {
        &self.client
    }

    /// Cached list, as of the last successful [`refresh`](Self::refresh)
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog_open
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn set_filter(&mut self, filter: Option<String>) {
        self.filter = filter.filter(|f| !f.is_empty());
    }

    /// Last fetch or submit failure, cleared by the next successful fetch
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Re-fetch the list; on failure the error is logged and the cache kept
    pub async fn refresh(&mut self) -> bool {
        match self.client.list(self.filter.as_deref()).await {
            Ok(records) => {
                self.records = records;
                self.last_error = None;
                true
            }
            Err(e) => {
                log::error!("❌ Failed to fetch {} records: {}", self.client.schema().variant(), e);
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    /// Open the dialog on a fresh draft
    pub fn open_create(&mut self) {
        self.draft.reset();
        self.mode = FormMode::Create;
        self.dialog_open = true;
    }

    /// Open the dialog on a draft pre-filled from `record`
    pub fn open_edit(&mut self, record: &Record) {
        self.draft = Draft::from_base(self.client.schema().clone(), &record.values);
        self.mode = FormMode::Edit(record.id);
        self.dialog_open = true;
    }

    /// Close the dialog and discard the draft
    pub fn close(&mut self) {
        self.dialog_open = false;
        self.mode = FormMode::Create;
        self.draft.reset();
    }

    pub fn set_field(&mut self, name: &str, input: RawInput) -> Result<(), DraftError> {
        self.draft.set_field(name, input)
    }

    /// Validate, send, refresh and close.
    ///
    /// Local validation errors stay on the draft and nothing is sent. When the
    /// server rejects the payload or the request fails, the draft keeps its
    /// values in `Failed` and the dialog stays open.
    pub async fn submit(&mut self) -> Result<Record, SubmitError> {
        self.draft.validate().map_err(SubmitError::Invalid)?;
        let payload = self.draft.begin_submit()?;

        let outcome = match self.mode {
            FormMode::Create => self.client.create(&payload).await,
            FormMode::Edit(id) => self.client.update(id, &payload).await,
        };

        match outcome {
            Ok(record) => {
                self.draft.finish_submit(Ok(()))?;
                self.refresh().await;
                self.close();
                Ok(record)
            }
            Err(e) => {
                log::error!("❌ Failed to submit {} form: {}", self.client.schema().variant(), e);
                self.draft.finish_submit(Err(e.to_string()))?;
                if let ClientError::Validation(errors) = &e {
                    self.draft.absorb_errors(errors.clone());
                }
                self.last_error = Some(e.to_string());
                Err(SubmitError::Client(e))
            }
        }
    }

    /// Delete after `confirm` agrees; `Ok(false)` when declined
    pub async fn delete<F>(&mut self, id: i64, confirm: F) -> Result<bool, ClientError>
    where
        F: FnOnce(i64) -> bool,
    {
        if !confirm(id) {
            return Ok(false);
        }
        if let Err(e) = self.client.delete(id).await {
            log::error!("❌ Failed to delete {} record {}: {}", self.client.schema().variant(), id, e);
            self.last_error = Some(e.to_string());
            return Err(e);
        }
        self.refresh().await;
        Ok(true)
    }

    /// True while a submit is in flight
    pub fn is_submitting(&self) -> bool {
        self.draft.state() == DraftState::Submitting
    }
}
