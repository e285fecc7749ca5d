//! Client side of the transport adapter
//!
//! [`RecordClient`] speaks the REST surface of one variant and decodes its
//! envelope; [`FormSession`] ties a [`crate::form::Draft`] to a client the
//! way a form dialog would.

mod session;

pub use session::{FormMode, FormSession, SubmitError};

use crate::record::Record;
use crate::schema::{FieldErrors, RecordSchema, Values};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// HTTP client for one variant
#[derive(Debug, Clone)]
pub struct RecordClient {
    http: reqwest::Client,
    base_url: String,
    schema: Arc<RecordSchema>,
}

impl RecordClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:8080`
    pub fn new(base_url: impl Into<String>, schema: Arc<RecordSchema>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, schema)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>, schema: Arc<RecordSchema>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url, schema }
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    pub fn collection_url(&self) -> String {
        format!("{}/api/{}", self.base_url, self.schema.variant())
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    pub async fn list(&self, filter: Option<&str>) -> ClientResult<Vec<Record>> {
        let mut url = self.collection_url();
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            url = format!("{}?{}={}", url, self.schema.search_param(), urlencoding::encode(filter));
        }
        let body = decode(self.http.get(&url).send().await?).await?;
        let list = self
            .schema
            .envelope()
            .unwrap_list(body)
            .ok_or_else(|| ClientError::Decode("missing list envelope".to_string()))?;
        serde_json::from_value(list).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn get(&self, id: i64) -> ClientResult<Record> {
        let body = decode(self.http.get(self.item_url(id)).send().await?).await?;
        self.record_from(body)
    }

    pub async fn create(&self, values: &Values) -> ClientResult<Record> {
        let body = decode(self.http.post(self.collection_url()).json(values).send().await?).await?;
        self.record_from(body)
    }

    pub async fn update(&self, id: i64, values: &Values) -> ClientResult<Record> {
        let body = decode(self.http.put(self.item_url(id)).json(values).send().await?).await?;
        self.record_from(body)
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        decode(self.http.delete(self.item_url(id)).send().await?).await?;
        Ok(())
    }

    fn record_from(&self, body: Value) -> ClientResult<Record> {
        let item = self
            .schema
            .envelope()
            .unwrap_item(body)
            .ok_or_else(|| ClientError::Decode("missing record envelope".to_string()))?;
        serde_json::from_value(item).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// Map a response to its JSON body or the matching error
async fn decode(resp: Response) -> ClientResult<Value> {
    let status = resp.status();
    let body: Value = match resp.bytes().await {
        Ok(bytes) if bytes.is_empty() => Value::Null,
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))?,
        Err(e) => return Err(ClientError::Transport(e)),
    };
    if status.is_success() {
        return Ok(body);
    }

    let message = body.get("error").and_then(Value::as_str).unwrap_or("unknown error").to_string();
    match status {
        StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
        StatusCode::BAD_REQUEST => match body.get("fieldErrors") {
            Some(errors) => {
                let errors: FieldErrors =
                    serde_json::from_value(errors.clone()).map_err(|e| ClientError::Decode(e.to_string()))?;
                Err(ClientError::Validation(errors))
            }
            None => Err(ClientError::BadRequest(message)),
        },
        other => Err(ClientError::Server { status: other.as_u16(), message }),
    }
}
