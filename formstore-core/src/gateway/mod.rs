//! Record store gateway
//!
//! One [`Gateway`] serves one variant. It re-validates every payload against
//! the variant's schema, runs the operation against the [`RecordStore`] and
//! reduces every outcome to a record, a list, an acknowledgement or a
//! [`GatewayError`].

use crate::record::Record;
use crate::schema::{FieldErrors, PayloadError, RecordSchema, Values};
use crate::store::{RecordStore, StoreError};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("{variant} record {id} not found")]
    NotFound { variant: String, id: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Validate-and-persist front for one variant
#[derive(Clone)]
pub struct Gateway {
    schema: Arc<RecordSchema>,
    store: Arc<dyn RecordStore>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway").field("variant", &self.schema.variant()).finish_non_exhaustive()
    }
}

impl Gateway {
    pub fn new(schema: Arc<RecordSchema>, store: Arc<dyn RecordStore>) -> Self {
        Self { schema, store }
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Create the backing table
    pub async fn prepare(&self) -> GatewayResult<()> {
        self.store.ensure_table(&self.schema).await.map_err(|e| self.store_failure("prepare", e))
    }

    pub async fn list(&self, filter: Option<&str>) -> GatewayResult<Vec<Record>> {
        let filter = filter.filter(|f| !f.is_empty());
        let records = self.store.list(&self.schema, filter).await.map_err(|e| self.store_failure("list", e))?;
        log::debug!("📋 {} list filter={:?} -> {} records", self.schema.variant(), filter, records.len());
        Ok(records)
    }

    pub async fn get(&self, id: i64) -> GatewayResult<Record> {
        self.store
            .get(&self.schema, id)
            .await
            .map_err(|e| self.store_failure("get", e))?
            .ok_or_else(|| self.not_found(id))
    }

    pub async fn create(&self, payload: &Value) -> GatewayResult<Record> {
        let values = self.check(payload)?;
        let record = self.store.insert(&self.schema, &values).await.map_err(|e| self.store_failure("create", e))?;
        log::info!("✅ Created {} record {}", self.schema.variant(), record.id);
        Ok(record)
    }

    /// Validation runs before the existence check
    pub async fn update(&self, id: i64, payload: &Value) -> GatewayResult<Record> {
        let values = self.check(payload)?;
        let record = self
            .store
            .update(&self.schema, id, &values)
            .await
            .map_err(|e| self.store_failure("update", e))?
            .ok_or_else(|| self.not_found(id))?;
        log::info!("✏️  Updated {} record {}", self.schema.variant(), id);
        Ok(record)
    }

    pub async fn delete(&self, id: i64) -> GatewayResult<()> {
        let deleted = self.store.delete(&self.schema, id).await.map_err(|e| self.store_failure("delete", e))?;
        if !deleted {
            return Err(self.not_found(id));
        }
        log::info!("🗑️  Deleted {} record {}", self.schema.variant(), id);
        Ok(())
    }

    /// Decode a request body into JSON
    pub fn decode_body(body: &[u8]) -> GatewayResult<Value> {
        serde_json::from_slice(body).map_err(|e| GatewayError::BadRequest(format!("invalid JSON body: {e}")))
    }

    /// Path ids that do not parse are treated as absent records
    pub fn parse_id(&self, raw: &str) -> GatewayResult<i64> {
        raw.parse::<i64>().map_err(|_| GatewayError::NotFound {
            variant: self.schema.variant().to_string(),
            id: raw.to_string(),
        })
    }

    fn check(&self, payload: &Value) -> GatewayResult<Values> {
        self.schema.parse_payload(payload).map_err(|e| match e {
            PayloadError::Malformed(reason) => GatewayError::BadRequest(reason),
            PayloadError::Invalid(errors) => {
                log::debug!("⚠️  {} payload rejected: {:?}", self.schema.variant(), errors);
                GatewayError::Validation(errors)
            }
        })
    }

    fn not_found(&self, id: i64) -> GatewayError {
        GatewayError::NotFound { variant: self.schema.variant().to_string(), id: id.to_string() }
    }

    fn store_failure(&self, operation: &str, error: StoreError) -> GatewayError {
        log::error!("❌ {} {} failed: {}", self.schema.variant(), operation, error);
        GatewayError::Store(error)
    }
}
