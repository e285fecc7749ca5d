//! Builder pattern for FormstoreServer

use super::{FormstoreServer, Router};
use crate::config::FormstoreConfig;
use crate::gateway::Gateway;
use crate::http::RecordHandler;
use crate::schema::{variants, RecordSchema};
use crate::store::{RecordStore, SqliteStore};
use anyhow::{bail, Context, Result};
use std::sync::Arc;

/// Builder for FormstoreServer
pub struct FormstoreServerBuilder {
    config: FormstoreConfig,
    schemas: Vec<RecordSchema>,
    store: Option<Arc<dyn RecordStore>>,
}

impl FormstoreServerBuilder {
    /// Create a new builder from `formstore.toml` and the environment,
    /// falling back to defaults
    pub fn new() -> Self {
        Self::with_config(FormstoreConfig::load().unwrap_or_default())
    }

    /// Create a builder with custom configuration
    pub fn with_config(config: FormstoreConfig) -> Self {
        Self { config, schemas: Vec::new(), store: None }
    }

    // ========================================================================
    // SERVER CONFIGURATION
    // ========================================================================

    /// Set server port (overrides config file and env vars)
    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Set server host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.config.server.host = host.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.config.server.request_timeout = timeout;
        self
    }

    /// Set max body size
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.config.server.max_body_size = size;
        self
    }

    // ========================================================================
    // STORAGE & VARIANTS
    // ========================================================================

    /// SQLite database path (`:memory:` for a private in-memory database)
    pub fn with_database(mut self, path: impl Into<String>) -> Self {
        self.config.storage.database = path.into();
        self
    }

    /// Mount a custom variant
    ///
    /// Once any variant is added explicitly, `storage.variants` from the
    /// configuration is ignored.
    pub fn with_variant(mut self, schema: RecordSchema) -> Self {
        self.schemas.push(schema);
        self
    }

    /// Use an existing store instead of opening `storage.database`
    pub fn with_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Open the store, create every variant's table and mount the handlers
    pub async fn build(self) -> Result<FormstoreServer> {
        let schemas = if self.schemas.is_empty() {
            self.config.storage.validate()?;
            let mut schemas = Vec::new();
            for name in &self.config.storage.variants {
                let schema = variants::by_name(name)
                    .with_context(|| format!("Unknown variant '{}'", name))?
                    .with_context(|| format!("Invalid built-in variant '{}'", name))?;
                schemas.push(schema);
            }
            schemas
        } else {
            self.schemas
        };

        let store = match self.store {
            Some(store) => store,
            None => {
                let store = SqliteStore::open(&self.config.storage.database)
                    .with_context(|| format!("Failed to open database {}", self.config.storage.database))?;
                Arc::new(store) as Arc<dyn RecordStore>
            }
        };

        let mut router = Router::new();
        for schema in schemas {
            let variant = schema.variant().to_string();
            if router.contains(&variant) {
                bail!("Variant '{}' is mounted twice", variant);
            }

            let gateway = Gateway::new(Arc::new(schema), store.clone());
            gateway.prepare().await.with_context(|| format!("Failed to prepare table for {}", variant))?;
            log::info!("📦 Mounted {} at /api/{}", variant, variant);

            router.add_variant(Arc::new(RecordHandler::new(gateway, self.config.server.max_body_size)));
        }

        Ok(FormstoreServer::new(self.config, router))
    }
}

impl Default for FormstoreServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDef;

    #[tokio::test]
    async fn test_builds_configured_variants() {
        let mut config = FormstoreConfig::default();
        config.storage.database = ":memory:".into();
        config.storage.variants = vec!["todo10".into()];

        let server = FormstoreServerBuilder::with_config(config).build().await.unwrap();
        assert_eq!(server.variants(), vec!["todo10"]);
    }

    #[tokio::test]
    async fn test_custom_variant_replaces_configured() {
        let notes = RecordSchema::builder("notes")
            .field(FieldDef::text("title").required())
            .field(FieldDef::text("content"))
            .build()
            .unwrap();
        let server = FormstoreServerBuilder::with_config(FormstoreConfig::default())
            .with_store(Arc::new(SqliteStore::open_in_memory().unwrap()))
            .with_variant(notes)
            .build()
            .await
            .unwrap();
        assert_eq!(server.variants(), vec!["notes"]);
    }

    #[tokio::test]
    async fn test_rejects_unknown_and_duplicate_variants() {
        let mut config = FormstoreConfig::default();
        config.storage.database = ":memory:".into();
        config.storage.variants = vec!["todo7".into()];
        assert!(FormstoreServerBuilder::with_config(config).build().await.is_err());

        let result = FormstoreServerBuilder::with_config(FormstoreConfig::default())
            .with_database(":memory:")
            .with_variant(variants::todo8().unwrap())
            .with_variant(variants::todo8().unwrap())
            .build()
            .await;
        assert!(result.unwrap_err().to_string().contains("mounted twice"));
    }
}
