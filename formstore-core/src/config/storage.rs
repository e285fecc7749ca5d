//! Storage configuration

use crate::schema::variants::VARIANT_NAMES;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file, or `:memory:`
    /// Env: FS_DATABASE
    pub database: String,
    /// Variants served under `/api/<variant>`
    /// Env: FS_VARIANTS (comma-separated)
    pub variants: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: "./data/formstore.db".to_string(),
            variants: VARIANT_NAMES.iter().map(|v| v.to_string()).collect(),
        }
    }
}

impl StorageConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(database) = env::var("FS_DATABASE") {
            self.database = database;
        }
        if let Ok(variants) = env::var("FS_VARIANTS") {
            self.variants =
                variants.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.is_empty() {
            bail!("Invalid storage.database: path cannot be empty");
        }
        if self.variants.is_empty() {
            bail!("Invalid storage.variants: at least one variant is required");
        }
        for variant in &self.variants {
            if !VARIANT_NAMES.contains(&variant.as_str()) {
                bail!("Invalid storage.variants: unknown variant '{}' (known: {})", variant, VARIANT_NAMES.join(", "));
            }
        }
        Ok(())
    }
}
