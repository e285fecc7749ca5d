pub mod init_db;
pub mod schema;
pub mod serve;

use anyhow::Result;
use formstore_core::config::{FormstoreConfig, CONFIG_FILE};
use std::path::Path;

/// Configuration from `path` (or `formstore.toml`) and the environment
pub fn load_config(path: Option<&Path>) -> Result<FormstoreConfig> {
    match path {
        Some(path) if !path.exists() => anyhow::bail!("Config file not found: {}", path.display()),
        Some(path) => FormstoreConfig::load_from(path),
        None => FormstoreConfig::load_from(CONFIG_FILE),
    }
}

pub fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread().enable_all().build()?)
}
