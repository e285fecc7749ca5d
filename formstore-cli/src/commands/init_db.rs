use anyhow::Result;
use formstore_core::app::FormstoreServerBuilder;
use formstore_core::config::FormstoreConfig;
use formstore_core::logging::init_logging;
use std::path::Path;

/// Create every configured variant's table and exit.
pub fn run(config_path: Option<&Path>, database: Option<String>) -> Result<()> {
    let mut config = super::load_config(config_path)?;
    if let Some(database) = database {
        config.storage.database = database;
    }
    config.storage.validate()?;
    config.logging.validate()?;
    init_logging(&config.logging)?;

    let variants = super::runtime()?.block_on(init(config))?;
    println!("Initialized {} table(s): {}", variants.len(), variants.join(", "));
    Ok(())
}

async fn init(config: FormstoreConfig) -> Result<Vec<String>> {
    let server = FormstoreServerBuilder::with_config(config).build().await?;
    Ok(server.variants().into_iter().map(String::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formstore_core::schema::variants;
    use formstore_core::store::{RecordStore, SqliteStore};

    #[test]
    fn creates_tables_in_new_database() {
        let tmp = tempfile::tempdir().unwrap();
        let db = tmp.path().join("sub").join("forms.db");
        let mut config = FormstoreConfig::default();
        config.storage.database = db.to_string_lossy().into_owned();
        config.storage.variants = vec!["todo8".into(), "todo9".into()];

        let created = super::super::runtime().unwrap().block_on(init(config)).unwrap();
        assert_eq!(created, vec!["todo8", "todo9"]);
        assert!(db.exists());

        let store = SqliteStore::open(&db).unwrap();
        let rows = super::super::runtime()
            .unwrap()
            .block_on(async { store.list(&variants::todo9().unwrap(), None).await })
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = run(Some(Path::new("/nonexistent/formstore.toml")), None).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
