use anyhow::{Context, Result};
use formstore_core::schema::variants::{self, VARIANT_NAMES};

/// Print a built-in variant's field table.
pub fn run(variant: &str) -> Result<()> {
    println!("{}", describe(variant)?);
    Ok(())
}

fn describe(variant: &str) -> Result<String> {
    let schema = variants::by_name(variant)
        .with_context(|| format!("Unknown variant '{}' (known: {})", variant, VARIANT_NAMES.join(", ")))??;
    Ok(serde_json::to_string_pretty(&schema.describe())?)
}
