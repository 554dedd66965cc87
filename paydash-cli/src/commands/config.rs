use std::{fs, path::PathBuf};

use anyhow::{Context, Result, bail};
use paydash_shared::config::ClientConfig;

/// Generates a configuration file with default values.
///
/// # Arguments
/// * `format` - The format of the configuration file ("yaml" or "json").
/// * `output` - Destination; defaults to `paydash.<format>` in the working directory.
///
/// # Errors
/// Returns an error if the format is unsupported or if writing the file fails.
pub fn generate_config(format: &str, output: Option<PathBuf>) -> Result<()> {
    let config = ClientConfig::with_defaults();
    let (serialized, default_name) = match format {
        "yaml" => (serde_yml::to_string(&config)?, "paydash.yaml"),
        "json" => (serde_json::to_string_pretty(&config)?, "paydash.json"),
        _ => bail!("Unsupported format. Use 'yaml' or 'json'."),
    };

    let path = output.unwrap_or_else(|| PathBuf::from(default_name));
    fs::write(&path, serialized.as_bytes())
        .with_context(|| format!("failed to write configuration to {}", path.display()))?;

    println!("Configuration file '{}' generated successfully.", path.display());
    Ok(())
}
