use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use wordcard_config::Config;

const DEFAULT_CONFIG_FILE: &str = "wordcard.json";

fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    let file = File::open(path).with_context(|| format!("Failed to open config {}", path.display()))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    Ok(config)
}

/// An explicit path must exist. Otherwise `wordcard.json` is used when present,
/// falling back to environment variables and defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => load_config_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => load_config_file(Path::new(DEFAULT_CONFIG_FILE))?,
        None => return Ok(Config::new()),
    };

    // Keys are never stored in config files
    if config.generation.api_key.is_empty() {
        config.generation.api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
    }

    Ok(config)
}
