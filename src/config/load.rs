use crate::config::Configuration;
use crate::error::ConfigError;
use anyhow::Context;
use std::fs;
use std::path::Path;

/// Read a configuration file, choosing the parser by extension.
///
/// An empty `script` is filled in with the sibling `<stem>.py` module, which
/// is where the transform callables are expected to live.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<Configuration> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let mut cfg: Configuration = match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&text)
            .with_context(|| format!("parse YAML config {}", path.display()))?,
        "json" => serde_json::from_str(&text)
            .with_context(|| format!("parse JSON config {}", path.display()))?,
        _ => return Err(ConfigError::UnsupportedFormat { extension }.into()),
    };

    if cfg.script.is_empty() {
        let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        cfg.script = absolute.with_extension("py").display().to_string();
    }

    Ok(cfg)
}
