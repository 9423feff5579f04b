use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::env::{LoadMode, StoreOptions};

pub const CONFIG_FILE_NAME: &str = "envstore.json";

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct EnvstoreConfig {
    pub mode: Option<LoadMode>,
    pub export: Option<bool>,
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
}

impl EnvstoreConfig {
    /// Overlays the values set in the config file onto `options`.
    pub fn apply(&self, mut options: StoreOptions) -> StoreOptions {
        if let Some(mode) = self.mode {
            options.mode = mode;
        }
        if let Some(export) = self.export {
            options.export = export;
        }
        if let Some(name) = &self.file_name {
            options.file_name = name.clone();
        }
        options
    }
}

/// Reads `envstore.json` from `dir`. A missing file (or a `dir` that is not
/// a directory) yields `None`.
pub fn load_config(dir: &Path) -> Result<Option<EnvstoreConfig>> {
    let file_path = dir.join(CONFIG_FILE_NAME);
    if !file_path.is_file() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&file_path)
        .with_context(|| format!("reading config {}", file_path.display()))?;

    let config: EnvstoreConfig = serde_json::from_str(&contents)
        .with_context(|| format!("parsing config {}", file_path.display()))?;

    Ok(Some(config))
}
