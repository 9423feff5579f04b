use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use super::error::EnvResult;
use super::loader::{locate_env_file, read_env_file};
use super::options::StoreOptions;
use super::EnvMap;

/// Outcome of a successful [`VarStore::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub path: PathBuf,
    /// Keys inserted by this load, in file order.
    pub loaded: Vec<String>,
    /// Keys found in the file but left alone because the store already had them.
    pub preserved: Vec<String>,
    pub malformed: usize,
}

/// Key-value store backing configuration lookups.
///
/// A seeded store starts from the current process environment, and an
/// exporting store writes every change back into it so values become visible
/// to child processes. Isolated stores only ever touch their own map.
#[derive(Debug, Clone)]
pub struct VarStore {
    vars: EnvMap,
    options: StoreOptions,
}

impl VarStore {
    /// Empty store that does not read or write the process environment.
    pub fn new() -> Self {
        Self::with_options(StoreOptions::isolated())
    }

    /// Store seeded from and mirrored into the process environment.
    pub fn from_process() -> Self {
        Self::with_options(StoreOptions::default())
    }

    pub fn with_options(options: StoreOptions) -> Self {
        let vars = if options.seed {
            // non-unicode entries cannot be represented in the map
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect()
        } else {
            EnvMap::new()
        };
        Self { vars, options }
    }

    /// Loads `<dir>/.env` (or the configured file name) into the store.
    ///
    /// Keys the store already holds are never overwritten, so loading the
    /// same file twice is a no-op and host-provided values win over the file.
    pub fn load(&mut self, dir: impl AsRef<Path>) -> EnvResult<LoadReport> {
        let path = locate_env_file(dir.as_ref(), &self.options.file_name)?;
        debug!(path = %path.display(), mode = ?self.options.mode, "loading env file");

        let parsed = read_env_file(&path, self.options.mode)?;
        let mut report = LoadReport {
            path: parsed.path,
            malformed: parsed.malformed,
            ..LoadReport::default()
        };

        for (key, value) in parsed.entries {
            if self.vars.contains_key(&key) {
                trace!(key = %key, "keeping existing value");
                report.preserved.push(key);
                continue;
            }
            self.export(&key, &value);
            self.vars.insert(key.clone(), value);
            report.loaded.push(key);
        }

        debug!(
            loaded = report.loaded.len(),
            preserved = report.preserved.len(),
            malformed = report.malformed,
            "env file loaded"
        );
        Ok(report)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        self.export(&key, &value);
        self.vars.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        if self.options.export && is_exportable(key, "") {
            std::env::remove_var(key);
        }
        self.vars.remove(key)
    }

    /// Presence check; an empty value still counts as set.
    pub fn has(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// True when every key is present. An empty list is vacuously true.
    pub fn has_all<I, K>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter().all(|key| self.has(key.as_ref()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    fn export(&self, key: &str, value: &str) {
        if !self.options.export {
            return;
        }
        if is_exportable(key, value) {
            std::env::set_var(key, value);
        } else {
            warn!(key = %key, "key cannot be exported to the process environment");
        }
    }
}

impl Default for VarStore {
    fn default() -> Self {
        Self::new()
    }
}

// std::env::set_var panics on these
fn is_exportable(key: &str, value: &str) -> bool {
    !key.is_empty() && !key.contains(|c: char| c == '=' || c == '\0') && !value.contains('\0')
}
