//! Environment store façade.
//!
//! [`VarStore`] is the context object to construct at startup and pass
//! around. The free functions below wrap a process-wide store guarded by a
//! single mutex, for code that cannot thread a store through; each call holds
//! the lock only for its own duration.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;

mod error;
mod loader;
mod options;
mod store;

pub use error::{EnvError, EnvResult};
pub use loader::{locate_env_file, parse_env_content, read_env_file, ParsedEnvFile};
pub use options::{LoadMode, StoreOptions, DEFAULT_FILE_NAME};
pub use store::{LoadReport, VarStore};

pub type EnvMap = BTreeMap<String, String>;

static GLOBAL: Lazy<Mutex<VarStore>> = Lazy::new(|| Mutex::new(VarStore::from_process()));

/// The process-wide store, seeded from the process environment on first use.
pub fn global() -> &'static Mutex<VarStore> {
    &GLOBAL
}

fn lock() -> MutexGuard<'static, VarStore> {
    // every operation leaves the map consistent, so a poisoned lock is still usable
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn load(dir: impl AsRef<Path>) -> EnvResult<LoadReport> {
    lock().load(dir)
}

pub fn get(key: &str) -> Option<String> {
    lock().get(key).map(str::to_owned)
}

pub fn get_or(key: &str, default: impl Into<String>) -> String {
    get(key).unwrap_or_else(|| default.into())
}

pub fn set(key: impl Into<String>, value: impl Into<String>) {
    lock().set(key, value);
}

pub fn has(key: &str) -> bool {
    lock().has(key)
}

pub fn has_all<I, K>(keys: I) -> bool
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    lock().has_all(keys)
}
