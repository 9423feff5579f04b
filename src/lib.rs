#[cfg(feature = "cli")]
pub mod config;
pub mod env;
#[cfg(feature = "cli")]
pub mod logging;
#[cfg(feature = "cli")]
pub mod printer;

pub use env::{EnvError, EnvResult, LoadMode, LoadReport, StoreOptions, VarStore};
