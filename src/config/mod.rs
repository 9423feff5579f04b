mod loader;

pub use loader::{load_config, EnvstoreConfig, CONFIG_FILE_NAME};
