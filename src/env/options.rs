use serde::Deserialize;

pub const DEFAULT_FILE_NAME: &str = ".env";

/// How malformed lines in an env file are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Skip malformed lines and keep loading the rest of the file.
    #[default]
    Tolerant,
    /// Fail on the first malformed line without merging anything.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub mode: LoadMode,
    /// Start from a snapshot of the process environment, so host values
    /// win over file values on load.
    pub seed: bool,
    /// Mirror every write back into the process environment.
    pub export: bool,
    pub file_name: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            mode: LoadMode::default(),
            seed: true,
            export: true,
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl StoreOptions {
    /// Options for a store that never touches the process environment.
    pub fn isolated() -> Self {
        Self {
            seed: false,
            export: false,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }
}
