//! Persisted user settings
//!
//! Two independent keys are persisted: the theme preference and the
//! local-model configuration blob, one JSON file per key under a settings
//! directory. Reads and writes are synchronous and last-write-wins. There is
//! no schema versioning; a malformed blob is logged and silently replaced by
//! defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::error::Result;
use crate::llm::LlmConfig;

const THEME_KEY: &str = "theme";
const LLM_KEY: &str = "llm";

/// The persisted theme preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Light theme (the default)
    #[default]
    Light,
    /// Dark theme
    Dark,
}

impl ThemePreference {
    /// The opposite preference
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl std::fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

/// File-backed store for the persisted settings keys
#[derive(Debug, Clone)]
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    /// Create a store rooted at the given directory
    ///
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The store's directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the theme preference, defaulting on any problem
    pub fn load_theme(&self) -> ThemePreference {
        self.read_key(THEME_KEY)
    }

    /// Persist the theme preference
    pub fn save_theme(&self, theme: ThemePreference) -> Result<()> {
        self.write_key(THEME_KEY, &theme)
    }

    /// Load the local-model configuration, defaulting on any problem
    pub fn load_llm_config(&self) -> LlmConfig {
        self.read_key(LLM_KEY)
    }

    /// Persist the local-model configuration
    pub fn save_llm_config(&self, config: &LlmConfig) -> Result<()> {
        self.write_key(LLM_KEY, config)
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read_key<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let path = self.key_path(key);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                debug!("Settings key '{key}' not readable ({err}); using defaults");
                return T::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!("Settings key '{key}' is malformed ({err}); using defaults");
                T::default()
            }
        }
    }

    fn write_key<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let raw = serde_json::to_string_pretty(value)?;
        std::fs::write(self.key_path(key), raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmBackend;
    use tempfile::TempDir;

    #[test]
    fn theme_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path());

        store.save_theme(ThemePreference::Dark).unwrap();
        assert_eq!(store.load_theme(), ThemePreference::Dark);

        store.save_theme(store.load_theme().toggled()).unwrap();
        assert_eq!(store.load_theme(), ThemePreference::Light);
    }

    #[test]
    fn llm_config_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path());

        let config = LlmConfig {
            enabled: true,
            endpoint: "http://localhost:1234".to_string(),
            model: "qwen2.5".to_string(),
            backend: LlmBackend::ChatCompletion,
            timeout_ms: 5_000,
            ..LlmConfig::default()
        };
        store.save_llm_config(&config).unwrap();

        let loaded = store.load_llm_config();
        assert!(loaded.enabled);
        assert_eq!(loaded.endpoint, "http://localhost:1234");
        assert_eq!(loaded.model, "qwen2.5");
        assert_eq!(loaded.backend, LlmBackend::ChatCompletion);
        assert_eq!(loaded.timeout_ms, 5_000);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path());

        assert_eq!(store.load_theme(), ThemePreference::Light);
        assert!(!store.load_llm_config().enabled);
    }

    #[test]
    fn malformed_blobs_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path());

        std::fs::create_dir_all(dir.path()).unwrap();
        std::fs::write(dir.path().join("theme.json"), "not json at all").unwrap();
        std::fs::write(dir.path().join("llm.json"), "{\"enabled\": \"banana\"}").unwrap();

        assert_eq!(store.load_theme(), ThemePreference::Light);
        assert!(!store.load_llm_config().enabled);
    }

    #[test]
    fn last_write_wins() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path());

        store.save_theme(ThemePreference::Dark).unwrap();
        store.save_theme(ThemePreference::Light).unwrap();
        assert_eq!(store.load_theme(), ThemePreference::Light);
    }
}
