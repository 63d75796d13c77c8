use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::provider::{Difficulty, OpenTdbSettings, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::session::DEFAULT_AMOUNT;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub amount: usize,
    pub category: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            amount: DEFAULT_AMOUNT,
            category: None,
            difficulty: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl From<&Config> for OpenTdbSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            api_url: cfg.api_url.clone(),
            category: cfg.category,
            difficulty: cfg.difficulty,
            timeout: Duration::from_secs(cfg.timeout_secs),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "trivia") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("trivia_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => cfg,
                Err(err) => {
                    log::warn!("ignoring unreadable config {}: {err}", self.path.display());
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            amount: 25,
            category: Some(18),
            difficulty: Some(Difficulty::Hard),
            api_url: "http://localhost:8080/api.php".into(),
            timeout_secs: 3,
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{"amount": 5, "difficulty": "easy"}"#).unwrap();
        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.amount, 5);
        assert_eq!(cfg.difficulty, Some(Difficulty::Easy));
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn provider_settings_from_config() {
        let cfg = Config {
            timeout_secs: 4,
            category: Some(9),
            ..Config::default()
        };
        let settings = OpenTdbSettings::from(&cfg);
        assert_eq!(settings.timeout, Duration::from_secs(4));
        assert_eq!(settings.category, Some(9));
        assert_eq!(settings.api_url, DEFAULT_API_URL);
    }
}
