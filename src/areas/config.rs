//! User configuration
//!
//! A small JSON file (`~/.castor.json` unless `CASTOR_CONFIG` points elsewhere)
//! holding the API token used for pull request lookups and an optional upper
//! bound on how long a single git command may run.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "CASTOR_CONFIG";
const CONFIG_FILE: &str = ".castor.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub token: Option<String>,
    pub git_timeout_secs: Option<u64>,
}

impl Config {
    pub fn default_path() -> anyhow::Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        dirs::home_dir()
            .map(|home| home.join(CONFIG_FILE))
            .context("could not determine the home directory")
    }

    /// Load the config, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Config::default());
            }
            Err(error) => {
                return Err(error).with_context(|| format!("failed to read config at {:?}", path));
            }
        };

        serde_json::from_str(&content).with_context(|| format!("invalid config at {:?}", path))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(path)
            .with_context(|| format!("failed to open config at {:?}", path))?;
        file.write_all(content.as_bytes())?;

        Ok(())
    }

    pub fn git_timeout(&self) -> Option<Duration> {
        self.git_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
