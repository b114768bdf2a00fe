use std::{
    io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::output::ViewConfig;
use crate::budget::BudgetConfig;

pub const DEFAULT_CONFIG_FILE: &str = "config";
pub const DEFAULT_LOG_FILE: &str = "log";

/// Everything the config file can hold. Sections are flattened, so the file is a single JSON
/// object like `{"LabelGrouping": ["cat"], "LogFile": "/home/me/log"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(flatten)]
    pub budget: BudgetConfig,
    #[serde(flatten)]
    pub file: FileConfig,
    #[serde(flatten)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FileConfig {
    pub log_file: Option<PathBuf>,
    /// Additional logs merged into the main one.
    pub log_files: Vec<PathBuf>,
}

impl FileConfig {
    pub fn log_file(&self, app_dir: &Path) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| app_dir.join(DEFAULT_LOG_FILE))
    }

    pub fn log_paths(&self, app_dir: &Path) -> Vec<PathBuf> {
        std::iter::once(self.log_file(app_dir))
            .chain(self.log_files.iter().cloned())
            .collect()
    }
}

/// Loads the config file. An explicitly requested file has to exist, the default one is optional.
pub async fn load_config(path: Option<&Path>, app_dir: &Path) -> Result<Config> {
    let (path, must_exist) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (app_dir.join(DEFAULT_CONFIG_FILE), false),
    };

    let text = match tokio::fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound && !must_exist => {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Unable to read config file {}", path.display()))
        }
    };

    serde_json::from_str(&text)
        .with_context(|| format!("Unable to parse config file {}", path.display()))
}
