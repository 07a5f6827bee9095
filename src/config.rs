//! Configuration file handling for daybook.
//!
//! The configuration file is stored at `$DAYBOOK_HOME/config.json`. The
//! `Config` object is constructed explicitly and passed by reference to
//! whatever needs it; there is no ambient global handle.

use crate::{utils, Result};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const DATA: &str = "data";

/// The persisted portion of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
struct ConfigFile {
    version: u8,
    /// Endpoint of the text-generation service used by task breakdown.
    /// Unset means the breakdown command is unavailable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    breakdown_url: Option<String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            breakdown_url: None,
        }
    }
}

/// Represents the configuration of the app. Instantiate it with the path to
/// `$DAYBOOK_HOME`; from there it loads `$DAYBOOK_HOME/config.json` and
/// provides the paths to the per-namespace data files.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    data_dir: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory and an initial `config.json` with default
    /// settings. Fails if the directory was already initialized.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the daybook home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let data_dir = root.join(DATA);
        utils::make_dir(&data_dir).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            return Err(anyhow!(
                "daybook home at {} is already initialized",
                root.display()
            )
            .into());
        }
        let config_file = ConfigFile::default();
        utils::serialize(&config_path, &config_file).await?;

        Ok(Self {
            root,
            data_dir,
            config_path,
            config_file,
        })
    }

    /// Loads an existing `config.json` from `dir`.
    pub async fn load(dir: impl Into<PathBuf>) -> Result<Self> {
        let root = utils::canonicalize(&dir.into())
            .await
            .context("daybook home not found; run 'daybook init' first")?;
        let config_path = root.join(CONFIG_JSON);
        let config_file: ConfigFile = utils::deserialize(&config_path).await?;
        if config_file.version != CONFIG_VERSION {
            return Err(anyhow!(
                "unsupported config version {} in {}",
                config_file.version,
                config_path.display()
            )
            .into());
        }
        Ok(Self {
            data_dir: root.join(DATA),
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the per-namespace JSON files.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn breakdown_url(&self) -> Option<&str> {
        self.config_file.breakdown_url.as_deref()
    }
}
