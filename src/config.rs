use crate::convert::ConvertOptions;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of `gbk-to-sqlite.toml`. Every field is optional; missing
/// fields fall back to [`ConvertOptions::default`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GbkConfig {
    pub database: Option<String>,
    pub batch_size: Option<usize>,
    pub create_indexes: Option<bool>,
    pub tune_pragmas: Option<bool>,
}

impl GbkConfig {
    /// Config written by `init`: every default spelled out
    pub fn with_defaults() -> Self {
        let defaults = ConvertOptions::default();
        Self {
            database: Some(default_database_path().display().to_string()),
            batch_size: Some(defaults.batch_size),
            create_indexes: Some(defaults.create_indexes),
            tune_pragmas: Some(defaults.tune_pragmas),
        }
    }

    pub fn to_options(&self) -> ConvertOptions {
        let defaults = ConvertOptions::default();
        ConvertOptions {
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
            create_indexes: self.create_indexes.unwrap_or(defaults.create_indexes),
            tune_pragmas: self.tune_pragmas.unwrap_or(defaults.tune_pragmas),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.database
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("gbk-to-sqlite.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("genbank.db")
}

pub fn load_config(path: Option<&Path>) -> Result<Option<GbkConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: GbkConfig = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    if config.batch_size == Some(0) {
        return Err(Error::InvalidBatchSize(0));
    }
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &GbkConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    let contents = toml::to_string_pretty(config).map_err(|e| Error::Config(e.to_string()))?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
