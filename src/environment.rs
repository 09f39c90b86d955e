use anyhow::{anyhow, Context, Result};
use log::debug;
use std::fs;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE_NAME};
use crate::error::LoaderResult;

const STARTER_CONFIG: &str = r#"# Gulpfiles configuration
#
# Tasks read their settings from this file.
hello: world
"#;

/// The directory a build runs in and the config file it reads
#[derive(Clone, Debug)]
pub struct Environment {
    root_dir: PathBuf,
    config_file: PathBuf,
}

impl Environment {
    /// Create an environment rooted at `root_dir`, reading `gulpfile.yml` from it
    pub fn new(root_dir: PathBuf) -> Self {
        let config_file = root_dir.join(CONFIG_FILE_NAME);

        Self {
            root_dir,
            config_file,
        }
    }

    /// Read the configuration from `config_file` instead of the default.
    ///
    /// Relative paths resolve against the root directory.
    pub fn with_config_file(mut self, config_file: PathBuf) -> Self {
        self.config_file = if config_file.is_absolute() {
            config_file
        } else {
            self.root_dir.join(config_file)
        };
        self
    }

    /// Write a starter `gulpfile.yml`
    pub fn init(&self) -> Result<()> {
        if self.config_file.exists() {
            return Err(anyhow!("{} already exists", self.config_file.display()));
        }

        fs::create_dir_all(&self.root_dir).context("Failed to create project directory")?;

        fs::write(&self.config_file, STARTER_CONFIG)
            .context(format!("Failed to write {}", self.config_file.display()))?;

        debug!("Wrote starter config to {}", self.config_file.display());
        Ok(())
    }

    /// Check if the config file exists
    pub fn exists(&self) -> bool {
        self.config_file.is_file()
    }

    /// Get the path to the config file
    pub fn get_config_path(&self) -> PathBuf {
        self.config_file.clone()
    }

    /// Load the configuration for this environment
    pub fn load_config(&self) -> LoaderResult<Config> {
        Config::load(&self.config_file)
    }
}
