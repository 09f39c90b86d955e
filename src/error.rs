//! Error types for loading `gulpfile.yml` and running tasks.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name reported as the origin of every loader failure.
pub const PLUGIN_NAME: &str = "gulpfiles-core";

/// Errors that can occur while loading the configuration file.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// The file is missing, unreadable, or not UTF-8.
    #[error("[{}] {message}", PLUGIN_NAME)]
    Read {
        path: PathBuf,
        message: String,
        #[source]
        source: io::Error,
    },

    /// The file was read but is not well-formed YAML.
    #[error("[{}] failed to parse {}", PLUGIN_NAME, .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl LoaderError {
    pub(crate) fn read(path: &Path, source: io::Error) -> Self {
        LoaderError::Read {
            path: path.to_path_buf(),
            message: read_message(path, &source),
            source,
        }
    }

    pub(crate) fn parse(path: &Path, source: serde_yaml::Error) -> Self {
        LoaderError::Parse {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The component the failure originated from.
    pub fn plugin(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// Human-readable message without the plugin prefix.
    pub fn message(&self) -> String {
        match self {
            LoaderError::Read {
                message, source, ..
            } if source.kind() != io::ErrorKind::NotFound => format!("{}: {}", message, source),
            LoaderError::Read { message, .. } => message.clone(),
            LoaderError::Parse { path, source } => {
                format!("failed to parse {}: {}", path.display(), source)
            }
        }
    }

    /// Path of the file that failed to load.
    pub fn path(&self) -> &Path {
        match self {
            LoaderError::Read { path, .. } | LoaderError::Parse { path, .. } => path,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LoaderError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

fn read_message(path: &Path, source: &io::Error) -> String {
    if source.kind() == io::ErrorKind::NotFound {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        format!("{} not found!", name)
    } else {
        format!("failed to read {}", path.display())
    }
}

/// Errors raised by the task registry.
#[derive(Error, Debug)]
pub enum TaskError {
    /// No task is registered under the requested name.
    #[error("Task '{0}' is not in your gulpfile")]
    NotFound(String),

    /// The task ran and returned an error.
    #[error("Task '{name}' failed")]
    Failed {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type LoaderResult<T> = Result<T, LoaderError>;
