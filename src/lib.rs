//! Loads `gulpfile.yml` into an immutable [`Config`] and runs named build
//! tasks against it.

pub mod config;
pub mod environment;
pub mod error;
pub mod task;

pub use config::{Config, CONFIG_FILE_NAME};
pub use environment::Environment;
pub use error::{LoaderError, TaskError, PLUGIN_NAME};
pub use task::{Task, TaskRegistry};
