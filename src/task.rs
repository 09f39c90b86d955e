use anyhow::Result;
use log::{info, warn};
use std::collections::BTreeMap;
use std::io::Write;
use std::rc::Rc;

use crate::config::{display_value, Config};
use crate::error::TaskError;

const BUILD_DESCRIPTION: &str = "Build all styles and styleguide (for production).";

/// Signature shared by every task body
pub type TaskFn = dyn Fn(&Config, &mut dyn Write) -> Result<()>;

/// A named build task
#[derive(Clone)]
pub struct Task {
    name: String,
    description: String,
    action: Rc<TaskFn>,
}

impl Task {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Run the task body against a loaded configuration
    pub fn run(&self, config: &Config, out: &mut dyn Write) -> Result<()> {
        (self.action)(config, out)
    }

    /// The same task body and description under another name
    fn renamed(&self, name: &str) -> Task {
        Task {
            name: name.to_string(),
            description: self.description.clone(),
            action: Rc::clone(&self.action),
        }
    }
}

/// Registry of tasks that can be run by name
#[derive(Clone, Default)]
pub struct TaskRegistry {
    tasks: BTreeMap<String, Task>,
}

impl TaskRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in `build` and `default` tasks
    pub fn with_builtin_tasks() -> Self {
        let mut registry = Self::new();
        let build = registry.register("build", BUILD_DESCRIPTION, build);
        registry.insert(build.renamed("default"));
        registry
    }

    /// Register a task, replacing any existing task with the same name.
    ///
    /// Returns a handle to the registered task.
    pub fn register<F>(&mut self, name: &str, description: &str, action: F) -> Task
    where
        F: Fn(&Config, &mut dyn Write) -> Result<()> + 'static,
    {
        let task = Task {
            name: name.to_string(),
            description: description.to_string(),
            action: Rc::new(action),
        };
        self.insert(task.clone());
        task
    }

    /// Register `name` as running the same body as `target`
    pub fn alias(&mut self, name: &str, target: &str) -> Result<(), TaskError> {
        let task = self
            .tasks
            .get(target)
            .ok_or_else(|| TaskError::NotFound(target.to_string()))?
            .renamed(name);

        self.insert(task);
        Ok(())
    }

    fn insert(&mut self, task: Task) {
        self.tasks.insert(task.name.clone(), task);
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    /// Task names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.tasks.keys().map(String::as_str).collect()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Run the named task
    pub fn run(&self, name: &str, config: &Config, out: &mut dyn Write) -> Result<(), TaskError> {
        let task = self
            .get(name)
            .ok_or_else(|| TaskError::NotFound(name.to_string()))?;

        info!("Starting '{}'...", name);
        task.run(config, out).map_err(|source| TaskError::Failed {
            name: name.to_string(),
            source: source.into(),
        })?;
        info!("Finished '{}'", name);

        Ok(())
    }
}

/// Print the `hello` value from the configuration
fn build(config: &Config, out: &mut dyn Write) -> Result<()> {
    match config.get("hello") {
        Some(value) => writeln!(out, "{}", display_value(value))?,
        None => warn!("Key 'hello' is not set in the configuration"),
    }
    Ok(())
}
