//! Task catalog: the static set of selectable tasks.
//!
//! The built-in catalog is embedded TOML. A custom catalog may be TOML or
//! JSON with the same shape (`tasks = [...]`); the format follows the file
//! extension.

use std::collections::HashMap;
use std::path::Path;

use arc_config::SelectorConfig;
use arc_core::entities::TaskDefinition;
use serde::Deserialize;

use crate::error::SelectorError;

const BUILTIN: &str = include_str!("../catalog/default.toml");

#[derive(Deserialize)]
struct CatalogFile {
    tasks: Vec<TaskDefinition>,
}

#[derive(Debug, Clone)]
pub struct TaskCatalog {
    tasks: Vec<TaskDefinition>,
    index: HashMap<String, usize>,
}

impl TaskCatalog {
    /// The embedded catalog of standard research, synthesis, and output tasks.
    ///
    /// # Errors
    ///
    /// Returns `SelectorError::Parse` or `SelectorError::Invalid` if the
    /// embedded file is malformed.
    pub fn builtin() -> Result<Self, SelectorError> {
        let file: CatalogFile = toml::from_str(BUILTIN).map_err(|e| SelectorError::Parse {
            path: "<builtin>".into(),
            message: e.to_string(),
        })?;
        Self::from_tasks(file.tasks)
    }

    /// Read a catalog from disk. `.json` files are parsed as JSON, anything
    /// else as TOML.
    ///
    /// # Errors
    ///
    /// Returns `SelectorError::Io` if the file cannot be read, `Parse` if it
    /// is malformed, and `Invalid` if it fails validation.
    pub fn load(path: &Path) -> Result<Self, SelectorError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| SelectorError::Io {
            path: display.clone(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let file: CatalogFile = if is_json {
            serde_json::from_str(&raw).map_err(|e| SelectorError::Parse {
                path: display.clone(),
                message: e.to_string(),
            })?
        } else {
            toml::from_str(&raw).map_err(|e| SelectorError::Parse {
                path: display.clone(),
                message: e.to_string(),
            })?
        };
        let catalog = Self::from_tasks(file.tasks)?;
        tracing::debug!(path = %path.display(), tasks = catalog.len(), "task catalog loaded");
        Ok(catalog)
    }

    /// The configured catalog file, or the built-in one when none is set.
    ///
    /// # Errors
    ///
    /// See [`TaskCatalog::load`].
    pub fn from_config(config: &SelectorConfig) -> Result<Self, SelectorError> {
        if config.catalog_path.trim().is_empty() {
            Self::builtin()
        } else {
            Self::load(Path::new(&config.catalog_path))
        }
    }

    /// Validate and index a task list.
    ///
    /// Ids must be unique, value scores finite and non-negative, and cost
    /// scores finite and positive. Dependencies are not resolved here; the
    /// selector rejects tasks whose dependencies are unknown.
    ///
    /// # Errors
    ///
    /// Returns `SelectorError::Invalid` naming the first offending task.
    pub fn from_tasks(tasks: Vec<TaskDefinition>) -> Result<Self, SelectorError> {
        let mut index = HashMap::with_capacity(tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            if task.id.trim().is_empty() {
                return Err(SelectorError::Invalid(format!("task #{i} has an empty id")));
            }
            if index.insert(task.id.clone(), i).is_some() {
                return Err(SelectorError::Invalid(format!("duplicate task id {}", task.id)));
            }
            if !task.expected_value_score.is_finite() || task.expected_value_score < 0.0 {
                return Err(SelectorError::Invalid(format!(
                    "{}: expected_value_score must be finite and non-negative",
                    task.id
                )));
            }
            if !task.expected_cost_score.is_finite() || task.expected_cost_score <= 0.0 {
                return Err(SelectorError::Invalid(format!(
                    "{}: expected_cost_score must be finite and positive",
                    task.id
                )));
            }
        }
        Ok(Self { tasks, index })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TaskDefinition> {
        self.index.get(id).map(|&i| &self.tasks[i])
    }

    #[must_use]
    pub fn tasks(&self) -> &[TaskDefinition] {
        &self.tasks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
