//! # Module Registry
//!
//! An ordered mapping from module display name to help text.
//!
//! Modules come either from a [`ModuleSource`] (the bundled
//! [`DirectorySource`] reads one JSON unit per file) or from direct
//! registration. Names are unique: registering an existing name replaces
//! its help text in place.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::menu_config::MenuConfig;
use crate::menu_errors::MenuError;

/// A named group of commands, described by its help text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub help_text: String,
}

impl Module {
    pub fn new(name: impl Into<String>, help_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help_text: help_text.into(),
        }
    }
}

/// One item produced by a module source: its label and the extraction result
pub type SourceUnit = (String, Result<Module, MenuError>);

/// Adapter turning an external source format into modules
pub trait ModuleSource {
    /// Human-readable location, used in logs
    fn location(&self) -> String;

    /// Enumerate the source. An `Err` means the source itself is missing or
    /// unreadable; per-unit failures are reported inside the list.
    fn units(&self) -> Result<Vec<SourceUnit>, MenuError>;
}

/// Reads every file of a directory as a JSON object and extracts the name
/// and help text from two configurable fields.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    path: PathBuf,
    module_field: String,
    help_field: String,
}

impl DirectorySource {
    pub fn new(path: impl Into<PathBuf>, module_field: &str, help_field: &str) -> Self {
        Self {
            path: path.into(),
            module_field: module_field.to_string(),
            help_field: help_field.to_string(),
        }
    }

    /// Directory source described by the configuration
    pub fn from_config(config: &MenuConfig) -> Self {
        Self::new(&config.modules_path, &config.module_field, &config.help_field)
    }

    fn extract(&self, file: &Path) -> Result<Module, MenuError> {
        let unit = file
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let fail = |reason: String| MenuError::ModuleUnit {
            unit: unit.clone(),
            reason,
        };

        let content = fs::read_to_string(file).map_err(|e| fail(e.to_string()))?;
        let value: Value = serde_json::from_str(&content).map_err(|e| fail(e.to_string()))?;

        let field = |name: &str| -> Result<String, MenuError> {
            match value.get(name) {
                Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
                Some(_) => Err(fail(format!("field {name} is not a non-empty string"))),
                None => Err(fail(format!("missing field {name}"))),
            }
        };

        Ok(Module::new(field(&self.module_field)?, field(&self.help_field)?))
    }
}

impl ModuleSource for DirectorySource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn units(&self) -> Result<Vec<SourceUnit>, MenuError> {
        let entries = fs::read_dir(&self.path)
            .map_err(|e| MenuError::ModuleSource(format!("{}: {e}", self.path.display())))?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        files.sort();

        Ok(files
            .into_iter()
            .map(|file| {
                let label = file
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default();
                let result = self.extract(&file);
                (label, result)
            })
            .collect())
    }
}

/// Outcome of a load from a module source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub failed: usize,
}

/// Ordered, name-unique set of modules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleRegistry {
    modules: Vec<Module>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registry content with the modules of `source`.
    ///
    /// A unit that fails extraction is logged and skipped. A missing or
    /// unreadable source leaves the registry empty.
    pub fn load_from_source(&mut self, source: &dyn ModuleSource) -> LoadReport {
        self.modules.clear();

        let units = match source.units() {
            Ok(units) => units,
            Err(e) => {
                warn!(source = %source.location(), error = %e, "Module source unavailable, registry is empty");
                return LoadReport::default();
            }
        };

        let mut report = LoadReport::default();
        for (label, result) in units {
            match result {
                Ok(module) => {
                    debug!(unit = %label, module = %module.name, "Loaded module");
                    self.register(&module.name, &module.help_text);
                    report.loaded += 1;
                }
                Err(e) => {
                    warn!(unit = %label, error = %e, "Failed to load module");
                    report.failed += 1;
                }
            }
        }

        info!(
            source = %source.location(),
            loaded = report.loaded,
            failed = report.failed,
            "Module registry loaded"
        );
        report
    }

    /// Insert or overwrite a module; no-op when either argument is empty
    pub fn register(&mut self, name: &str, help_text: &str) -> &mut Self {
        if name.is_empty() || help_text.is_empty() {
            return self;
        }

        match self.modules.iter_mut().find(|m| m.name == name) {
            Some(existing) => existing.help_text = help_text.to_string(),
            None => self.modules.push(Module::new(name, help_text)),
        }
        self
    }

    /// Remove a module; true when it existed
    pub fn unregister(&mut self, name: &str) -> bool {
        match self.modules.iter().position(|m| m.name == name) {
            Some(index) => {
                self.modules.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn help_text(&self, name: &str) -> Option<&str> {
        self.modules
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.help_text.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.help_text(name).is_some()
    }

    /// Module names in registry order
    pub fn names(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
