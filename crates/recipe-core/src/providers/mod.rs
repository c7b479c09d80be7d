//! Real-execution providers
//!
//! Only step-into types ever reach a provider. Each provider returns whether
//! it changed anything, which drives notifications.

mod directory;
mod execute;
mod file;
mod link;
mod log;
mod template;

pub use directory::DirectoryProvider;
pub use execute::ExecuteProvider;
pub use file::FileProvider;
pub use link::LinkProvider;
pub use log::LogProvider;
pub use template::{CookbookFileProvider, TemplateProvider};

use recipe_fs::{NormalizedPath, io, ownership};
use serde_json::Value;
use std::collections::HashMap;

use crate::dispatch::DispatchContext;
use crate::resource::{Action, Resource};
use crate::{Error, Result};

/// Executes actions of one resource type for real.
pub trait Provider: Send + Sync {
    /// Run `action`; `Ok(true)` when system state changed.
    fn run(&self, resource: &Resource, action: &Action, ctx: &DispatchContext<'_>) -> Result<bool>;
}

/// Providers keyed by resource type.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Box<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in provider.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("file", FileProvider);
        registry.register("directory", DirectoryProvider);
        registry.register("template", TemplateProvider);
        registry.register("cookbook_file", CookbookFileProvider);
        registry.register("link", LinkProvider);
        registry.register("execute", ExecuteProvider);
        registry.register("script", ExecuteProvider);
        registry.register("log", LogProvider);
        registry
    }

    pub fn register(&mut self, resource_type: impl Into<String>, provider: impl Provider + 'static) {
        self.providers
            .insert(resource_type.into(), Box::new(provider));
    }

    pub fn get(&self, resource_type: &str) -> Option<&dyn Provider> {
        self.providers.get(resource_type).map(|p| p.as_ref())
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.providers.contains_key(resource_type)
    }
}

pub(crate) fn unsupported(resource: &Resource, action: &Action) -> Error {
    Error::UnsupportedAction {
        resource: resource.to_string(),
        action: action.to_string(),
    }
}

/// Absolute target of a filesystem resource.
pub(crate) fn target_path(resource: &Resource, ctx: &DispatchContext<'_>) -> NormalizedPath {
    NormalizedPath::resolve(ctx.root, resource.path())
}

/// Apply `mode`, `owner` and `group` attributes to an existing path.
pub(crate) fn apply_metadata(resource: &Resource, path: &NormalizedPath) -> Result<bool> {
    let mut changed = false;

    if let Some(mode) = resource.attribute("mode") {
        let mode = match mode {
            Value::String(s) => io::parse_mode(s),
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            _ => None,
        }
        .ok_or_else(|| Error::Execution {
            resource: resource.to_string(),
            message: format!("invalid mode {mode}"),
        })?;
        changed |= io::set_mode(path, mode)?;
    }

    changed |= ownership::chown(path, resource.owner(), resource.group())?;
    Ok(changed)
}
