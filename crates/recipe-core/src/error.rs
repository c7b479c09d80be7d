//! Error types for recipe-core

use std::path::PathBuf;

/// Result type for recipe-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or converging a run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A run-list entry names a recipe no cookbook path provides
    #[error("Recipe not found: {name} (searched {searched:?})")]
    RecipeNotFound { name: String, searched: Vec<PathBuf> },

    /// A run-list entry that is not `cookbook`, `cookbook::recipe` or `recipe[...]`
    #[error("Invalid run-list item: {item}")]
    InvalidRunListItem { item: String },

    /// An action outside the fixed action set of a known resource type
    #[error("Invalid action :{action} for {resource_type} resource")]
    InvalidAction {
        resource_type: String,
        action: String,
    },

    /// A recipe file that could not be turned into resources
    #[error("Invalid recipe at {path}: {message}")]
    InvalidRecipe { path: PathBuf, message: String },

    /// A guard predicate failed to evaluate
    #[error("Guard evaluation failed for {resource}: {message}")]
    GuardEvaluation { resource: String, message: String },

    /// A guard command could not be spawned
    #[error("Guard command `{command}` could not run: {source}")]
    GuardCommand {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Real execution was requested for an action no provider implements
    #[error("No provider can run action :{action} on {resource}")]
    UnsupportedAction { resource: String, action: String },

    /// A provider ran but failed
    #[error("Execution of {resource} failed: {message}")]
    Execution { resource: String, message: String },

    /// A notification names a resource that was never declared
    #[error("{resource} notifies {target}, which is not declared in this run")]
    NotificationTarget { resource: String, target: String },

    /// A template or cookbook file source could not be located
    #[error("Cookbook {cookbook} has no {file}")]
    TemplateNotFound { cookbook: String, file: String },

    /// Template rendering failed
    #[error(transparent)]
    Template(#[from] minijinja::Error),

    /// Filesystem error from recipe-fs
    #[error(transparent)]
    Fs(#[from] recipe_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
