//! Convergence engine for recipespec
//!
//! This crate simulates converging a recipe against a node without touching
//! real system state, implementing:
//!
//! - **Resource model**: immutable declarations (type, name, action, attributes, guards)
//! - **Action dispatch**: an injectable [`ActionDispatcher`] that the engine calls for
//!   every resource, with an [`Interceptor`] deciding real execution vs record-only
//! - **Ledger**: ordered, append-only record of every dispatched resource
//! - **Runner**: builds the node, expands the run-list and drives convergence
//!
//! # Architecture
//!
//! ```text
//!              Runner
//!                 |
//!     +-----------+-------------+
//!     |           |             |
//! RecipeSource  ConvergeEngine  Ledger
//!                 |
//!            Interceptor  --(step-into)-->  ProviderDispatcher --> providers
//! ```
//!
//! # Example
//!
//! ```no_run
//! use recipe_core::{Runner, RunnerOptions};
//!
//! fn example() -> recipe_core::Result<()> {
//!     let mut runner = Runner::new(RunnerOptions::new("cookbooks"))?;
//!     runner.converge(["example::default"])?;
//!     assert!(runner.ledger().find("file", "hello-world.txt").is_some());
//!     Ok(())
//! }
//! ```

pub mod dispatch;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod node;
pub mod options;
pub mod providers;
pub mod recipe;
pub mod resource;
pub mod runner;
pub mod template;

pub use dispatch::{
    ActionDispatcher, DispatchContext, DispatchOutcome, Interceptor, ProviderDispatcher, StepInto,
};
pub use engine::ConvergeEngine;
pub use error::{Error, Result};
pub use ledger::{Ledger, LedgerEntry, LedgerRecord};
pub use node::{Node, RunList, RunListItem, simulated_facts};
pub use options::{CookbookPath, LogLevel, RunnerOptions};
pub use recipe::{CookbookLoader, RecipeBook, RecipeContext, RecipeSource, ResourceCollection};
pub use resource::{Action, Guard, GuardKind, Notification, Resource, ResourceBuilder, Timing};
pub use runner::Runner;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_recipe_not_found_displays_name() {
        let error = Error::RecipeNotFound {
            name: "example::missing".to_string(),
            searched: vec!["/cookbooks".into()],
        };

        let display = format!("{}", error);
        assert!(
            display.contains("example::missing"),
            "Error display should contain the recipe name, got: {}",
            display
        );
    }
}
