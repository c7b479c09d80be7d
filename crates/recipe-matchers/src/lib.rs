//! Matchers and assertions over a converged recipespec run
//!
//! Every matcher is built from one `(action, resource type)` pair by
//! [`resource_matcher`]; the `create_file`-style functions in [`named`] are
//! shorthands for the common pairs.
//!
//! An entry matches when its type equals the requested type (or it is a
//! `template` and the request is `create` on `file`), its name is equal, and
//! the requested action is one of the entry action's tokens, so
//! `create_if_missing` satisfies `create` but not `delete`.
//!
//! ```no_run
//! use recipe_core::{Runner, RunnerOptions};
//! use recipe_matchers::{create_file, delete_file, expect_not, expect_that};
//!
//! let mut runner = Runner::new(RunnerOptions::new("cookbooks")).unwrap();
//! runner.converge(["example"]).unwrap();
//!
//! expect_that(&runner, &create_file("hello-world.txt")).unwrap();
//! expect_not(&runner, &delete_file("hello-world.txt")).unwrap();
//! ```

pub mod assert;
pub mod content;
pub mod error;
pub mod matcher;
pub mod named;
pub mod ownership;

pub use assert::{RunnerExt, expect_not, expect_that};
pub use content::{ContentExpectation, create_file_with_content, create_template_with_content};
pub use error::{AssertionFailure, Result};
pub use matcher::{EntryPredicate, ResourceExpectation, ResourceMatcher, RunMatcher, resource_matcher};
pub use named::*;
pub use ownership::{OwnedBy, OwnershipExpectation, owned_by};
