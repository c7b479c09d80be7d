//! Recipe sources
//!
//! A [`RecipeSource`] expands a node's run-list into the ordered resource
//! collection the engine dispatches. Two sources ship with the crate: the
//! on-disk [`CookbookLoader`] and the in-memory [`RecipeBook`].

mod book;
mod cookbook;

pub use book::{RecipeBook, RecipeContext};
pub use cookbook::{CookbookLoader, RecipeFile, ResourceDeclaration};

use std::sync::Arc;

use crate::Result;
use crate::node::Node;
use crate::resource::Resource;

/// Expands a run-list into resources.
pub trait RecipeSource: Send + Sync {
    /// Evaluate every recipe on `node`'s run-list, in order.
    ///
    /// Each recipe is evaluated at most once per expansion; a recipe that
    /// cannot be resolved fails with `Error::RecipeNotFound`.
    fn expand(&self, node: &Node) -> Result<ResourceCollection>;
}

/// Ordered resources produced by one expansion.
#[derive(Debug, Clone, Default)]
pub struct ResourceCollection {
    resources: Vec<Arc<Resource>>,
    recipes: Vec<String>,
}

impl ResourceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, resource: Resource) {
        self.resources.push(Arc::new(resource));
    }

    /// Mark `recipe` as evaluated. Returns `false` if it already was.
    pub fn begin_recipe(&mut self, recipe: &str) -> bool {
        if self.recipes.iter().any(|r| r == recipe) {
            return false;
        }
        self.recipes.push(recipe.to_string());
        true
    }

    /// Recipes evaluated, in evaluation order.
    pub fn recipes(&self) -> &[String] {
        &self.recipes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Resource>> {
        self.resources.iter()
    }

    /// First declared resource matching `(type, name)`.
    pub fn find(&self, resource_type: &str, name: &str) -> Option<&Arc<Resource>> {
        self.resources.iter().find(|r| r.is(resource_type, name))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
