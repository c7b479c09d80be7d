//! In-memory recipes written as Rust closures

use std::collections::HashMap;
use std::sync::Arc;

use super::{RecipeSource, ResourceCollection};
use crate::node::{Node, RunListItem};
use crate::resource::ResourceBuilder;
use crate::{Error, Result};

type RecipeFn = Arc<dyn Fn(&mut RecipeContext<'_>) + Send + Sync>;

/// A set of named recipes defined in code.
///
/// ```
/// use recipe_core::RecipeBook;
///
/// let book = RecipeBook::new().recipe("example::default", |r| {
///     r.file("hello-world.txt").content("hello world").action("create");
/// });
/// assert!(book.contains("example::default"));
/// ```
#[derive(Clone, Default)]
pub struct RecipeBook {
    recipes: HashMap<String, RecipeFn>,
}

impl std::fmt::Debug for RecipeBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.recipes.keys().collect();
        names.sort();
        f.debug_struct("RecipeBook").field("recipes", &names).finish()
    }
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a recipe. A bare cookbook name registers `cookbook::default`.
    pub fn recipe<F>(mut self, name: &str, recipe: F) -> Self
    where
        F: Fn(&mut RecipeContext<'_>) + Send + Sync + 'static,
    {
        let key = RunListItem::parse(name).map_or_else(|_| name.to_string(), |item| item.qualified());
        self.recipes.insert(key, Arc::new(recipe));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        RunListItem::parse(name).is_ok_and(|item| self.recipes.contains_key(&item.qualified()))
    }

    fn evaluate(&self, item: &RunListItem, node: &Node, collection: &mut ResourceCollection) -> Result<()> {
        let qualified = item.qualified();
        if !collection.begin_recipe(&qualified) {
            return Ok(());
        }
        let recipe = self.recipes.get(&qualified).ok_or_else(|| Error::RecipeNotFound {
            name: qualified.clone(),
            searched: Vec::new(),
        })?;

        let mut ctx = RecipeContext {
            node,
            cookbook: item.cookbook.clone(),
            recipe: item.recipe.clone(),
            builders: Vec::new(),
            order: Vec::new(),
        };
        recipe(&mut ctx);

        for step in ctx.order {
            match step {
                Step::Resource(index) => collection.push(ctx.builders[index].build()?),
                Step::Include(name) => self.evaluate(&RunListItem::parse(&name)?, node, collection)?,
            }
        }
        Ok(())
    }
}

impl RecipeSource for RecipeBook {
    fn expand(&self, node: &Node) -> Result<ResourceCollection> {
        let mut collection = ResourceCollection::new();
        for item in node.run_list().items() {
            self.evaluate(item, node, &mut collection)?;
        }
        Ok(collection)
    }
}

enum Step {
    Resource(usize),
    Include(String),
}

/// Declaration surface handed to a recipe closure.
///
/// Declarations are collected in call order; validation happens once the
/// closure returns, so an invalid action surfaces as an error from converge.
pub struct RecipeContext<'a> {
    node: &'a Node,
    cookbook: String,
    recipe: String,
    builders: Vec<ResourceBuilder>,
    order: Vec<Step>,
}

impl RecipeContext<'_> {
    pub fn node(&self) -> &Node {
        self.node
    }

    /// Declare a resource of any type.
    pub fn declare(&mut self, resource_type: &str, name: &str) -> &mut ResourceBuilder {
        let mut builder = ResourceBuilder::new(resource_type, name);
        builder.declared_in(self.cookbook.clone(), self.recipe.clone());

        let index = self.builders.len();
        self.builders.push(builder);
        self.order.push(Step::Resource(index));
        &mut self.builders[index]
    }

    /// Evaluate another recipe at this point (once per run).
    pub fn include_recipe(&mut self, name: &str) {
        self.order.push(Step::Include(name.to_string()));
    }

    pub fn file(&mut self, name: &str) -> &mut ResourceBuilder {
        self.declare("file", name)
    }

    pub fn directory(&mut self, name: &str) -> &mut ResourceBuilder {
        self.declare("directory", name)
    }

    pub fn template(&mut self, name: &str) -> &mut ResourceBuilder {
        self.declare("template", name)
    }

    pub fn package(&mut self, name: &str) -> &mut ResourceBuilder {
        self.declare("package", name)
    }

    pub fn service(&mut self, name: &str) -> &mut ResourceBuilder {
        self.declare("service", name)
    }

    pub fn execute(&mut self, name: &str) -> &mut ResourceBuilder {
        self.declare("execute", name)
    }

    pub fn user(&mut self, name: &str) -> &mut ResourceBuilder {
        self.declare("user", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node_with(run_list: &[&str]) -> Node {
        let mut node = Node::simulated();
        node.reset_run_list(run_list.iter().map(|r| RunListItem::parse(r).unwrap()).collect());
        node
    }

    #[test]
    fn includes_expand_in_place_once() {
        let book = RecipeBook::new()
            .recipe("base", |r| {
                r.package("curl");
            })
            .recipe("web", |r| {
                r.include_recipe("base");
                r.service("nginx").action("enable");
                r.include_recipe("base::default");
            });

        let collection = book.expand(&node_with(&["web", "base"])).unwrap();
        let declared: Vec<_> = collection.iter().map(|r| r.to_string()).collect();

        assert_eq!(declared, vec!["package[curl]", "service[nginx]"]);
        assert_eq!(collection.recipes(), ["web::default", "base::default"]);
    }

    #[test]
    fn recipes_can_branch_on_node_attributes() {
        let book = RecipeBook::new().recipe("example", |r| {
            if r.node().attribute("os").and_then(|v| v.as_str()) == Some("recipespec") {
                r.file("simulated.txt");
            }
        });

        let collection = book.expand(&node_with(&["example"])).unwrap();
        assert!(collection.find("file", "simulated.txt").is_some());
    }

    #[test]
    fn unknown_recipe_is_not_found() {
        let book = RecipeBook::new();
        let err = book.expand(&node_with(&["missing::thing"])).unwrap_err();
        assert!(matches!(err, Error::RecipeNotFound { name, .. } if name == "missing::thing"));
    }

    #[test]
    fn invalid_actions_surface_after_evaluation() {
        let book = RecipeBook::new().recipe("example", |r| {
            r.file("x").action("restart");
        });
        let err = book.expand(&node_with(&["example"])).unwrap_err();
        assert!(matches!(err, Error::InvalidAction { .. }));
    }
}
