//! On-disk cookbooks
//!
//! ```text
//! <cookbook_path>/
//!   example/
//!     recipes/
//!       default.toml
//!     templates/default/motd.j2
//!     files/default/tool
//! ```
//!
//! A recipe file lists `include_recipe` entries and `[[resources]]` tables.

use recipe_fs::{ConfigStore, NormalizedPath};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::{RecipeSource, ResourceCollection};
use crate::node::{Node, RunListItem};
use crate::resource::{Notification, Resource, Timing};
use crate::template;
use crate::{Error, Result};

/// Deserialized recipe file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeFile {
    #[serde(default)]
    pub include_recipe: Vec<String>,
    #[serde(default)]
    pub resources: Vec<ResourceDeclaration>,
}

/// One `[[resources]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDeclaration {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    pub action: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    pub only_if: Option<String>,
    pub not_if: Option<String>,
    #[serde(default)]
    pub notifies: Vec<NotifyDeclaration>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyDeclaration {
    pub action: String,
    pub resource: String,
    #[serde(default)]
    pub timing: Timing,
}

/// Loads recipes from one or more cookbook directories, searched in order.
#[derive(Debug, Clone)]
pub struct CookbookLoader {
    cookbook_paths: Vec<NormalizedPath>,
    store: ConfigStore,
}

impl CookbookLoader {
    pub fn new(cookbook_paths: Vec<NormalizedPath>) -> Self {
        Self {
            cookbook_paths,
            store: ConfigStore::new(),
        }
    }

    pub fn cookbook_paths(&self) -> &[NormalizedPath] {
        &self.cookbook_paths
    }

    /// Path of the recipe file for `item`, if any cookbook path has one.
    pub fn recipe_path(&self, item: &RunListItem) -> Option<NormalizedPath> {
        self.cookbook_paths.iter().find_map(|root| {
            let dir = root.join(&item.cookbook).join("recipes");
            self.store.locate(&dir, &item.recipe)
        })
    }

    fn load(&self, item: &RunListItem, node: &Node, collection: &mut ResourceCollection) -> Result<()> {
        let qualified = item.qualified();
        if !collection.begin_recipe(&qualified) {
            debug!("recipe {qualified} already evaluated; skipping");
            return Ok(());
        }

        let path = self
            .recipe_path(item)
            .ok_or_else(|| Error::RecipeNotFound {
                name: qualified.clone(),
                searched: self.cookbook_paths.iter().map(NormalizedPath::to_native).collect(),
            })?;
        debug!("loading recipe {qualified} from {path}");
        let recipe: RecipeFile = self.store.load(&path)?;

        for include in &recipe.include_recipe {
            self.load(&RunListItem::parse(include)?, node, collection)?;
        }

        for declaration in &recipe.resources {
            let resource = declare(declaration, item, node).map_err(|e| match e {
                Error::Template(e) => Error::InvalidRecipe {
                    path: path.to_native(),
                    message: e.to_string(),
                },
                other => other,
            })?;
            collection.push(resource);
        }
        Ok(())
    }
}

impl RecipeSource for CookbookLoader {
    fn expand(&self, node: &Node) -> Result<ResourceCollection> {
        let mut collection = ResourceCollection::new();
        for item in node.run_list().items() {
            self.load(item, node, &mut collection)?;
        }
        Ok(collection)
    }
}

/// Render template syntax in a string against the node.
fn interpolate(text: &str, node: &Node) -> Result<String> {
    if template::has_template_syntax(text) {
        template::render_str(text, node, &Map::new())
    } else {
        Ok(text.to_string())
    }
}

fn interpolate_value(value: &Value, node: &Node) -> Result<Value> {
    Ok(match value {
        Value::String(s) => Value::String(interpolate(s, node)?),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|v| interpolate_value(v, node))
                .collect::<Result<_>>()?,
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), interpolate_value(v, node)?)))
                .collect::<Result<_>>()?,
        ),
        other => other.clone(),
    })
}

fn declare(declaration: &ResourceDeclaration, item: &RunListItem, node: &Node) -> Result<Resource> {
    let name = interpolate(&declaration.name, node)?;
    let mut builder = Resource::builder(&declaration.resource_type, name);
    builder.declared_in(&item.cookbook, &item.recipe);

    if let Some(action) = &declaration.action {
        builder.action(action.as_str());
    }
    for (key, value) in &declaration.attributes {
        // Template sources and variables are rendered later by the provider
        let value = if key == "variables" {
            value.clone()
        } else {
            interpolate_value(value, node)?
        };
        builder.attribute(key.clone(), value);
    }
    if let Some(command) = &declaration.only_if {
        builder.only_if_command(command.clone());
    }
    if let Some(command) = &declaration.not_if {
        builder.not_if_command(command.clone());
    }
    for notify in &declaration.notifies {
        builder.notifies(Notification::new(
            notify.action.as_str(),
            &notify.resource,
            notify.timing,
        )?);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn cookbook(dir: &std::path::Path, recipe: &str, content: &str) {
        let recipes = dir.join("example/recipes");
        fs::create_dir_all(&recipes).unwrap();
        fs::write(recipes.join(format!("{recipe}.toml")), content).unwrap();
    }

    fn node_with(run_list: &[&str]) -> Node {
        let mut node = Node::simulated();
        node.reset_run_list(run_list.iter().map(|r| RunListItem::parse(r).unwrap()).collect());
        node
    }

    #[test]
    fn names_are_interpolated_from_node() {
        let dir = tempfile::tempdir().unwrap();
        cookbook(
            dir.path(),
            "default",
            r#"
[[resources]]
type = "file"
name = "/etc/{{ node.hostname }}.conf"
"#,
        );

        let loader = CookbookLoader::new(vec![NormalizedPath::new(dir.path())]);
        let collection = loader.expand(&node_with(&["example"])).unwrap();

        let names: Vec<_> = collection.iter().map(|r| r.name().to_string()).collect();
        assert_eq!(names, vec!["/etc/recipespec.conf"]);
    }

    #[test]
    fn guards_and_notifications_are_declared() {
        let dir = tempfile::tempdir().unwrap();
        cookbook(
            dir.path(),
            "default",
            r#"
[[resources]]
type = "template"
name = "/etc/nginx/nginx.conf"
not_if = "test -f /etc/nginx/locked"

[[resources.notifies]]
action = "restart"
resource = "service[nginx]"
timing = "immediately"
"#,
        );

        let loader = CookbookLoader::new(vec![NormalizedPath::new(dir.path())]);
        let collection = loader.expand(&node_with(&["example::default"])).unwrap();
        let template = collection.find("template", "/etc/nginx/nginx.conf").unwrap();

        assert_eq!(template.guards().len(), 1);
        assert_eq!(template.notifications()[0].timing, Timing::Immediately);
        assert_eq!(template.declared_in().as_deref(), Some("example::default"));
    }
}
