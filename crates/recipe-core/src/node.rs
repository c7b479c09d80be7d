//! Node attributes and run-list
//!
//! The node carries a fixed set of simulated system facts plus caller
//! overrides. Attributes are settled at construction; only the run-list
//! changes, and it is replaced wholesale on every converge.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value, json};

use crate::{Error, Result};

static RECIPE_WRAPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^recipe\[([^\]]+)\]$").unwrap());
static RECIPE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_.-]+)(?:::([A-Za-z0-9_.-]+))?$").unwrap());

/// The simulated system facts injected into every node.
///
/// Recipes that branch on other facts should set them through
/// `RunnerOptions::attribute` or `Runner::with_node`.
pub fn simulated_facts() -> Map<String, Value> {
    let facts = json!({
        "os": "recipespec",
        "os_version": env!("CARGO_PKG_VERSION"),
        "fqdn": "recipespec.local",
        "domain": "local",
        "ipaddress": "127.0.0.1",
        "hostname": "recipespec",
        "kernel": { "name": "Linux", "machine": "x86_64" },
    });
    match facts {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// One recipe reference in a run-list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunListItem {
    pub cookbook: String,
    pub recipe: String,
}

impl RunListItem {
    /// Parse `cookbook`, `cookbook::recipe` or `recipe[cookbook::recipe]`.
    pub fn parse(item: &str) -> Result<Self> {
        let trimmed = item.trim();
        let inner = RECIPE_WRAPPER
            .captures(trimmed)
            .and_then(|c| c.get(1))
            .map_or(trimmed, |m| m.as_str());

        let captures = RECIPE_NAME
            .captures(inner)
            .ok_or_else(|| Error::InvalidRunListItem {
                item: item.to_string(),
            })?;

        Ok(Self {
            cookbook: captures[1].to_string(),
            recipe: captures
                .get(2)
                .map_or_else(|| "default".to_string(), |m| m.as_str().to_string()),
        })
    }

    /// `cookbook::recipe`
    pub fn qualified(&self) -> String {
        format!("{}::{}", self.cookbook, self.recipe)
    }
}

impl fmt::Display for RunListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "recipe[{}]", self.qualified())
    }
}

/// Ordered list of recipes to converge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunList {
    items: Vec<RunListItem>,
}

impl RunList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every entry with `items`.
    pub fn reset(&mut self, items: Vec<RunListItem>) {
        self.items = items;
    }

    pub fn push(&mut self, item: RunListItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[RunListItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl fmt::Display for RunList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.items.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join(", "))
    }
}

/// A simulated node.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    attributes: Map<String, Value>,
    run_list: RunList,
}

impl Node {
    /// A node with no attributes at all.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Map::new(),
            run_list: RunList::new(),
        }
    }

    /// A node carrying [`simulated_facts`], named after the simulated fqdn.
    pub fn simulated() -> Self {
        let mut node = Self::new("recipespec.local");
        node.attributes = simulated_facts();
        node
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Look up a dotted attribute path such as `kernel.machine`.
    pub fn attribute(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = self.attributes.get(segments.next()?)?;
        segments.try_fold(first, |value, segment| value.get(segment))
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Deep-merge `overrides` over the current attributes.
    pub fn merge_attributes(&mut self, overrides: &Map<String, Value>) {
        merge_maps(&mut self.attributes, overrides);
    }

    pub fn run_list(&self) -> &RunList {
        &self.run_list
    }

    pub(crate) fn reset_run_list(&mut self, items: Vec<RunListItem>) {
        self.run_list.reset(items);
    }

    /// Attributes as a JSON value, the shape templates see as `node`.
    pub fn to_value(&self) -> Value {
        Value::Object(self.attributes.clone())
    }
}

fn merge_maps(base: &mut Map<String, Value>, overrides: &Map<String, Value>) {
    for (key, value) in overrides {
        match (base.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_maps(existing, incoming);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}
