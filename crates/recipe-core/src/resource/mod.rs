//! Resource model
//!
//! A [`Resource`] is one declarative unit of desired state. Resources are
//! built once by a recipe source and never mutated afterwards; the ledger and
//! the resource collection share them through `Arc`.

mod action;
mod guard;
pub mod kind;
mod notification;

pub use action::Action;
pub use guard::{Condition, Guard, GuardKind, GuardPredicate};
pub use kind::ResourceKind;
pub use notification::{Notification, Timing, parse_target};

use serde_json::{Map, Value};
use std::fmt;

use crate::{Error, Result};

/// An immutable resource declaration.
#[derive(Debug, Clone)]
pub struct Resource {
    resource_type: String,
    name: String,
    action: Action,
    attributes: Map<String, Value>,
    guards: Vec<Guard>,
    notifications: Vec<Notification>,
    cookbook: Option<String>,
    recipe: Option<String>,
}

impl Resource {
    /// Start declaring a resource of `resource_type` named `name`.
    pub fn builder(resource_type: impl Into<String>, name: impl Into<String>) -> ResourceBuilder {
        ResourceBuilder::new(resource_type, name)
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The action the recipe declared.
    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// A string attribute, or `None` when absent or not a string.
    pub fn str_attribute(&self, key: &str) -> Option<&str> {
        self.attribute(key).and_then(Value::as_str)
    }

    pub fn bool_attribute(&self, key: &str) -> Option<bool> {
        self.attribute(key).and_then(Value::as_bool)
    }

    pub fn owner(&self) -> Option<&str> {
        self.str_attribute("owner")
    }

    pub fn group(&self) -> Option<&str> {
        self.str_attribute("group")
    }

    /// Filesystem target: the `path` attribute, falling back to the name.
    pub fn path(&self) -> &str {
        self.str_attribute("path").unwrap_or(&self.name)
    }

    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn cookbook(&self) -> Option<&str> {
        self.cookbook.as_deref()
    }

    /// `cookbook::recipe` that declared this resource, if known.
    pub fn declared_in(&self) -> Option<String> {
        match (&self.cookbook, &self.recipe) {
            (Some(cookbook), Some(recipe)) => Some(format!("{cookbook}::{recipe}")),
            (Some(cookbook), None) => Some(cookbook.clone()),
            _ => None,
        }
    }

    /// Lookup identity: `(type, name)`.
    pub fn is(&self, resource_type: &str, name: &str) -> bool {
        self.resource_type == resource_type && self.name == name
    }

    /// A copy whose guards all pass, for types that are really executed.
    pub fn with_guards_forced(&self) -> Resource {
        Resource {
            guards: Vec::new(),
            ..self.clone()
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.resource_type, self.name)
    }
}

/// Builder used by recipe sources to declare resources.
#[derive(Debug, Clone)]
pub struct ResourceBuilder {
    resource_type: String,
    name: String,
    action: Option<Action>,
    attributes: Map<String, Value>,
    guards: Vec<Guard>,
    notifications: Vec<Notification>,
    cookbook: Option<String>,
    recipe: Option<String>,
}

impl ResourceBuilder {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
            action: None,
            attributes: Map::new(),
            guards: Vec::new(),
            notifications: Vec::new(),
            cookbook: None,
            recipe: None,
        }
    }

    pub fn action(&mut self, action: impl Into<Action>) -> &mut Self {
        self.action = Some(action.into());
        self
    }

    pub fn attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attributes(&mut self, attributes: Map<String, Value>) -> &mut Self {
        self.attributes.extend(attributes);
        self
    }

    pub fn content(&mut self, content: impl Into<String>) -> &mut Self {
        self.attribute("content", content.into())
    }

    pub fn owner(&mut self, owner: impl Into<String>) -> &mut Self {
        self.attribute("owner", owner.into())
    }

    pub fn group(&mut self, group: impl Into<String>) -> &mut Self {
        self.attribute("group", group.into())
    }

    pub fn mode(&mut self, mode: impl Into<String>) -> &mut Self {
        self.attribute("mode", mode.into())
    }

    pub fn source(&mut self, source: impl Into<String>) -> &mut Self {
        self.attribute("source", source.into())
    }

    pub fn guard(&mut self, guard: Guard) -> &mut Self {
        self.guards.push(guard);
        self
    }

    pub fn only_if_command(&mut self, command: impl Into<String>) -> &mut Self {
        self.guard(Guard::only_if_command(command))
    }

    pub fn not_if_command(&mut self, command: impl Into<String>) -> &mut Self {
        self.guard(Guard::not_if_command(command))
    }

    pub fn notifies(&mut self, notification: Notification) -> &mut Self {
        self.notifications.push(notification);
        self
    }

    pub fn declared_in(&mut self, cookbook: impl Into<String>, recipe: impl Into<String>) -> &mut Self {
        self.cookbook = Some(cookbook.into());
        self.recipe = Some(recipe.into());
        self
    }

    /// Validate the action against the type's action set and build.
    ///
    /// Without an explicit action, known types use their default action and
    /// unknown types use `:nothing`.
    pub fn build(&self) -> Result<Resource> {
        let kind = kind::lookup(&self.resource_type);
        let action = match (&self.action, kind) {
            (Some(action), Some(kind)) if !kind.allows(action.as_str()) => {
                return Err(Error::InvalidAction {
                    resource_type: self.resource_type.clone(),
                    action: action.to_string(),
                });
            }
            (Some(action), _) => action.clone(),
            (None, Some(kind)) => Action::new(kind.default_action),
            (None, None) => Action::nothing(),
        };

        Ok(Resource {
            resource_type: self.resource_type.clone(),
            name: self.name.clone(),
            action,
            attributes: self.attributes.clone(),
            guards: self.guards.clone(),
            notifications: self.notifications.clone(),
            cookbook: self.cookbook.clone(),
            recipe: self.recipe.clone(),
        })
    }
}
