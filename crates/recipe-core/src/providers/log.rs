//! `log` provider

use tracing::{debug, error, info, warn};

use super::{Provider, unsupported};
use crate::Result;
use crate::dispatch::DispatchContext;
use crate::resource::{Action, Resource};

pub struct LogProvider;

impl Provider for LogProvider {
    fn run(&self, resource: &Resource, action: &Action, _ctx: &DispatchContext<'_>) -> Result<bool> {
        if action.as_str() != "write" {
            return Err(unsupported(resource, action));
        }

        let message = resource.str_attribute("message").unwrap_or(resource.name());
        match resource.str_attribute("level").unwrap_or("info") {
            "debug" => debug!(target: "recipe", "{message}"),
            "warn" => warn!(target: "recipe", "{message}"),
            "error" | "fatal" => error!(target: "recipe", "{message}"),
            _ => info!(target: "recipe", "{message}"),
        }
        Ok(true)
    }
}
