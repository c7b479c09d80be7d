//! `execute` and `script` providers

use recipe_fs::NormalizedPath;
use std::process::Command;
use tracing::info;

use super::{Provider, unsupported};
use crate::dispatch::DispatchContext;
use crate::resource::{Action, Resource};
use crate::{Error, Result};

/// Runs `command` (execute) or `code` through `interpreter` (script).
pub struct ExecuteProvider;

impl ExecuteProvider {
    fn command_line(resource: &Resource) -> (String, String) {
        match resource.str_attribute("code") {
            Some(code) => (
                resource.str_attribute("interpreter").unwrap_or("sh").to_string(),
                code.to_string(),
            ),
            None => (
                "sh".to_string(),
                resource
                    .str_attribute("command")
                    .unwrap_or(resource.name())
                    .to_string(),
            ),
        }
    }
}

impl Provider for ExecuteProvider {
    fn run(&self, resource: &Resource, action: &Action, ctx: &DispatchContext<'_>) -> Result<bool> {
        if action.as_str() != "run" {
            return Err(unsupported(resource, action));
        }

        if let Some(creates) = resource.str_attribute("creates")
            && NormalizedPath::resolve(ctx.root, creates).exists()
        {
            info!("{resource} skipped: {creates} already exists");
            return Ok(false);
        }

        let cwd = resource
            .str_attribute("cwd")
            .map_or_else(|| ctx.root.clone(), |cwd| NormalizedPath::resolve(ctx.root, cwd));
        let (interpreter, script) = Self::command_line(resource);

        let output = Command::new(&interpreter)
            .arg("-c")
            .arg(&script)
            .current_dir(cwd.to_native())
            .output()?;

        if !output.status.success() {
            return Err(Error::Execution {
                resource: resource.to_string(),
                message: format!(
                    "`{script}` exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        info!("{resource} ran `{script}`");
        Ok(true)
    }
}
