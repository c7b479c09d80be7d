//! `link` provider (symbolic links only)

use recipe_fs::io;

use super::{Provider, target_path, unsupported};
use crate::dispatch::DispatchContext;
use crate::resource::{Action, Resource};
use crate::{Error, Result};

pub struct LinkProvider;

impl Provider for LinkProvider {
    fn run(&self, resource: &Resource, action: &Action, ctx: &DispatchContext<'_>) -> Result<bool> {
        let path = target_path(resource, ctx);
        match action.as_str() {
            "create" => {
                let to = resource.str_attribute("to").ok_or_else(|| Error::Execution {
                    resource: resource.to_string(),
                    message: "link requires a `to` attribute".into(),
                })?;
                Ok(io::symlink(to, &path)?)
            }
            "delete" if path.is_symlink() => Ok(io::remove_file(&path)?),
            "delete" => Ok(false),
            _ => Err(unsupported(resource, action)),
        }
    }
}
