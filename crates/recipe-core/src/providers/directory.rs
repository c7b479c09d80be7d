//! `directory` provider

use recipe_fs::io;
use tracing::info;

use super::{Provider, apply_metadata, target_path, unsupported};
use crate::Result;
use crate::dispatch::DispatchContext;
use crate::resource::{Action, Resource};

pub struct DirectoryProvider;

impl Provider for DirectoryProvider {
    fn run(&self, resource: &Resource, action: &Action, ctx: &DispatchContext<'_>) -> Result<bool> {
        let path = target_path(resource, ctx);
        let recursive = resource.bool_attribute("recursive").unwrap_or(false);

        match action.as_str() {
            "create" => {
                let created = io::create_dir(&path, recursive)?;
                if created {
                    info!("{resource} created directory {path}");
                }
                Ok(apply_metadata(resource, &path)? || created)
            }
            "delete" => {
                let removed = io::remove_dir(&path, recursive)?;
                if removed {
                    info!("{resource} removed directory {path}");
                }
                Ok(removed)
            }
            _ => Err(unsupported(resource, action)),
        }
    }
}
