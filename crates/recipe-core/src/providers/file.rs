//! `file` provider

use recipe_fs::{checksum, io};
use tracing::info;

use super::{Provider, apply_metadata, target_path, unsupported};
use crate::Result;
use crate::dispatch::DispatchContext;
use crate::resource::{Action, Resource};

pub struct FileProvider;

impl FileProvider {
    fn create(resource: &Resource, ctx: &DispatchContext<'_>, only_if_missing: bool) -> Result<bool> {
        let path = target_path(resource, ctx);
        let exists = path.is_file();
        let mut changed = false;

        match resource.str_attribute("content") {
            Some(_) if exists && only_if_missing => {}
            Some(content) => {
                if !checksum::matches_content(&path, content.as_bytes())? {
                    io::write_text(&path, content)?;
                    info!("{resource} wrote {} bytes to {path}", content.len());
                    changed = true;
                }
            }
            None if !exists => {
                io::write_text(&path, "")?;
                info!("{resource} created empty file {path}");
                changed = true;
            }
            None => {}
        }

        Ok(apply_metadata(resource, &path)? || changed)
    }
}

impl Provider for FileProvider {
    fn run(&self, resource: &Resource, action: &Action, ctx: &DispatchContext<'_>) -> Result<bool> {
        match action.as_str() {
            "create" => Self::create(resource, ctx, false),
            "create_if_missing" => Self::create(resource, ctx, true),
            "touch" => {
                let path = target_path(resource, ctx);
                io::touch(&path)?;
                apply_metadata(resource, &path)?;
                Ok(true)
            }
            "delete" => {
                let path = target_path(resource, ctx);
                let removed = io::remove_file(&path)?;
                if removed {
                    info!("{resource} deleted {path}");
                }
                Ok(removed)
            }
            _ => Err(unsupported(resource, action)),
        }
    }
}
