//! `template` and `cookbook_file` providers

use recipe_fs::{checksum, io};
use tracing::info;

use super::{Provider, apply_metadata, target_path, unsupported};
use crate::Result;
use crate::dispatch::DispatchContext;
use crate::resource::{Action, Resource};
use crate::template;

pub struct TemplateProvider;

pub struct CookbookFileProvider;

/// Shared create/delete flow for providers that write cookbook-sourced bytes.
fn converge_content<F>(
    resource: &Resource,
    action: &Action,
    ctx: &DispatchContext<'_>,
    content: F,
) -> Result<bool>
where
    F: FnOnce() -> Result<Vec<u8>>,
{
    let path = target_path(resource, ctx);
    match action.as_str() {
        "create_if_missing" if path.is_file() => apply_metadata(resource, &path),
        "create" | "create_if_missing" => {
            let bytes = content()?;
            let mut changed = false;
            if !checksum::matches_content(&path, &bytes)? {
                io::write_atomic(&path, &bytes)?;
                info!("{resource} wrote {} bytes to {path}", bytes.len());
                changed = true;
            }
            Ok(apply_metadata(resource, &path)? || changed)
        }
        "delete" => Ok(io::remove_file(&path)?),
        "touch" => {
            io::touch(&path)?;
            Ok(true)
        }
        _ => Err(unsupported(resource, action)),
    }
}

impl Provider for TemplateProvider {
    fn run(&self, resource: &Resource, action: &Action, ctx: &DispatchContext<'_>) -> Result<bool> {
        converge_content(resource, action, ctx, || {
            template::render_resource(resource, ctx.node, ctx.cookbook_paths).map(String::into_bytes)
        })
    }
}

impl Provider for CookbookFileProvider {
    fn run(&self, resource: &Resource, action: &Action, ctx: &DispatchContext<'_>) -> Result<bool> {
        converge_content(resource, action, ctx, || {
            template::cookbook_file_bytes(resource, ctx.cookbook_paths)
        })
    }
}
