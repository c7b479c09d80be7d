//! Template rendering and cookbook asset lookup
//!
//! Templates use minijinja syntax. The render context exposes node
//! attributes as `node` and the resource's `variables` table at top level.

use minijinja::{Environment, UndefinedBehavior};
use recipe_fs::{NormalizedPath, io};
use serde_json::{Map, Value};

use crate::node::Node;
use crate::resource::Resource;
use crate::{Error, Result};

/// Cookbook asset folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Templates,
    Files,
}

impl Segment {
    fn as_str(self) -> &'static str {
        match self {
            Self::Templates => "templates",
            Self::Files => "files",
        }
    }
}

/// True when `text` contains template syntax worth rendering.
pub fn has_template_syntax(text: &str) -> bool {
    text.contains("{{") || text.contains("{%")
}

/// Render `source` with `node` and extra top-level `variables`.
pub fn render_str(source: &str, node: &Node, variables: &Map<String, Value>) -> Result<String> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);

    let mut context = variables.clone();
    context.insert("node".to_string(), node.to_value());
    Ok(env.render_str(source, Value::Object(context))?)
}

/// Find `<path>/<cookbook>/<segment>/default/<source>`, then `<path>/<cookbook>/<segment>/<source>`,
/// across every cookbook path in order.
pub fn locate(
    cookbook_paths: &[NormalizedPath],
    cookbook: &str,
    segment: Segment,
    source: &str,
) -> Option<NormalizedPath> {
    cookbook_paths.iter().find_map(|root| {
        let base = root.join(cookbook).join(segment.as_str());
        [base.join("default").join(source), base.join(source)]
            .into_iter()
            .find(NormalizedPath::is_file)
    })
}

/// Default template source: the target file name plus `.j2`.
pub fn template_source(resource: &Resource) -> String {
    match resource.str_attribute("source") {
        Some(source) => source.to_string(),
        None => {
            let file_name = NormalizedPath::new(resource.path())
                .file_name()
                .unwrap_or(resource.name())
                .to_string();
            format!("{file_name}.j2")
        }
    }
}

/// Default cookbook file source: the target file name.
pub fn cookbook_file_source(resource: &Resource) -> String {
    match resource.str_attribute("source") {
        Some(source) => source.to_string(),
        None => NormalizedPath::new(resource.path())
            .file_name()
            .unwrap_or(resource.name())
            .to_string(),
    }
}

fn locate_for(
    resource: &Resource,
    cookbook_paths: &[NormalizedPath],
    segment: Segment,
    source: &str,
) -> Result<NormalizedPath> {
    let cookbook = resource.cookbook().unwrap_or_default();
    locate(cookbook_paths, cookbook, segment, source).ok_or_else(|| Error::TemplateNotFound {
        cookbook: cookbook.to_string(),
        file: format!("{}/{source}", segment.as_str()),
    })
}

/// Render a `template` resource's source against the node.
pub fn render_resource(
    resource: &Resource,
    node: &Node,
    cookbook_paths: &[NormalizedPath],
) -> Result<String> {
    let source = template_source(resource);
    let path = locate_for(resource, cookbook_paths, Segment::Templates, &source)?;
    let variables = resource
        .attribute("variables")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    render_str(&io::read_text(&path)?, node, &variables)
}

/// Raw bytes a `cookbook_file` resource would install.
pub fn cookbook_file_bytes(resource: &Resource, cookbook_paths: &[NormalizedPath]) -> Result<Vec<u8>> {
    let source = cookbook_file_source(resource);
    let path = locate_for(resource, cookbook_paths, Segment::Files, &source)?;
    Ok(io::read_bytes(&path)?)
}
