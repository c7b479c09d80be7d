//! Content-aware matchers
//!
//! Content is resolved the way the resource would write it: the literal
//! `content` attribute of a `file`, the rendered source of a `template`, or
//! the bytes of a `cookbook_file`. Nothing is read from the converged target.

use similar::{ChangeTag, TextDiff};
use tracing::debug;

use recipe_core::{LedgerEntry, Resource, Runner, template};

use crate::matcher::{ResourceMatcher, RunMatcher};

/// Resource types that can carry file content.
const CONTENT_TYPES: &[&str] = &["file", "template", "cookbook_file", "remote_file"];

/// "A `type` resource named `name` was dispatched with `action` and its
/// content contains `content`."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentExpectation {
    matcher: ResourceMatcher,
    name: String,
    content: String,
}

impl ResourceMatcher {
    /// Expect a resource named `name` whose resolved content contains `content`.
    pub fn with_content(&self, name: impl Into<String>, content: impl Into<String>) -> ContentExpectation {
        ContentExpectation {
            matcher: self.clone(),
            name: name.into(),
            content: content.into(),
        }
    }
}

/// `create_file_with_content(name, content)`; templates and cookbook files
/// of the same name count as files.
pub fn create_file_with_content(name: &str, content: &str) -> ContentExpectation {
    ResourceMatcher::new("create", "file").with_content(name, content)
}

pub fn create_template_with_content(name: &str, content: &str) -> ContentExpectation {
    ResourceMatcher::new("create", "template").with_content(name, content)
}

/// Content a content-bearing resource would write, if it can be resolved.
pub fn resolved_content(resource: &Resource, runner: &Runner) -> Option<String> {
    let resolved = match resource.resource_type() {
        "template" => template::render_resource(resource, runner.node(), runner.cookbook_paths()),
        "cookbook_file" => template::cookbook_file_bytes(resource, runner.cookbook_paths())
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
        _ => return resource.str_attribute("content").map(str::to_string),
    };
    resolved
        .inspect_err(|e| debug!("could not resolve content of {resource}: {e}"))
        .ok()
}

impl ContentExpectation {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    fn candidates<'r>(&'r self, runner: &'r Runner) -> impl Iterator<Item = &'r LedgerEntry> + 'r {
        runner.ledger().all().filter(move |&entry| {
            let file_like = self.matcher.resource_type() == "file"
                && CONTENT_TYPES.contains(&entry.resource_type());
            (file_like || self.matcher.accepts_type(entry.resource_type()))
                && entry.name() == self.name
                && entry.action().satisfies(self.matcher.action().as_str())
        })
    }

    fn description(&self) -> String {
        format!(
            "{} resource named '{}' with action :{} and content '{}'",
            self.matcher.resource_type(),
            self.name,
            self.matcher.action(),
            self.content
        )
    }
}

impl RunMatcher for ContentExpectation {
    fn matches(&self, runner: &Runner) -> bool {
        self.candidates(runner).any(|entry| {
            resolved_content(entry.resource(), runner).is_some_and(|actual| actual.contains(&self.content))
        })
    }

    fn failure_message(&self, runner: &Runner) -> String {
        let mut message = format!("No {} found.", self.description());
        if let Some(actual) = self
            .candidates(runner)
            .find_map(|entry| resolved_content(entry.resource(), runner))
        {
            message.push_str("\nContent differs:\n");
            message.push_str(&line_diff(&self.content, &actual));
        }
        message
    }

    fn negated_failure_message(&self, _runner: &Runner) -> String {
        format!("Found {} that should not exist.", self.description())
    }
}

/// `-expected` / `+actual` lines, changed lines only.
fn line_diff(expected: &str, actual: &str) -> String {
    let diff = TextDiff::from_lines(expected, actual);
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
            ChangeTag::Equal => continue,
        };
        out.push(sign);
        out.push_str(change.value());
        if !change.value().ends_with('\n') {
            out.push('\n');
        }
    }
    out
}
