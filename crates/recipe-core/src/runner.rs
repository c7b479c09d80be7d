//! Test runner
//!
//! A [`Runner`] owns one simulated node, a recipe source and a converge
//! engine whose dispatcher is always intercepted. Every converge call
//! replaces the run-list, the resource collection and the ledger.

use std::fmt;
use std::sync::Arc;

use recipe_fs::NormalizedPath;
use tracing::{debug, warn};

use crate::Result;
use crate::dispatch::{DispatchContext, StepInto};
use crate::engine::ConvergeEngine;
use crate::ledger::Ledger;
use crate::logging;
use crate::node::{Node, RunListItem};
use crate::options::RunnerOptions;
use crate::recipe::{CookbookLoader, RecipeSource, ResourceCollection};
use crate::resource::Resource;

pub struct Runner {
    options: RunnerOptions,
    node: Node,
    root: NormalizedPath,
    cookbook_paths: Vec<NormalizedPath>,
    source: Box<dyn RecipeSource>,
    engine: ConvergeEngine,
    resources: ResourceCollection,
    ledger: Ledger,
}

impl Runner {
    /// Runner reading recipes from the configured cookbook path.
    pub fn new(options: RunnerOptions) -> Result<Self> {
        Self::with_node(options, |_| {})
    }

    /// Like [`Runner::new`], letting the caller adjust node attributes once.
    pub fn with_node<F>(options: RunnerOptions, configure: F) -> Result<Self>
    where
        F: FnOnce(&mut Node),
    {
        let loader = CookbookLoader::new(cookbook_paths(&options));
        Self::with_source(options, loader, configure)
    }

    /// Runner over any recipe source, such as a [`RecipeBook`](crate::RecipeBook).
    pub fn with_source<S, F>(options: RunnerOptions, source: S, configure: F) -> Result<Self>
    where
        S: RecipeSource + 'static,
        F: FnOnce(&mut Node),
    {
        Self::from_parts(options, Box::new(source), ConvergeEngine::new(), configure)
    }

    /// Runner over an explicit engine.
    ///
    /// The interceptor is installed unless the engine's dispatcher already
    /// intercepts, in which case the existing installation is kept as is.
    pub fn from_parts<F>(
        options: RunnerOptions,
        source: Box<dyn RecipeSource>,
        mut engine: ConvergeEngine,
        configure: F,
    ) -> Result<Self>
    where
        F: FnOnce(&mut Node),
    {
        // Ignored when a subscriber is already installed
        let _ = logging::init(options.log_level);

        let root = match &options.root {
            Some(root) => NormalizedPath::new(root),
            None => NormalizedPath::new(std::env::current_dir()?),
        };

        let mut node = Node::simulated();
        node.merge_attributes(&options.attributes);
        configure(&mut node);

        if engine.install_interceptor(options.step_into.clone()) {
            debug!(step_into = ?options.step_into, "interceptor installed");
        }

        Ok(Self {
            cookbook_paths: cookbook_paths(&options),
            options,
            node,
            root,
            source,
            engine,
            resources: ResourceCollection::new(),
            ledger: Ledger::new(),
        })
    }

    /// Converge `recipes`, replacing the previous run-list and ledger.
    ///
    /// With `dry_run` set, the run-list is replaced and nothing is evaluated.
    pub fn converge<I, S>(&mut self, recipes: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ledger = Ledger::new();
        self.resources = ResourceCollection::new();

        let items = match recipes
            .into_iter()
            .map(|name| RunListItem::parse(name.as_ref()))
            .collect::<Result<Vec<_>>>()
        {
            Ok(items) => items,
            Err(e) => {
                self.node.reset_run_list(Vec::new());
                return Err(e);
            }
        };
        self.node.reset_run_list(items);

        if self.options.dry_run {
            debug!(run_list = %self.node.run_list(), "dry run, nothing converged");
            return Ok(self);
        }

        self.resources = self.source.expand(&self.node).inspect_err(|e| warn!("{e}"))?;

        let mut ctx = DispatchContext {
            node: &self.node,
            root: &self.root,
            cookbook_paths: &self.cookbook_paths,
            ledger: &mut self.ledger,
        };
        self.engine
            .converge(&self.resources, &mut ctx)
            .inspect_err(|e| warn!("converge failed: {e}"))?;

        Ok(self)
    }

    /// First declared resource of the current run matching `(type, name)`.
    pub fn resource_of_type(&self, resource_type: &str, name: &str) -> Option<&Resource> {
        self.resources.find(resource_type, name).map(Arc::as_ref)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn resources(&self) -> &ResourceCollection {
        &self.resources
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn step_into(&self) -> &StepInto {
        &self.options.step_into
    }

    pub fn options(&self) -> &RunnerOptions {
        &self.options
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn cookbook_paths(&self) -> &[NormalizedPath] {
        &self.cookbook_paths
    }

    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    pub fn file(&self, name: &str) -> Option<&Resource> {
        self.resource_of_type("file", name)
    }

    pub fn directory(&self, name: &str) -> Option<&Resource> {
        self.resource_of_type("directory", name)
    }

    pub fn template(&self, name: &str) -> Option<&Resource> {
        self.resource_of_type("template", name)
    }

    pub fn link(&self, name: &str) -> Option<&Resource> {
        self.resource_of_type("link", name)
    }

    pub fn package(&self, name: &str) -> Option<&Resource> {
        self.resource_of_type("package", name)
    }

    pub fn service(&self, name: &str) -> Option<&Resource> {
        self.resource_of_type("service", name)
    }

    pub fn user(&self, name: &str) -> Option<&Resource> {
        self.resource_of_type("user", name)
    }

    pub fn group(&self, name: &str) -> Option<&Resource> {
        self.resource_of_type("group", name)
    }

    pub fn execute(&self, name: &str) -> Option<&Resource> {
        self.resource_of_type("execute", name)
    }

    pub fn cookbook_file(&self, name: &str) -> Option<&Resource> {
        self.resource_of_type("cookbook_file", name)
    }

    pub fn remote_file(&self, name: &str) -> Option<&Resource> {
        self.resource_of_type("remote_file", name)
    }
}

impl fmt::Display for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let run_list = self.node.run_list();
        if run_list.is_empty() {
            f.write_str("converge run")
        } else {
            write!(f, "converge run: {run_list}")
        }
    }
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("options", &self.options)
            .field("run_list", self.node.run_list())
            .field("ledger", &self.ledger.len())
            .finish_non_exhaustive()
    }
}

fn cookbook_paths(options: &RunnerOptions) -> Vec<NormalizedPath> {
    options
        .cookbook_path
        .paths()
        .into_iter()
        .map(NormalizedPath::new)
        .collect()
}
