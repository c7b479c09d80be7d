//! ConvergeEngine implementation
//!
//! The engine walks a [`ResourceCollection`] in declaration order and hands
//! every resource to its dispatcher. Notifications raised by updated
//! resources are dispatched immediately or queued until the end of the run.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::dispatch::{
    ActionDispatcher, DispatchContext, DispatchOutcome, Interceptor, ProviderDispatcher, StepInto,
};
use crate::recipe::ResourceCollection;
use crate::resource::{Action, Notification, Resource, Timing};
use crate::{Error, Result};

/// Drives dispatch for one collection at a time.
pub struct ConvergeEngine {
    dispatcher: Arc<dyn ActionDispatcher>,
}

impl Default for ConvergeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvergeEngine {
    /// An engine that really executes every resource.
    pub fn new() -> Self {
        Self::with_dispatcher(Arc::new(ProviderDispatcher::new()))
    }

    pub fn with_dispatcher(dispatcher: Arc<dyn ActionDispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Arc<dyn ActionDispatcher> {
        &self.dispatcher
    }

    /// Whether the dispatch hook already records into the ledger.
    pub fn is_intercepted(&self) -> bool {
        self.dispatcher.intercepts()
    }

    /// Wrap the current dispatcher in an [`Interceptor`].
    ///
    /// Returns `false` without touching anything when interception is already
    /// installed, so every dispatch produces exactly one ledger entry.
    pub fn install_interceptor(&mut self, step_into: StepInto) -> bool {
        if self.is_intercepted() {
            debug!("interceptor already installed, skipping");
            return false;
        }
        let inner = Arc::clone(&self.dispatcher);
        self.dispatcher = Arc::new(Interceptor::new(inner, step_into));
        true
    }

    /// Dispatch every resource's declared action, then any delayed
    /// notifications. The first error aborts the run.
    pub fn converge(
        &self,
        resources: &ResourceCollection,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<()> {
        let mut run = Run {
            engine: self,
            resources,
            delayed: Vec::new(),
            queued: HashSet::new(),
        };

        for resource in resources.iter() {
            run.dispatch(resource, resource.action(), ctx)?;
        }

        // Delayed notifications may queue further delayed notifications.
        let mut next = 0;
        while next < run.delayed.len() {
            let (resource, action) = run.delayed[next].clone();
            run.dispatch(&resource, &action, ctx)?;
            next += 1;
        }
        Ok(())
    }
}

struct Run<'e> {
    engine: &'e ConvergeEngine,
    resources: &'e ResourceCollection,
    delayed: Vec<(Arc<Resource>, Action)>,
    queued: HashSet<(String, String, String)>,
}

impl Run<'_> {
    fn dispatch(
        &mut self,
        resource: &Arc<Resource>,
        action: &Action,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<()> {
        match resource.declared_in() {
            Some(recipe) => info!("Processing {resource} action {action} ({recipe})"),
            None => info!("Processing {resource} action {action}"),
        }

        let outcome = self.engine.dispatcher.dispatch(resource, action, ctx)?;
        debug!(resource = %resource, %action, ?outcome, "dispatched");

        if outcome == DispatchOutcome::Updated {
            for notification in resource.notifications() {
                self.notify(resource, notification, ctx)?;
            }
        }
        Ok(())
    }

    fn notify(
        &mut self,
        notifier: &Resource,
        notification: &Notification,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<()> {
        let target = self
            .resources
            .find(&notification.target_type, &notification.target_name)
            .cloned()
            .ok_or_else(|| Error::NotificationTarget {
                resource: notifier.to_string(),
                target: notification.target(),
            })?;

        debug!(
            "{notifier} sends {} to {target} ({:?})",
            notification.action, notification.timing
        );
        match notification.timing {
            Timing::Immediately => self.dispatch(&target, &notification.action, ctx),
            Timing::Delayed => {
                let key = (
                    target.resource_type().to_string(),
                    target.name().to_string(),
                    notification.action.to_string(),
                );
                if self.queued.insert(key) {
                    self.delayed.push((target, notification.action.clone()));
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::node::Node;
    use pretty_assertions::assert_eq;
    use recipe_fs::NormalizedPath;
    use std::sync::Mutex;

    /// Reports every dispatch as updated, and fails on `fail` actions.
    #[derive(Default)]
    struct Scripted {
        calls: Mutex<Vec<String>>,
    }

    impl ActionDispatcher for Scripted {
        fn dispatch(
            &self,
            resource: &Arc<Resource>,
            action: &Action,
            _ctx: &mut DispatchContext<'_>,
        ) -> Result<DispatchOutcome> {
            self.calls.lock().unwrap().push(format!("{resource}:{action}"));
            if action.as_str() == "fail" {
                return Err(Error::Execution {
                    resource: resource.to_string(),
                    message: "scripted failure".into(),
                });
            }
            Ok(DispatchOutcome::Updated)
        }
    }

    fn collection(resources: Vec<Resource>) -> ResourceCollection {
        let mut collection = ResourceCollection::new();
        for resource in resources {
            collection.push(resource);
        }
        collection
    }

    fn run(engine: &ConvergeEngine, resources: &ResourceCollection) -> (Result<()>, Ledger) {
        let node = Node::simulated();
        let root = NormalizedPath::new(".");
        let mut ledger = Ledger::new();
        let mut ctx = DispatchContext {
            node: &node,
            root: &root,
            cookbook_paths: &[],
            ledger: &mut ledger,
        };
        let result = engine.converge(resources, &mut ctx);
        (result, ledger)
    }

    fn res(resource_type: &str, name: &str, action: &str) -> Resource {
        Resource::builder(resource_type, name).action(action).build().unwrap()
    }

    #[test]
    fn installing_twice_is_a_no_op() {
        let mut engine = ConvergeEngine::new();
        assert!(!engine.is_intercepted());

        assert!(engine.install_interceptor(StepInto::new()));
        assert!(!engine.install_interceptor(StepInto::new()));

        let (result, ledger) = run(&engine, &collection(vec![res("file", "x", "create")]));
        result.unwrap();
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn unknown_types_are_recorded_unmodified() {
        let mut engine = ConvergeEngine::new();
        engine.install_interceptor(StepInto::new());

        let (result, ledger) = run(&engine, &collection(vec![res("my_widget", "w", "frobnicate")]));
        result.unwrap();

        let entry = ledger.find("my_widget", "w").unwrap();
        assert_eq!(entry.action().as_str(), "frobnicate");
    }

    #[test]
    fn dispatch_errors_abort_the_run() {
        let scripted = Arc::new(Scripted::default());
        let mut engine = ConvergeEngine::with_dispatcher(scripted.clone());
        engine.install_interceptor(["execute"].into_iter().collect());

        let resources = collection(vec![
            res("execute", "boom", "fail"),
            res("file", "after", "create"),
        ]);
        let (result, ledger) = run(&engine, &resources);

        assert!(matches!(result, Err(Error::Execution { .. })));
        assert!(ledger.is_empty());
        assert_eq!(scripted.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn immediate_and_delayed_notifications() {
        let scripted = Arc::new(Scripted::default());
        let engine = ConvergeEngine::with_dispatcher(scripted.clone());

        let config = Resource::builder("template", "nginx.conf")
            .action("create")
            .notifies(Notification::new("restart", "service[nginx]", Timing::Delayed).unwrap())
            .notifies(Notification::new("run", "execute[reload]", Timing::Immediately).unwrap())
            .build()
            .unwrap();
        let site = Resource::builder("file", "site")
            .action("create")
            .notifies(Notification::new("restart", "service[nginx]", Timing::Delayed).unwrap())
            .build()
            .unwrap();

        let resources = collection(vec![
            config,
            site,
            res("service", "nginx", "enable"),
            res("execute", "reload", "nothing"),
        ]);
        let (result, _) = run(&engine, &resources);
        result.unwrap();

        assert_eq!(
            *scripted.calls.lock().unwrap(),
            vec![
                "template[nginx.conf]:create",
                "execute[reload]:run",
                "file[site]:create",
                "service[nginx]:enable",
                "execute[reload]:nothing",
                "service[nginx]:restart",
            ]
        );
    }

    #[test]
    fn unknown_notification_target_is_an_error() {
        let engine = ConvergeEngine::with_dispatcher(Arc::new(Scripted::default()));
        let resources = collection(vec![
            Resource::builder("file", "x")
                .notifies(Notification::new("restart", "service[ghost]", Timing::Delayed).unwrap())
                .build()
                .unwrap(),
        ]);

        let (result, _) = run(&engine, &resources);
        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "file[x] notifies service[ghost], which is not declared in this run"
        );
    }

    #[test]
    fn record_only_never_fires_notifications() {
        let mut engine = ConvergeEngine::new();
        engine.install_interceptor(StepInto::new());

        let resources = collection(vec![
            Resource::builder("file", "x")
                .notifies(Notification::new("restart", "service[ghost]", Timing::Immediately).unwrap())
                .build()
                .unwrap(),
        ]);
        let (result, ledger) = run(&engine, &resources);

        result.unwrap();
        assert_eq!(ledger.len(), 1);
    }
}
