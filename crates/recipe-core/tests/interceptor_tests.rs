//! Interceptor contract: one ledger entry per dispatch, guards forced on step-into

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use recipe_core::{
    Action, ActionDispatcher, DispatchContext, DispatchOutcome, Error, Guard, Interceptor, Ledger,
    Node, ProviderDispatcher, Resource, Result, StepInto,
};
use recipe_fs::NormalizedPath;

/// Records what reached it and reports whether guards were still present.
#[derive(Default)]
struct Spy {
    seen: Mutex<Vec<(String, usize)>>,
}

impl ActionDispatcher for Spy {
    fn dispatch(
        &self,
        resource: &Arc<Resource>,
        action: &Action,
        _ctx: &mut DispatchContext<'_>,
    ) -> Result<DispatchOutcome> {
        self.seen
            .lock()
            .unwrap()
            .push((format!("{resource}:{action}"), resource.guards().len()));
        Ok(DispatchOutcome::UpToDate)
    }
}

struct Harness {
    node: Node,
    root: NormalizedPath,
    ledger: Ledger,
}

impl Harness {
    fn new() -> Self {
        Self {
            node: Node::simulated(),
            root: NormalizedPath::new(std::env::temp_dir()),
            ledger: Ledger::new(),
        }
    }

    fn dispatch(&mut self, dispatcher: &dyn ActionDispatcher, resource: Resource) -> Result<DispatchOutcome> {
        let action = resource.action().clone();
        let mut ctx = DispatchContext {
            node: &self.node,
            root: &self.root,
            cookbook_paths: &[],
            ledger: &mut self.ledger,
        };
        dispatcher.dispatch(&Arc::new(resource), &action, &mut ctx)
    }
}

fn guarded(resource_type: &str, name: &str) -> Resource {
    Resource::builder(resource_type, name)
        .action("create")
        .only_if_command("false")
        .build()
        .unwrap()
}

#[test]
fn record_only_path_never_reaches_the_inner_dispatcher() {
    let spy = Arc::new(Spy::default());
    let interceptor = Interceptor::new(spy.clone(), StepInto::new());
    let mut harness = Harness::new();

    let outcome = harness.dispatch(&interceptor, guarded("file", "a")).unwrap();

    assert_eq!(outcome, DispatchOutcome::Recorded);
    assert!(spy.seen.lock().unwrap().is_empty());
    assert_eq!(harness.ledger.len(), 1);
}

#[test]
fn step_into_path_forces_guards_and_records_once() {
    let spy = Arc::new(Spy::default());
    let interceptor = Interceptor::new(spy.clone(), ["file"].into_iter().collect());
    let mut harness = Harness::new();

    harness.dispatch(&interceptor, guarded("file", "a")).unwrap();
    harness.dispatch(&interceptor, guarded("directory", "b")).unwrap();

    assert_eq!(*spy.seen.lock().unwrap(), vec![("file[a]:create".to_string(), 0)]);
    assert_eq!(harness.ledger.len(), 2);

    // The ledger keeps the resource as declared, guards included.
    let entry = harness.ledger.find("file", "a").unwrap();
    assert_eq!(entry.resource().guards().len(), 1);
}

#[test]
fn guard_errors_propagate_unchanged() {
    let dispatcher = ProviderDispatcher::new();
    let mut harness = Harness::new();
    let resource = Resource::builder("file", "broken")
        .guard(Guard::only_if(|_| {
            Err(Error::GuardEvaluation {
                resource: "file[broken]".into(),
                message: "undefined method".into(),
            })
        }))
        .build()
        .unwrap();

    let err = harness.dispatch(&dispatcher, resource).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Guard evaluation failed for file[broken]: undefined method"
    );
    assert!(harness.ledger.is_empty());
}

#[test]
fn failing_guard_skips_real_execution() {
    let dispatcher = ProviderDispatcher::new();
    let mut harness = Harness::new();
    let resource = Resource::builder("file", "never-written")
        .guard(Guard::not_if(|node| Ok(node.attribute("os").is_some())))
        .build()
        .unwrap();

    let outcome = harness.dispatch(&dispatcher, resource).unwrap();

    assert_eq!(outcome, DispatchOutcome::Skipped);
}

#[test]
fn unprovided_types_are_unsupported_for_real_execution() {
    let interceptor = Interceptor::new(
        Arc::new(ProviderDispatcher::new()),
        ["package"].into_iter().collect(),
    );
    let mut harness = Harness::new();
    let resource = Resource::builder("package", "nginx").action("install").build().unwrap();

    let err = harness.dispatch(&interceptor, resource).unwrap_err();

    assert!(matches!(err, Error::UnsupportedAction { .. }));
    assert!(harness.ledger.is_empty());
}

#[test]
fn interceptor_reports_itself() {
    let interceptor = Interceptor::new(Arc::new(ProviderDispatcher::new()), StepInto::new());
    assert!(interceptor.intercepts());
    assert!(!ProviderDispatcher::new().intercepts());
}
