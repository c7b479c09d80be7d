//! Record-or-execute interception

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

use super::{ActionDispatcher, DispatchContext, DispatchOutcome};
use crate::Result;
use crate::resource::{Action, Resource};

/// Resource types whose actions really execute during a test run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepInto(BTreeSet<String>);

impl StepInto {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.0.contains(resource_type)
    }

    pub fn insert(&mut self, resource_type: impl Into<String>) -> bool {
        self.0.insert(resource_type.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for StepInto {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Wraps the real dispatcher.
///
/// Step-into types have their guards forced to pass and are delegated to the
/// wrapped dispatcher; everything else is only recorded. Both paths append
/// exactly one ledger entry per successful dispatch. Unknown resource types
/// take the same path as any other type.
pub struct Interceptor {
    inner: Arc<dyn ActionDispatcher>,
    step_into: StepInto,
}

impl Interceptor {
    pub fn new(inner: Arc<dyn ActionDispatcher>, step_into: StepInto) -> Self {
        Self { inner, step_into }
    }

    pub fn step_into(&self) -> &StepInto {
        &self.step_into
    }
}

impl ActionDispatcher for Interceptor {
    fn dispatch(
        &self,
        resource: &Arc<Resource>,
        action: &Action,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<DispatchOutcome> {
        let outcome = if self.step_into.contains(resource.resource_type()) {
            debug!(resource = %resource, %action, "stepping into resource");
            let forced = Arc::new(resource.with_guards_forced());
            self.inner.dispatch(&forced, action, ctx)?
        } else {
            DispatchOutcome::Recorded
        };

        ctx.ledger.record(Arc::clone(resource), action.clone());
        Ok(outcome)
    }

    fn intercepts(&self) -> bool {
        true
    }
}
