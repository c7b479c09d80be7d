//! Action dispatch
//!
//! Every resource action the engine runs passes through an
//! [`ActionDispatcher`]. The engine starts with a [`ProviderDispatcher`]
//! (real execution) and a runner wraps it in an [`Interceptor`], which
//! decides per resource type whether to really execute and always appends
//! to the ledger carried in the [`DispatchContext`].

mod interceptor;
mod provider;

pub use interceptor::{Interceptor, StepInto};
pub use provider::ProviderDispatcher;

use recipe_fs::NormalizedPath;
use std::sync::Arc;

use crate::Result;
use crate::ledger::Ledger;
use crate::node::Node;
use crate::resource::{Action, Resource};

/// Per-run state handed to the dispatcher explicitly.
///
/// The ledger lives here rather than in any shared slot, so each converge
/// call routes entries to its own runner.
pub struct DispatchContext<'a> {
    pub node: &'a Node,
    /// Directory relative resource paths resolve against
    pub root: &'a NormalizedPath,
    /// Cookbook search path, for templates and cookbook files
    pub cookbook_paths: &'a [NormalizedPath],
    pub ledger: &'a mut Ledger,
}

/// What a dispatch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Real execution changed state
    Updated,
    /// Real execution found nothing to change
    UpToDate,
    /// A guard suppressed execution
    Skipped,
    /// Recorded in the ledger without executing
    Recorded,
}

impl DispatchOutcome {
    pub fn updated(self) -> bool {
        self == Self::Updated
    }
}

/// Hook point through which every resource action is dispatched.
pub trait ActionDispatcher: Send + Sync {
    fn dispatch(
        &self,
        resource: &Arc<Resource>,
        action: &Action,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<DispatchOutcome>;

    /// True when this dispatcher already records into the ledger.
    fn intercepts(&self) -> bool {
        false
    }
}
