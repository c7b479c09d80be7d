//! Real execution: guards first, then the type's provider

use std::sync::Arc;
use tracing::info;

use super::{ActionDispatcher, DispatchContext, DispatchOutcome};
use crate::providers::ProviderRegistry;
use crate::resource::{Action, Resource};
use crate::{Error, Result};

/// Dispatcher that actually mutates the system.
pub struct ProviderDispatcher {
    providers: ProviderRegistry,
}

impl Default for ProviderDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderDispatcher {
    /// Dispatcher backed by the built-in providers.
    pub fn new() -> Self {
        Self::with_registry(ProviderRegistry::with_builtins())
    }

    pub fn with_registry(providers: ProviderRegistry) -> Self {
        Self { providers }
    }
}

impl ActionDispatcher for ProviderDispatcher {
    fn dispatch(
        &self,
        resource: &Arc<Resource>,
        action: &Action,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<DispatchOutcome> {
        if action.is_nothing() {
            return Ok(DispatchOutcome::UpToDate);
        }

        for guard in resource.guards() {
            if !guard.permits(ctx.node, ctx.root)? {
                info!("Skipping {resource} action {action} due to {:?}", guard.kind());
                return Ok(DispatchOutcome::Skipped);
            }
        }

        let provider =
            self.providers
                .get(resource.resource_type())
                .ok_or_else(|| Error::UnsupportedAction {
                    resource: resource.to_string(),
                    action: action.to_string(),
                })?;

        if provider.run(resource, action, ctx)? {
            Ok(DispatchOutcome::Updated)
        } else {
            Ok(DispatchOutcome::UpToDate)
        }
    }
}
