//! Parameterized resource matchers
//!
//! [`resource_matcher`] builds a matcher for any `(action, resource type)`
//! pair; [`ResourceMatcher::named`] turns it into an expectation about one
//! resource that can be evaluated against a converged [`Runner`].

use std::fmt;
use std::sync::Arc;

use recipe_core::{Action, LedgerEntry, Runner};
use serde_json::Value;

/// Extra condition on a matching ledger entry.
pub type EntryPredicate = Arc<dyn Fn(&LedgerEntry, &Runner) -> bool + Send + Sync>;

/// Something that can be checked against a converged runner.
pub trait RunMatcher {
    fn matches(&self, runner: &Runner) -> bool;

    /// Shown when the matcher was expected to match and did not.
    fn failure_message(&self, runner: &Runner) -> String;

    /// Shown when the matcher was expected not to match and did.
    fn negated_failure_message(&self, runner: &Runner) -> String;
}

/// Matcher for resources of one type dispatched with one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMatcher {
    action: Action,
    resource_type: String,
}

/// Build a matcher for `action` on `resource_type`.
///
/// Building never fails: a pair no recipe declares simply never matches.
pub fn resource_matcher(action: impl Into<Action>, resource_type: impl Into<String>) -> ResourceMatcher {
    ResourceMatcher::new(action, resource_type)
}

impl ResourceMatcher {
    pub fn new(action: impl Into<Action>, resource_type: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            resource_type: resource_type.into(),
        }
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Expect a resource named `name`.
    pub fn named(&self, name: impl Into<String>) -> ResourceExpectation {
        ResourceExpectation {
            matcher: self.clone(),
            name: name.into(),
            predicate: None,
        }
    }

    /// Whether the entry's type is acceptable for this matcher.
    ///
    /// A `template` is a create-time specialization of `file`.
    pub fn accepts_type(&self, entry_type: &str) -> bool {
        entry_type == self.resource_type
            || (self.action == "create" && self.resource_type == "file" && entry_type == "template")
    }

    /// The full match rule for one ledger entry.
    pub fn matches_entry(&self, entry: &LedgerEntry, name: &str) -> bool {
        self.accepts_type(entry.resource_type())
            && entry.name() == name
            && entry.action().satisfies(self.action.as_str())
    }
}

/// "A `type` resource named `name` was dispatched with `action`."
#[derive(Clone)]
pub struct ResourceExpectation {
    matcher: ResourceMatcher,
    name: String,
    predicate: Option<EntryPredicate>,
}

impl fmt::Debug for ResourceExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceExpectation")
            .field("matcher", &self.matcher)
            .field("name", &self.name)
            .field("predicate", &self.predicate.as_ref().map(|_| ".."))
            .finish()
    }
}

impl ResourceExpectation {
    pub fn matcher(&self) -> &ResourceMatcher {
        &self.matcher
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Additionally require `predicate` to hold for the matching entry.
    pub fn with<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&LedgerEntry, &Runner) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Require a declared attribute to equal `expected`.
    pub fn with_attribute(self, key: &str, expected: impl Into<Value>) -> Self {
        let key = key.to_string();
        let expected = expected.into();
        self.with(move |entry, _| entry.resource().attribute(&key) == Some(&expected))
    }

    /// Ledger entries satisfying the expectation, in dispatch order.
    pub fn matching_entries<'r>(&'r self, runner: &'r Runner) -> impl Iterator<Item = &'r LedgerEntry> + 'r {
        runner.ledger().all().filter(move |&entry| {
            self.matcher.matches_entry(entry, &self.name)
                && self.predicate.as_ref().is_none_or(|predicate| predicate(entry, runner))
        })
    }
}

impl RunMatcher for ResourceExpectation {
    fn matches(&self, runner: &Runner) -> bool {
        self.matching_entries(runner).next().is_some()
    }

    fn failure_message(&self, _runner: &Runner) -> String {
        format!(
            "No {} resource named '{}' with action :{} found.",
            self.matcher.resource_type, self.name, self.matcher.action
        )
    }

    fn negated_failure_message(&self, _runner: &Runner) -> String {
        format!(
            "Found {} resource named '{}' with action :{} that should not exist.",
            self.matcher.resource_type, self.name, self.matcher.action
        )
    }
}
