//! Ownership matcher over declared resources
//!
//! Evaluated against the first declaration via `Runner::resource_of_type`,
//! independent of what the ledger recorded. Pair it with ownership
//! snapshots of the target to prove the run left the disk alone.

use recipe_core::Runner;

use crate::matcher::RunMatcher;

/// Expected owner and group, not yet tied to a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedBy {
    user: String,
    group: String,
}

/// Start an ownership expectation.
pub fn owned_by(user: impl Into<String>, group: impl Into<String>) -> OwnedBy {
    OwnedBy {
        user: user.into(),
        group: group.into(),
    }
}

impl OwnedBy {
    /// Apply the expectation to the declared `resource_type[name]`.
    pub fn on(self, resource_type: impl Into<String>, name: impl Into<String>) -> OwnershipExpectation {
        OwnershipExpectation {
            owner: self,
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    /// Shorthand for `.on("file", name)`.
    pub fn file(self, name: impl Into<String>) -> OwnershipExpectation {
        self.on("file", name)
    }

    /// Shorthand for `.on("directory", name)`.
    pub fn directory(self, name: impl Into<String>) -> OwnershipExpectation {
        self.on("directory", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipExpectation {
    owner: OwnedBy,
    resource_type: String,
    name: String,
}

impl OwnershipExpectation {
    fn target(&self) -> String {
        format!("{}[{}]", self.resource_type, self.name)
    }
}

impl RunMatcher for OwnershipExpectation {
    fn matches(&self, runner: &Runner) -> bool {
        runner
            .resource_of_type(&self.resource_type, &self.name)
            .is_some_and(|resource| {
                resource.owner() == Some(self.owner.user.as_str())
                    && resource.group() == Some(self.owner.group.as_str())
            })
    }

    fn failure_message(&self, runner: &Runner) -> String {
        let expected = format!("{}:{}", self.owner.user, self.owner.group);
        match runner.resource_of_type(&self.resource_type, &self.name) {
            None => format!(
                "No {} resource named '{}' declared; expected it to be owned by {expected}.",
                self.resource_type, self.name
            ),
            Some(resource) => format!(
                "Expected {} to be owned by {expected}, but it declares {}:{}.",
                self.target(),
                resource.owner().unwrap_or("<unset>"),
                resource.group().unwrap_or("<unset>"),
            ),
        }
    }

    fn negated_failure_message(&self, _runner: &Runner) -> String {
        format!(
            "Expected {} not to be owned by {}:{}.",
            self.target(),
            self.owner.user,
            self.owner.group
        )
    }
}
