//! `only_if` / `not_if` guards

use std::fmt;
use std::process::Command;
use std::sync::Arc;

use recipe_fs::NormalizedPath;

use crate::node::Node;
use crate::{Error, Result};

/// Rust-side guard predicate. Errors propagate unchanged to the caller.
pub type GuardPredicate = Arc<dyn Fn(&Node) -> Result<bool> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardKind {
    /// Execute only when the condition holds
    OnlyIf,
    /// Execute unless the condition holds
    NotIf,
}

#[derive(Clone)]
pub enum Condition {
    /// Shell command; exit status zero means the condition holds
    Command(String),
    Predicate(GuardPredicate),
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(command) => f.debug_tuple("Command").field(command).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// A conditional that can suppress a resource's execution.
#[derive(Debug, Clone)]
pub struct Guard {
    kind: GuardKind,
    condition: Condition,
}

impl Guard {
    pub fn only_if_command(command: impl Into<String>) -> Self {
        Self {
            kind: GuardKind::OnlyIf,
            condition: Condition::Command(command.into()),
        }
    }

    pub fn not_if_command(command: impl Into<String>) -> Self {
        Self {
            kind: GuardKind::NotIf,
            condition: Condition::Command(command.into()),
        }
    }

    pub fn only_if<F>(predicate: F) -> Self
    where
        F: Fn(&Node) -> Result<bool> + Send + Sync + 'static,
    {
        Self {
            kind: GuardKind::OnlyIf,
            condition: Condition::Predicate(Arc::new(predicate)),
        }
    }

    pub fn not_if<F>(predicate: F) -> Self
    where
        F: Fn(&Node) -> Result<bool> + Send + Sync + 'static,
    {
        Self {
            kind: GuardKind::NotIf,
            condition: Condition::Predicate(Arc::new(predicate)),
        }
    }

    pub fn kind(&self) -> GuardKind {
        self.kind
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Returns `true` when this guard lets the resource execute.
    pub fn permits(&self, node: &Node, cwd: &NormalizedPath) -> Result<bool> {
        let holds = match &self.condition {
            Condition::Command(command) => {
                let status = Command::new("sh")
                    .arg("-c")
                    .arg(command)
                    .current_dir(cwd.to_native())
                    .status()
                    .map_err(|source| Error::GuardCommand {
                        command: command.clone(),
                        source,
                    })?;
                status.success()
            }
            Condition::Predicate(predicate) => predicate(node)?,
        };

        Ok(match self.kind {
            GuardKind::OnlyIf => holds,
            GuardKind::NotIf => !holds,
        })
    }
}
