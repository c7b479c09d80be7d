//! Action identifiers and their primitive tokens

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The action a resource declares or a dispatch actually runs.
///
/// Composite identifiers such as `create_if_missing` are a set of primitive
/// tokens: the full identifier plus each `_`-separated word. A request for
/// `create` is satisfied by `create_if_missing` because `create` is a member
/// of its token set; `delete` is not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(String);

impl Action {
    pub const NOTHING: &'static str = "nothing";

    /// Create an action, accepting the `:create` symbol form as well.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        match id.strip_prefix(':') {
            Some(stripped) => Self(stripped.to_string()),
            None => Self(id),
        }
    }

    pub fn nothing() -> Self {
        Self(Self::NOTHING.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_nothing(&self) -> bool {
        self.0 == Self::NOTHING
    }

    /// Primitive tokens of this action.
    pub fn tokens(&self) -> BTreeSet<&str> {
        let mut tokens: BTreeSet<&str> = self.0.split('_').filter(|t| !t.is_empty()).collect();
        tokens.insert(&self.0);
        tokens
    }

    /// Set membership of `requested` in [`Action::tokens`].
    pub fn satisfies(&self, requested: &str) -> bool {
        let requested = requested.strip_prefix(':').unwrap_or(requested);
        self.tokens().contains(requested)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Action {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Action {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for Action {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Action {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
